use crate::engine::ClubDirectory;
use crate::entities::{Application, Member, MemberView};

/// Joins members with their application and club name, keeping member order.
///
/// The first application with a matching id wins; a member without one keeps
/// an empty applicant and review. When `club_id` is given only that club's members are
/// returned.
pub fn reconcile(
    members: Vec<Member>,
    applications: &[Application],
    directory: &ClubDirectory,
    club_id: Option<&str>,
) -> Vec<MemberView> {
    members
        .into_iter()
        .filter(|member| club_id.map_or(true, |id| member.club_id == id))
        .map(|member| {
            let application = applications
                .iter()
                .find(|application| application.id == member.application_id);
            let club_name = directory.name_of(&member.club_id);

            MemberView {
                applicant: application.map(|application| application.applicant.clone()),
                review: application.map(Application::review),
                member,
                club_name,
            }
        })
        .collect()
}

#[test]
fn filtered_view_is_ordered_subset() {
    use crate::entities::{Applicant, Club};

    let member = |id: &str, club_id: &str, application_id: &str| Member {
        id: id.into(),
        club_id: club_id.into(),
        application_id: application_id.into(),
        ..Default::default()
    };
    let members = vec![
        member("m1", "c1", "a1"),
        member("m2", "c2", "a2"),
        member("m3", "c1", "missing"),
        member("m4", "c1", "a1"),
    ];
    let applications = vec![Application {
        id: "a1".into(),
        applicant: Applicant {
            full_name: "Ann".into(),
            ..Default::default()
        },
        ..Default::default()
    }];
    let directory = ClubDirectory::new(vec![Club {
        id: "c1".into(),
        name: "Chess".into(),
        ..Default::default()
    }]);

    let all = reconcile(members.clone(), &applications, &directory, None);
    let chess = reconcile(members, &applications, &directory, Some("c1"));

    let expected: Vec<MemberView> = all
        .iter()
        .filter(|view| view.member.club_id == "c1")
        .cloned()
        .collect();
    assert_eq!(chess, expected);

    let ids: Vec<&str> = chess.iter().map(|view| view.member.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m3", "m4"]);

    assert_eq!(all[0].full_name(), Some("Ann"));
    assert_eq!(all[1].club_name, "Unknown Club");
    assert_eq!(all[2].applicant, None);
    assert_eq!(all[2].review, None);
}

#[test]
fn view_carries_review_without_shadowing_member() {
    use crate::entities::{Applicant, ApplicationStatus};

    let members = vec![Member {
        id: "m1".into(),
        club_id: "c1".into(),
        application_id: "a1".into(),
        ..Default::default()
    }];
    let applications = vec![Application {
        id: "a1".into(),
        applicant: Applicant {
            full_name: "Ann".into(),
            ..Default::default()
        },
        status: ApplicationStatus::Approved,
        notes: Some("welcome".into()),
        ..Default::default()
    }];

    let views = reconcile(members, &applications, &ClubDirectory::new(vec![]), None);
    let review = views[0].review.as_ref().unwrap();
    assert_eq!(review.status, ApplicationStatus::Approved);

    let json = serde_json::to_value(&views[0]).unwrap();
    assert_eq!(json["id"], "m1");
    assert_eq!(json["application_id"], "a1");
    assert_eq!(json["full_name"], "Ann");
    assert_eq!(json["status"], "approved");
    assert_eq!(json["notes"], "welcome");
    assert_eq!(json["club_name"], "Unknown Club");
}
