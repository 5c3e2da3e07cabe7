use super::{ClubDirectory, Engine};

use async_trait::async_trait;

use crate::{
    api::DashboardAPI,
    auth::User,
    entities::{
        Application, ApplicationStatus, ClubApplicationCounts, DashboardStats, MemberExportRow,
        StatusCounts,
    },
    error::Error,
    store::Collection,
};

#[async_trait]
impl DashboardAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn dashboard_stats(&self, user: User) -> Result<DashboardStats, Error> {
        self.authorize(&user, "read")?;

        let applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let directory = ClubDirectory::load(&self.store).await;

        let clubs = directory
            .clubs()
            .iter()
            .map(|club| ClubApplicationCounts {
                club_id: club.id.clone(),
                club_name: club.name.clone(),
                counts: count_statuses(
                    applications
                        .iter()
                        .filter(|application| application.applicant.desired_club_id == club.id),
                ),
            })
            .collect();

        Ok(DashboardStats {
            total_clubs: directory.clubs().len(),
            applications: count_statuses(applications.iter()),
            clubs,
        })
    }

    /// Approved applicants as export rows. The club column falls back to the
    /// raw club id when the club no longer exists.
    #[tracing::instrument(skip(self))]
    async fn export_members(
        &self,
        user: User,
        club_id: Option<&str>,
    ) -> Result<Vec<MemberExportRow>, Error> {
        self.authorize(&user, "read")?;

        let applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let directory = ClubDirectory::load(&self.store).await;

        let club_id = club_id.filter(|id| !id.is_empty());

        Ok(applications
            .into_iter()
            .filter(|application| application.status == ApplicationStatus::Approved)
            .filter(|application| {
                club_id.map_or(true, |id| application.applicant.desired_club_id == id)
            })
            .map(|application| {
                let applicant = application.applicant;
                let club_name = directory
                    .find(&applicant.desired_club_id)
                    .map(|club| club.name.clone())
                    .unwrap_or_else(|| applicant.desired_club_id.clone());

                MemberExportRow {
                    full_name: applicant.full_name,
                    email: applicant.email,
                    phone_number: applicant.phone_number,
                    gender: applicant.gender,
                    club_name,
                    join_date: application.updated_at,
                }
            })
            .collect())
    }
}

fn count_statuses<'a>(applications: impl Iterator<Item = &'a Application>) -> StatusCounts {
    applications.fold(StatusCounts::default(), |mut counts, application| {
        match application.status {
            ApplicationStatus::Pending => counts.pending += 1,
            ApplicationStatus::Approved => counts.approved += 1,
            ApplicationStatus::Rejected => counts.rejected += 1,
        }
        counts
    })
}

#[cfg(test)]
const DASHBOARD: [(&str, &str); 2] = [
    ("clubs", r#"[{"id":"c1","name":"Chess"},{"id":"c2","name":"Go"}]"#),
    (
        "applications",
        r#"[
            {"id":"a1","full_name":"Ann","desired_club_id":"c1","status":"approved"},
            {"id":"a2","full_name":"Bob","desired_club_id":"c1","status":"pending"},
            {"id":"a3","full_name":"Cy","desired_club_id":"c2","status":"rejected"},
            {"id":"a4","full_name":"Di","desired_club_id":"gone","status":"approved"}
        ]"#,
    ),
];

#[test]
fn stats_count_by_status_and_club() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine(DASHBOARD);

    let stats = block_on(engine.dashboard_stats(User::viewer("viewer-1"))).unwrap();
    assert_eq!(stats.total_clubs, 2);
    assert_eq!(
        stats.applications,
        StatusCounts {
            pending: 1,
            approved: 2,
            rejected: 1,
        }
    );

    assert_eq!(stats.clubs[0].club_name, "Chess");
    assert_eq!(stats.clubs[0].counts.approved, 1);
    assert_eq!(stats.clubs[0].counts.pending, 1);
    assert_eq!(stats.clubs[1].counts.rejected, 1);
}

#[test]
fn export_lists_approved_applicants() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine(DASHBOARD);
    let viewer = User::viewer("viewer-1");

    let rows = block_on(engine.export_members(viewer.clone(), None)).unwrap();
    let names: Vec<(&str, &str)> = rows
        .iter()
        .map(|row| (row.full_name.as_str(), row.club_name.as_str()))
        .collect();
    assert_eq!(names, vec![("Ann", "Chess"), ("Di", "gone")]);

    let rows = block_on(engine.export_members(viewer, Some("c1"))).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].full_name, "Ann");
}
