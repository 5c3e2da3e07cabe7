use super::helpers::{find_by_id, position_of, prepend_entries};
use super::Engine;

use async_trait::async_trait;
use serde_json::json;
use validator::Validate;

use crate::{
    api::ApplicationAPI,
    auth::User,
    entities::{Action, ActivityLog, Applicant, Application, ApplicationStatus, Member},
    error::{self, Error},
    store::{Batch, Collection},
};

#[async_trait]
impl ApplicationAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn submit_application(
        &self,
        user: User,
        applicant: Applicant,
    ) -> Result<Application, Error> {
        self.authorize(&user, "submit_application")?;
        applicant.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let application = Application::new(applicant);
        applications.push(application.clone());

        self.store
            .save(Collection::Applications, &applications)
            .await?;

        tracing::info!(id = %application.id, "application submitted");

        Ok(application)
    }

    #[tracing::instrument(skip(self))]
    async fn list_applications(
        &self,
        user: User,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, Error> {
        self.authorize(&user, "read")?;

        let applications: Vec<Application> = self.store.load(Collection::Applications).await;

        Ok(applications
            .into_iter()
            .filter(|application| status.map_or(true, |status| application.status == status))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_application(&self, user: User, id: &str) -> Result<Application, Error> {
        self.authorize(&user, "read")?;

        let applications: Vec<Application> = self.store.load(Collection::Applications).await;

        find_by_id(&applications, id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_application(
        &self,
        user: User,
        id: &str,
        applicant: Applicant,
    ) -> Result<Application, Error> {
        self.authorize(&user, "review_applications")?;
        applicant.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let index = position_of(&applications, id)?;
        applications[index].edit(applicant);

        self.store
            .save(Collection::Applications, &applications)
            .await?;

        Ok(applications.swap_remove(index))
    }

    /// Approves a pending application and enrolls the applicant in the club
    /// they asked for. Application, member and log entry land in one commit.
    #[tracing::instrument(skip(self))]
    async fn approve_application(
        &self,
        user: User,
        id: &str,
        notes: Option<String>,
    ) -> Result<Member, Error> {
        self.authorize(&user, "review_applications")?;

        let _guard = self.write_lock.lock().await;

        let mut applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let index = position_of(&applications, id)?;

        let application = &mut applications[index];
        application.approve(notes)?;

        let member = Member::from_application(application);
        let reason = application
            .notes
            .clone()
            .unwrap_or_else(|| "Application approved".into());
        let entry = ActivityLog::new(
            &application.id,
            &user.id,
            Action::Approve,
            reason,
            json!({ "member_id": member.id, "club_id": member.club_id }),
        );

        let mut members: Vec<Member> = self.store.load(Collection::Members).await;
        members.push(member.clone());
        let logs = prepend_entries(self.store.load(Collection::ActivityLogs).await, &[entry]);

        let mut batch = Batch::new();
        batch
            .put(Collection::Applications, &applications)?
            .put(Collection::Members, &members)?
            .put(Collection::ActivityLogs, &logs)?;
        self.store.commit(batch).await?;

        tracing::info!(member = %member.id, club = %member.club_id, "application approved");

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    async fn reject_application(
        &self,
        user: User,
        id: &str,
        reason: String,
    ) -> Result<Application, Error> {
        self.authorize(&user, "review_applications")?;

        if reason.trim().is_empty() {
            return Err(error::invalid_input_error());
        }

        let _guard = self.write_lock.lock().await;

        let mut applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let index = position_of(&applications, id)?;
        applications[index].reject(reason.clone())?;

        let entry = ActivityLog::new(
            id,
            &user.id,
            Action::Reject,
            reason,
            json!({ "desired_club_id": applications[index].applicant.desired_club_id }),
        );
        let logs = prepend_entries(self.store.load(Collection::ActivityLogs).await, &[entry]);

        let mut batch = Batch::new();
        batch
            .put(Collection::Applications, &applications)?
            .put(Collection::ActivityLogs, &logs)?;
        self.store.commit(batch).await?;

        Ok(applications.swap_remove(index))
    }
}

#[cfg(test)]
fn applicant(club_id: &str) -> Applicant {
    Applicant {
        full_name: "Ann Lee".into(),
        email: "ann@example.com".into(),
        phone_number: "0901234567".into(),
        gender: "Nữ".into(),
        address: "12 Main St".into(),
        desired_club_id: club_id.into(),
        strengths: "Openings".into(),
        reason: "I like chess".into(),
    }
}

#[test]
fn approval_enrolls_member_and_logs() {
    use super::test_engine;
    use crate::api::{ActivityLogAPI, MemberAPI};
    use tokio_test::block_on;

    let engine = test_engine([("clubs", r#"[{"id":"c1","name":"Chess"}]"#)]);
    let admin = User::admin("admin-1");

    let application =
        block_on(engine.submit_application(User::new("ann", vec![]), applicant("c1"))).unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);

    let member = block_on(engine.approve_application(admin.clone(), &application.id, None))
        .unwrap();
    assert_eq!(member.application_id, application.id);
    assert_eq!(member.club_id, "c1");

    let views = block_on(engine.list_members(admin.clone(), None)).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].full_name(), Some("Ann Lee"));
    assert_eq!(views[0].club_name, "Chess");

    let history = block_on(engine.history_for(admin.clone(), &application.id)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, Action::Approve);
    assert_eq!(history[0].admin_id, "admin-1");

    let err = block_on(engine.reject_application(admin.clone(), &application.id, "no".into()))
        .unwrap_err();
    assert_eq!(err, error::invalid_invocation_error());
}

#[test]
fn rejection_records_reason() {
    use super::test_engine;
    use crate::api::{ActivityLogAPI, MemberAPI};
    use tokio_test::block_on;

    let engine = test_engine([]);
    let admin = User::admin("admin-1");

    let application =
        block_on(engine.submit_application(admin.clone(), applicant("c1"))).unwrap();

    let err = block_on(engine.reject_application(admin.clone(), &application.id, " ".into()))
        .unwrap_err();
    assert!(err.is_invalid_input_error());

    let rejected = block_on(engine.reject_application(
        admin.clone(),
        &application.id,
        "club is full".into(),
    ))
    .unwrap();
    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    assert_eq!(rejected.notes.as_deref(), Some("club is full"));

    let members = block_on(engine.list_members(admin.clone(), None)).unwrap();
    assert!(members.is_empty());

    let history = block_on(engine.history_for(admin.clone(), &application.id)).unwrap();
    assert_eq!(history[0].action, Action::Reject);
    assert_eq!(history[0].reason, "club is full");

    let pending = block_on(engine.list_applications(admin, Some(ApplicationStatus::Pending)))
        .unwrap();
    assert!(pending.is_empty());
}

#[test]
fn invalid_applications_are_refused() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine([]);

    let mut bad = applicant("c1");
    bad.email = "not-an-email".into();

    let err = block_on(engine.submit_application(User::new("ann", vec![]), bad)).unwrap_err();
    assert!(err.is_invalid_input_error());

    let applications = block_on(engine.list_applications(User::admin("admin-1"), None)).unwrap();
    assert!(applications.is_empty());
}
