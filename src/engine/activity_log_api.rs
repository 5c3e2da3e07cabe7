use super::Engine;

use async_trait::async_trait;

use crate::{
    api::ActivityLogAPI, auth::User, entities::ActivityLog, error::Error, store::Collection,
};

#[async_trait]
impl ActivityLogAPI for Engine {
    /// Entries for one application, in log order (newest first).
    #[tracing::instrument(skip(self))]
    async fn history_for(
        &self,
        user: User,
        application_id: &str,
    ) -> Result<Vec<ActivityLog>, Error> {
        let logs = self.activity_logs(user).await?;

        Ok(logs
            .into_iter()
            .filter(|log| log.application_id == application_id)
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn activity_logs(&self, user: User) -> Result<Vec<ActivityLog>, Error> {
        self.authorize(&user, "read")?;

        Ok(self.store.load(Collection::ActivityLogs).await)
    }
}

#[test]
fn history_is_filtered_in_log_order() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine([(
        "activity_logs",
        r#"[
            {"id":"l3","application_id":"a1","action":"Move","reason":"Moved from Go to Chess"},
            {"id":"l2","application_id":"a2","action":"Reject","reason":"full"},
            {"id":"l1","application_id":"a1","action":"Approve","reason":"welcome"}
        ]"#,
    )]);
    let viewer = User::viewer("viewer-1");

    let history = block_on(engine.history_for(viewer.clone(), "a1")).unwrap();
    let ids: Vec<&str> = history.iter().map(|log| log.id.as_str()).collect();
    assert_eq!(ids, vec!["l3", "l1"]);

    let history = block_on(engine.history_for(viewer.clone(), "a9")).unwrap();
    assert!(history.is_empty());

    let err = block_on(engine.history_for(User::new("nobody", vec![]), "a1")).unwrap_err();
    assert_eq!(err, crate::error::unauthorized_error());
}
