use std::collections::HashSet;

use super::helpers::prepend_entries;
use super::{reconcile, ClubDirectory, Engine};

use async_trait::async_trait;

use crate::{
    api::MemberAPI,
    auth::User,
    entities::{ActivityLog, Application, Member, MemberView, MoveDetails, MoveSummary},
    error::{self, Error},
    store::{Batch, Collection},
};

#[async_trait]
impl MemberAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_members(
        &self,
        user: User,
        club_id: Option<&str>,
    ) -> Result<Vec<MemberView>, Error> {
        self.authorize(&user, "read")?;

        let members: Vec<Member> = self.store.load(Collection::Members).await;
        let applications: Vec<Application> = self.store.load(Collection::Applications).await;
        let directory = ClubDirectory::load(&self.store).await;

        let club_id = club_id.filter(|id| !id.is_empty());

        Ok(reconcile(members, &applications, &directory, club_id))
    }

    #[tracing::instrument(skip(self))]
    async fn find_member(&self, user: User, id: &str) -> Result<MemberView, Error> {
        self.list_members(user, None)
            .await?
            .into_iter()
            .find(|view| view.member.id == id)
            .ok_or_else(error::not_found_error)
    }

    /// Reassigns every listed member to `target_club_id`, logging one `Move`
    /// entry per member. Members and log are committed together. Unknown
    /// member ids are ignored.
    #[tracing::instrument(skip(self))]
    async fn move_members(
        &self,
        user: User,
        member_ids: &HashSet<String>,
        target_club_id: &str,
    ) -> Result<MoveSummary, Error> {
        self.authorize(&user, "manage_members")?;

        if target_club_id.is_empty() {
            return Err(error::no_destination_error());
        }

        let _guard = self.write_lock.lock().await;

        let mut members: Vec<Member> = self.store.load(Collection::Members).await;
        let directory = ClubDirectory::load(&self.store).await;

        let entries = move_to_club(&mut members, member_ids, target_club_id, &directory, &user);

        let mut batch = Batch::new();
        batch.put(Collection::Members, &members)?;
        if !entries.is_empty() {
            let logs = prepend_entries(self.store.load(Collection::ActivityLogs).await, &entries);
            batch.put(Collection::ActivityLogs, &logs)?;
        }
        self.store.commit(batch).await?;

        let summary = MoveSummary {
            moved: entries.len(),
            target_club_id: target_club_id.to_string(),
            target_club_name: directory.name_of(target_club_id),
            entries,
        };

        tracing::info!(
            moved = summary.moved,
            target = %summary.target_club_name,
            "members moved"
        );

        Ok(summary)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_member(&self, user: User, id: &str) -> Result<(), Error> {
        let ids = HashSet::from([id.to_string()]);
        self.delete_members(user, &ids).await?;

        Ok(())
    }

    /// Removes members only; their applications and log entries stay.
    #[tracing::instrument(skip(self))]
    async fn delete_members(&self, user: User, ids: &HashSet<String>) -> Result<usize, Error> {
        self.authorize(&user, "manage_members")?;

        let _guard = self.write_lock.lock().await;

        let mut members: Vec<Member> = self.store.load(Collection::Members).await;
        let before = members.len();
        members.retain(|member| !ids.contains(&member.id));

        self.store.save(Collection::Members, &members).await?;

        Ok(before - members.len())
    }
}

fn move_to_club(
    members: &mut [Member],
    member_ids: &HashSet<String>,
    target_club_id: &str,
    directory: &ClubDirectory,
    user: &User,
) -> Vec<ActivityLog> {
    let to_club_name = directory.name_of(target_club_id);

    members
        .iter_mut()
        .filter(|member| member_ids.contains(&member.id))
        .map(|member| {
            let details = MoveDetails {
                from_club_id: member.club_id.clone(),
                to_club_id: target_club_id.to_string(),
                from_club_name: directory.name_of(&member.club_id),
                to_club_name: to_club_name.clone(),
            };
            member.move_to(target_club_id);

            ActivityLog::moved(&member.application_id, &user.id, details)
        })
        .collect()
}

#[cfg(test)]
const SCENARIO: [(&str, &str); 3] = [
    ("clubs", r#"[{"id":"c1","name":"Chess"},{"id":"c3","name":"Go"}]"#),
    (
        "members",
        r#"[{"id":"m1","club_id":"c1","application_id":"a1"},{"id":"m2","club_id":"c3","application_id":"a2"}]"#,
    ),
    ("applications", r#"[{"id":"a1","full_name":"Ann"},{"id":"a2","full_name":"Bob"}]"#),
];

#[test]
fn move_reassigns_and_logs_once() {
    use super::test_engine;
    use crate::api::ActivityLogAPI;
    use crate::entities::Action;
    use chrono::{DateTime, Utc};
    use tokio_test::block_on;

    let engine = test_engine(SCENARIO);
    let admin = User::admin("admin-1");

    let ids = HashSet::from(["m1".to_string()]);
    let summary = block_on(engine.move_members(admin.clone(), &ids, "c3")).unwrap();
    assert_eq!(summary.moved, 1);
    assert_eq!(summary.target_club_name, "Go");

    let m1 = block_on(engine.find_member(admin.clone(), "m1")).unwrap();
    assert_eq!(m1.member.club_id, "c3");
    assert_eq!(m1.club_name, "Go");

    let m2 = block_on(engine.find_member(admin.clone(), "m2")).unwrap();
    assert_eq!(m2.member.club_id, "c3");
    assert_eq!(m2.member.updated_at, DateTime::<Utc>::default());

    let logs = block_on(engine.activity_logs(admin.clone())).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, Action::Move);
    assert_eq!(logs[0].application_id, "a1");
    assert_eq!(logs[0].admin_id, "admin-1");

    let details = logs[0].move_details().unwrap();
    assert_eq!(details.from_club_id, "c1");
    assert_eq!(details.from_club_name, "Chess");
    assert_eq!(details.to_club_id, "c3");
    assert_eq!(details.to_club_name, "Go");
}

#[test]
fn move_without_destination_changes_nothing() {
    use super::test_engine;
    use crate::api::ActivityLogAPI;
    use tokio_test::block_on;

    let engine = test_engine(SCENARIO);
    let admin = User::admin("admin-1");
    let before = block_on(engine.list_members(admin.clone(), None)).unwrap();

    for ids in [HashSet::new(), HashSet::from(["m1".to_string()])] {
        let err = block_on(engine.move_members(admin.clone(), &ids, "")).unwrap_err();
        assert_eq!(err, error::no_destination_error());
    }

    let after = block_on(engine.list_members(admin.clone(), None)).unwrap();
    assert_eq!(before, after);

    let logs = block_on(engine.activity_logs(admin)).unwrap();
    assert!(logs.is_empty());
}

#[test]
fn move_to_missing_club_uses_placeholder() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine(SCENARIO);
    let admin = User::admin("admin-1");

    let views = block_on(engine.list_members(admin.clone(), Some("c1"))).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].full_name(), Some("Ann"));
    assert_eq!(views[0].club_name, "Chess");

    let ids = HashSet::from(["m1".to_string()]);
    let summary = block_on(engine.move_members(admin.clone(), &ids, "c2")).unwrap();
    assert_eq!(summary.entries[0].reason, "Moved from Chess to Unknown Club");

    let m1 = block_on(engine.find_member(admin.clone(), "m1")).unwrap();
    assert_eq!(m1.member.club_id, "c2");
    assert_eq!(m1.club_name, "Unknown Club");
}

#[test]
fn batch_move_logs_newest_first() {
    use super::test_engine;
    use crate::api::ActivityLogAPI;
    use tokio_test::block_on;

    let engine = test_engine(SCENARIO);
    let admin = User::admin("admin-1");

    let ids = HashSet::from(["m1".to_string(), "m2".to_string(), "ghost".to_string()]);
    let summary = block_on(engine.move_members(admin.clone(), &ids, "c1")).unwrap();
    assert_eq!(summary.moved, 2);

    let logs = block_on(engine.activity_logs(admin)).unwrap();
    let applications: Vec<&str> = logs.iter().map(|log| log.application_id.as_str()).collect();
    assert_eq!(applications, vec!["a2", "a1"]);
    assert_eq!(logs[1].reason, "Moved from Chess to Chess");
}

#[test]
fn failed_move_leaves_members_and_log() {
    use super::Engine;
    use crate::api::ActivityLogAPI;
    use crate::store::{MemoryStore, ReadOnlyStorage, RecordStore};
    use tokio_test::block_on;

    let storage = ReadOnlyStorage(MemoryStore::from_entries(SCENARIO));
    let engine = Engine::new(RecordStore::new(storage)).unwrap();
    let admin = User::admin("admin-1");

    let ids = HashSet::from(["m1".to_string()]);
    let err = block_on(engine.move_members(admin.clone(), &ids, "c3")).unwrap_err();
    assert!(err.is_storage_error());

    let m1 = block_on(engine.find_member(admin.clone(), "m1")).unwrap();
    assert_eq!(m1.member.club_id, "c1");

    let logs = block_on(engine.activity_logs(admin)).unwrap();
    assert!(logs.is_empty());
}

#[test]
fn delete_keeps_history() {
    use super::test_engine;
    use crate::api::ActivityLogAPI;
    use tokio_test::block_on;

    let engine = test_engine(SCENARIO);
    let admin = User::admin("admin-1");

    let ids = HashSet::from(["m1".to_string()]);
    block_on(engine.move_members(admin.clone(), &ids, "c3")).unwrap();

    block_on(engine.delete_member(admin.clone(), "m1")).unwrap();

    let remaining = block_on(engine.list_members(admin.clone(), None)).unwrap();
    let ids: Vec<&str> = remaining.iter().map(|view| view.member.id.as_str()).collect();
    assert_eq!(ids, vec!["m2"]);

    let err = block_on(engine.find_member(admin.clone(), "m1")).unwrap_err();
    assert!(err.is_not_found_error());

    let history = block_on(engine.history_for(admin.clone(), "a1")).unwrap();
    assert_eq!(history.len(), 1);

    let removed = block_on(engine.delete_members(
        admin.clone(),
        &HashSet::from(["m2".to_string(), "m1".to_string()]),
    ))
    .unwrap();
    assert_eq!(removed, 1);
}

#[test]
fn move_keeps_log_entries_of_other_kinds() {
    use super::test_engine;
    use crate::api::ActivityLogAPI;
    use crate::entities::Action;
    use tokio_test::block_on;

    let [clubs, members, applications] = SCENARIO;
    let engine = test_engine([
        clubs,
        members,
        applications,
        (
            "activity_logs",
            r#"[
                {"id":"old","application_id":"a2","action":"Delete","reason":"duplicate"},
                {"id":"odd","application_id":"a1","action":"Move","timestamp":12}
            ]"#,
        ),
    ]);
    let admin = User::admin("admin-1");

    let ids = HashSet::from(["m1".to_string()]);
    block_on(engine.move_members(admin.clone(), &ids, "c3")).unwrap();

    let logs = block_on(engine.activity_logs(admin.clone())).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].action, Action::Move);
    assert_eq!(logs[1].id, "old");
    assert_eq!(logs[1].action, Action::Other("Delete".into()));

    block_on(engine.move_members(admin.clone(), &ids, "c1")).unwrap();

    let logs = block_on(engine.activity_logs(admin)).unwrap();
    let ids: Vec<&str> = logs.iter().skip(2).map(|log| log.id.as_str()).collect();
    assert_eq!(ids, vec!["old"]);
}

#[test]
fn clubs_saved_with_timestamps_keep_their_names() {
    use super::test_engine;
    use crate::api::ClubAPI;
    use crate::entities::ClubDraft;
    use tokio_test::block_on;

    let [_, members, applications] = SCENARIO;
    let engine = test_engine([
        (
            "clubs",
            r#"[{"_id":"c1","name":"Chess","established_date":"2024-01-01T00:00:00.000Z"}]"#,
        ),
        members,
        applications,
    ]);
    let admin = User::admin("admin-1");

    let views = block_on(engine.list_members(admin.clone(), None)).unwrap();
    assert_eq!(views[0].club_name, "Chess");

    let draft = ClubDraft {
        name: "Go".into(),
        ..Default::default()
    };
    block_on(engine.create_club(admin.clone(), draft)).unwrap();

    let clubs = block_on(engine.list_clubs(admin)).unwrap();
    let names: Vec<&str> = clubs.iter().map(|club| club.name.as_str()).collect();
    assert_eq!(names, vec!["Chess", "Go"]);
}
