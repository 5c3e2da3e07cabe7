use super::helpers::{find_by_id, position_of};
use super::{ClubDirectory, Engine};

use async_trait::async_trait;
use validator::Validate;

use crate::{
    api::ClubAPI,
    auth::User,
    entities::{Club, ClubDraft},
    error::Error,
    store::Collection,
};

#[async_trait]
impl ClubAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_clubs(&self, user: User) -> Result<Vec<Club>, Error> {
        self.authorize(&user, "read")?;

        Ok(self.store.load(Collection::Clubs).await)
    }

    #[tracing::instrument(skip(self))]
    async fn find_club(&self, user: User, id: &str) -> Result<Club, Error> {
        self.authorize(&user, "read")?;

        let clubs: Vec<Club> = self.store.load(Collection::Clubs).await;

        find_by_id(&clubs, id)
    }

    #[tracing::instrument(skip(self))]
    async fn create_club(&self, user: User, draft: ClubDraft) -> Result<Club, Error> {
        self.authorize(&user, "manage_clubs")?;
        draft.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut clubs: Vec<Club> = self.store.load(Collection::Clubs).await;
        let club = Club::new(draft);
        clubs.push(club.clone());

        self.store.save(Collection::Clubs, &clubs).await?;

        tracing::info!(id = %club.id, "club created");

        Ok(club)
    }

    #[tracing::instrument(skip(self))]
    async fn update_club(&self, user: User, id: &str, draft: ClubDraft) -> Result<Club, Error> {
        self.authorize(&user, "manage_clubs")?;
        draft.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut clubs: Vec<Club> = self.store.load(Collection::Clubs).await;
        let index = position_of(&clubs, id)?;
        clubs[index].apply(draft);

        self.store.save(Collection::Clubs, &clubs).await?;

        Ok(clubs.swap_remove(index))
    }

    /// Removes the club only; members and applications that still point at
    /// it resolve to the unknown-club placeholder afterwards.
    #[tracing::instrument(skip(self))]
    async fn delete_club(&self, user: User, id: &str) -> Result<(), Error> {
        self.authorize(&user, "manage_clubs")?;

        let _guard = self.write_lock.lock().await;

        let mut clubs: Vec<Club> = self.store.load(Collection::Clubs).await;
        let index = position_of(&clubs, id)?;
        clubs.remove(index);

        self.store.save(Collection::Clubs, &clubs).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn club_name(&self, user: User, id: &str) -> Result<String, Error> {
        self.authorize(&user, "read")?;

        let directory = ClubDirectory::load(&self.store).await;

        Ok(directory.name_of(id))
    }
}

#[test]
fn club_lifecycle() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine([]);
    let admin = User::admin("admin-1");

    let draft = ClubDraft {
        name: "Chess".into(),
        club_leader_name: "Bea".into(),
        is_active: true,
        ..Default::default()
    };
    let club = block_on(engine.create_club(admin.clone(), draft)).unwrap();

    let name = block_on(engine.club_name(admin.clone(), &club.id)).unwrap();
    assert_eq!(name, "Chess");

    let renamed = ClubDraft {
        name: "Chess & Go".into(),
        ..Default::default()
    };
    let updated = block_on(engine.update_club(admin.clone(), &club.id, renamed)).unwrap();
    assert_eq!(updated.id, club.id);
    assert_eq!(updated.name, "Chess & Go");
    assert!(!updated.is_active);

    block_on(engine.delete_club(admin.clone(), &club.id)).unwrap();

    let name = block_on(engine.club_name(admin.clone(), &club.id)).unwrap();
    assert_eq!(name, "Unknown Club");

    let clubs = block_on(engine.list_clubs(admin.clone())).unwrap();
    assert!(clubs.is_empty());
}

#[test]
fn club_drafts_are_validated() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine([]);

    let err = block_on(engine.create_club(User::admin("admin-1"), ClubDraft::default()))
        .unwrap_err();
    assert!(err.is_invalid_input_error());

    let err = block_on(engine.update_club(
        User::admin("admin-1"),
        "missing",
        ClubDraft {
            name: "Go".into(),
            ..Default::default()
        },
    ))
    .unwrap_err();
    assert!(err.is_not_found_error());
}

#[test]
fn viewers_cannot_manage_clubs() {
    use super::test_engine;
    use tokio_test::block_on;

    let engine = test_engine([("clubs", r#"[{"id":"c1","name":"Chess"}]"#)]);
    let viewer = User::viewer("viewer-1");

    let clubs = block_on(engine.list_clubs(viewer.clone())).unwrap();
    assert_eq!(clubs.len(), 1);

    let err = block_on(engine.delete_club(viewer.clone(), "c1")).unwrap_err();
    assert_eq!(err, crate::error::unauthorized_error());

    let clubs = block_on(engine.list_clubs(viewer)).unwrap();
    assert_eq!(clubs.len(), 1);
}
