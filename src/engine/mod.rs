mod activity_log_api;
mod application_api;
mod club_api;
mod dashboard_api;
mod directory;
mod helpers;
mod member_api;
mod reconciler;

pub use directory::{ClubDirectory, UNKNOWN_CLUB};
pub use reconciler::reconcile;

use oso::Oso;
use tokio::sync::Mutex;

use crate::{
    api::API,
    auth::{authorizor, Console, User},
    error::{self, Error},
    store::RecordStore,
};

pub struct Engine {
    store: RecordStore,
    authorizor: Oso,
    // held for the whole read-modify-write of every mutation
    write_lock: Mutex<()>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: RecordStore) -> Result<Self, Error> {
        Ok(Self {
            store,
            authorizor: authorizor::new()?,
            write_lock: Mutex::new(()),
        })
    }
}

impl Engine {
    pub fn authorize(&self, user: &User, action: &str) -> Result<(), Error> {
        if self
            .authorizor
            .is_allowed(user.clone(), action.to_string(), Console::default())?
        {
            return Ok(());
        }

        tracing::warn!(user = %user.id, action, "action not permitted");

        Err(error::unauthorized_error())
    }
}

impl API for Engine {}

/// Engine over an in-memory store seeded with raw collection payloads.
#[cfg(test)]
pub(crate) fn test_engine<const N: usize>(entries: [(&str, &str); N]) -> Engine {
    use crate::store::MemoryStore;

    Engine::new(RecordStore::new(MemoryStore::from_entries(entries))).unwrap()
}

#[test]
fn new_engine() {
    let engine = test_engine([]);

    assert!(engine.authorize(&User::admin("admin-1"), "manage_members").is_ok());
    assert!(engine
        .authorize(&User::viewer("viewer-1"), "manage_members")
        .unwrap_err()
        .code
        == 102);
}
