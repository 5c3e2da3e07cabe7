//! Record Store: typed access to the JSON collections the console persists.
//!
//! Each collection lives under a fixed key as one JSON-encoded array. Reads
//! are forgiving: a missing, unreadable or malformed collection is an empty
//! one, and a single record that does not decode is skipped rather than
//! emptying its collection. Writes replace whole collections, keep the
//! skipped records, and report failures to the caller.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Clubs,
    Applications,
    Members,
    ActivityLogs,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Clubs => "clubs",
            Self::Applications => "applications",
            Self::Members => "members",
            Self::ActivityLogs => "activity_logs",
        }
    }
}

/// Raw key-value storage underneath the Record Store.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Writes every entry or none of them.
    async fn set_many(&self, entries: &[(&'static str, String)]) -> Result<(), Error>;
}

/// Collection replacements that are committed together.
#[derive(Default)]
pub struct Batch {
    replacements: Vec<Replacement>,
}

struct Replacement {
    collection: Collection,
    records: Vec<Value>,
    decodes: fn(&Value) -> bool,
}

fn decodes<T: DeserializeOwned>(record: &Value) -> bool {
    T::deserialize(record).is_ok()
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<T: Serialize + DeserializeOwned>(
        &mut self,
        collection: Collection,
        records: &[T],
    ) -> Result<&mut Self, Error> {
        let records = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;

        self.replacements
            .retain(|replacement| replacement.collection != collection);
        self.replacements.push(Replacement {
            collection,
            records,
            decodes: decodes::<T>,
        });

        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

pub struct RecordStore {
    storage: Box<dyn Storage>,
}

impl RecordStore {
    pub fn new<S: Storage + 'static>(storage: S) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Reads a collection record by record. Records that do not decode are
    /// skipped here and carried over untouched by the next `commit`.
    #[tracing::instrument(skip(self))]
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let records = match self.stored_records(collection).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(?err, "collection unreadable, treating as empty");
                return Vec::new();
            }
        };

        let total = records.len();
        let decoded: Vec<T> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();

        if decoded.len() < total {
            tracing::warn!(
                skipped = total - decoded.len(),
                "records in collection could not be read"
            );
        }

        decoded
    }

    #[tracing::instrument(skip(self, records), fields(len = records.len()))]
    pub async fn save<T: Serialize + DeserializeOwned + Sync>(
        &self,
        collection: Collection,
        records: &[T],
    ) -> Result<(), Error> {
        let mut batch = Batch::new();
        batch.put(collection, records)?;

        self.commit(batch).await
    }

    /// Writes every replacement in one storage call. Stored records that the
    /// replacing type cannot decode are appended unchanged, so a collection
    /// never loses entries it was unable to read.
    #[tracing::instrument(skip_all, fields(len = batch.replacements.len()))]
    pub async fn commit(&self, batch: Batch) -> Result<(), Error> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut entries = Vec::with_capacity(batch.replacements.len());
        for replacement in batch.replacements {
            let mut records = replacement.records;

            let kept: Vec<Value> = self
                .stored_records(replacement.collection)
                .await?
                .into_iter()
                .filter(|record| !(replacement.decodes)(record))
                .collect();
            if !kept.is_empty() {
                tracing::warn!(
                    collection = replacement.collection.key(),
                    kept = kept.len(),
                    "carrying over unreadable records"
                );
                records.extend(kept);
            }

            entries.push((replacement.collection.key(), serde_json::to_string(&records)?));
        }

        self.storage.set_many(&entries).await
    }

    /// The stored collection as raw JSON records. Absent or malformed
    /// documents are empty.
    async fn stored_records(&self, collection: Collection) -> Result<Vec<Value>, Error> {
        let raw = match self.storage.get(collection.key()).await? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(%err, "collection malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

/// Storage whose writes always fail, for exercising failure paths.
#[cfg(test)]
pub(crate) struct ReadOnlyStorage(pub MemoryStore);

#[cfg(test)]
#[async_trait]
impl Storage for ReadOnlyStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.0.get(key).await
    }

    async fn set_many(&self, _: &[(&'static str, String)]) -> Result<(), Error> {
        Err(crate::error::storage_error("read-only storage"))
    }
}

#[test]
fn saved_collection_reads_back_equal() {
    use crate::entities::{Club, Member};
    use chrono::Utc;
    use tokio_test::block_on;

    let store = RecordStore::new(MemoryStore::default());

    let clubs = vec![
        Club {
            id: "c1".into(),
            name: "Chess".into(),
            is_active: true,
            ..Default::default()
        },
        Club {
            id: "c2".into(),
            name: "Go".into(),
            avatar_url: Some("go.png".into()),
            ..Default::default()
        },
    ];
    let members = vec![Member {
        id: "m1".into(),
        application_id: "a1".into(),
        club_id: "c1".into(),
        join_date: Utc::now(),
        updated_at: Utc::now(),
    }];

    block_on(store.save(Collection::Clubs, &clubs)).unwrap();
    block_on(store.save(Collection::Members, &members)).unwrap();

    let loaded: Vec<Club> = block_on(store.load(Collection::Clubs));
    assert_eq!(loaded, clubs);

    let loaded: Vec<Member> = block_on(store.load(Collection::Members));
    assert_eq!(loaded, members);
}

#[test]
fn absent_or_malformed_collections_load_empty() {
    use crate::entities::{Application, Member};
    use tokio_test::block_on;

    let store = RecordStore::new(MemoryStore::from_entries([
        ("members", "{not json"),
        ("applications", r#"{"id":"a1"}"#),
    ]));

    let members: Vec<Member> = block_on(store.load(Collection::Members));
    assert!(members.is_empty());

    let applications: Vec<Application> = block_on(store.load(Collection::Applications));
    assert!(applications.is_empty());

    let logs: Vec<crate::entities::ActivityLog> = block_on(store.load(Collection::ActivityLogs));
    assert!(logs.is_empty());
}

#[test]
fn failed_write_is_reported_and_leaves_data() {
    use crate::entities::Club;
    use tokio_test::block_on;

    let store = RecordStore::new(ReadOnlyStorage(MemoryStore::from_entries([(
        "clubs",
        r#"[{"id":"c1","name":"Chess"}]"#,
    )])));

    let err = block_on(store.save::<Club>(Collection::Clubs, &[])).unwrap_err();
    assert!(err.is_storage_error());

    let clubs: Vec<Club> = block_on(store.load(Collection::Clubs));
    assert_eq!(clubs.len(), 1);
}

#[test]
fn batch_keeps_last_write_per_collection() {
    let mut batch = Batch::new();
    batch
        .put(Collection::Members, &["first".to_string()])
        .unwrap()
        .put(Collection::Members, &["second".to_string()])
        .unwrap();

    assert_eq!(batch.replacements.len(), 1);
    assert_eq!(batch.replacements[0].records, vec![Value::from("second")]);
}

#[test]
fn one_unreadable_record_does_not_empty_its_collection() {
    use crate::entities::Club;
    use tokio_test::block_on;

    let store = RecordStore::new(MemoryStore::from_entries([(
        "clubs",
        r#"[{"id":"c1","name":"Chess"},{"id":"c2","name":7},{"id":"c3","name":"Go"}]"#,
    )]));

    let clubs: Vec<Club> = block_on(store.load(Collection::Clubs));
    let names: Vec<&str> = clubs.iter().map(|club| club.name.as_str()).collect();
    assert_eq!(names, vec!["Chess", "Go"]);
}

#[test]
fn rewrite_keeps_records_it_could_not_read() {
    use crate::entities::Club;
    use tokio_test::block_on;

    let store = RecordStore::new(MemoryStore::from_entries([(
        "clubs",
        r#"[{"id":"c1","name":"Chess"},{"id":"c2","name":7}]"#,
    )]));

    let mut clubs: Vec<Club> = block_on(store.load(Collection::Clubs));
    clubs.retain(|club| club.id != "c1");
    clubs.push(Club {
        id: "c3".into(),
        name: "Go".into(),
        ..Default::default()
    });
    block_on(store.save(Collection::Clubs, &clubs)).unwrap();

    let raw = block_on(store.stored_records(Collection::Clubs)).unwrap();
    let ids: Vec<&str> = raw.iter().filter_map(|record| record["id"].as_str()).collect();
    assert_eq!(ids, vec!["c3", "c2"]);
    assert_eq!(raw[1]["name"], 7);
}
