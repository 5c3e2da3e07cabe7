use crate::entities::{ActivityLog, Application, Club, Member};
use crate::error::{self, Error};

/// Records addressed by an opaque string id.
pub trait Record {
    fn id(&self) -> &str;
}

impl Record for Club {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Member {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ActivityLog {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn position_of<T: Record>(records: &[T], id: &str) -> Result<usize, Error> {
    records
        .iter()
        .position(|record| record.id() == id)
        .ok_or_else(error::not_found_error)
}

pub fn find_by_id<T: Record + Clone>(records: &[T], id: &str) -> Result<T, Error> {
    let index = position_of(records, id)?;

    Ok(records[index].clone())
}

/// Prepends new entries so the log stays newest-first. Entries created in the
/// same operation end up with the last-created one on top.
pub fn prepend_entries(logs: Vec<ActivityLog>, entries: &[ActivityLog]) -> Vec<ActivityLog> {
    entries.iter().rev().cloned().chain(logs).collect()
}

#[test]
fn prepended_entries_are_newest_first() {
    let entry = |id: &str| ActivityLog {
        id: id.into(),
        ..Default::default()
    };

    let logs = prepend_entries(vec![entry("old")], &[entry("first"), entry("second")]);
    let ids: Vec<&str> = logs.iter().map(|log| log.id()).collect();

    assert_eq!(ids, vec!["second", "first", "old"]);
}
