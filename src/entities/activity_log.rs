use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityLog {
    #[serde(alias = "_id")]
    pub id: String,
    pub application_id: String,
    pub admin_id: String,
    pub action: Action,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub details: Value,
}

/// Kind of administrative action. Names this console does not write itself
/// are kept verbatim so older or foreign entries survive a rewrite of the log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    #[default]
    Move,
    Approve,
    Reject,
    Other(String),
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::Move => "Move",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Move" => Self::Move,
            "Approve" => Self::Approve,
            "Reject" => Self::Reject,
            _ => Self::Other(name),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.name().to_string()
    }
}

/// Source and destination of a member move, recorded in the entry details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveDetails {
    pub from_club_id: String,
    pub to_club_id: String,
    pub from_club_name: String,
    pub to_club_name: String,
}

impl ActivityLog {
    pub fn new(
        application_id: &str,
        admin_id: &str,
        action: Action,
        reason: String,
        details: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            application_id: application_id.to_string(),
            admin_id: admin_id.to_string(),
            action,
            reason,
            timestamp: Utc::now(),
            details,
        }
    }

    pub fn moved(application_id: &str, admin_id: &str, details: MoveDetails) -> Self {
        let reason = format!(
            "Moved from {} to {}",
            details.from_club_name, details.to_club_name
        );

        Self::new(
            application_id,
            admin_id,
            Action::Move,
            reason,
            json!(details),
        )
    }

    /// Details of a `Move` entry, whether stored as an object or as its JSON
    /// text.
    pub fn move_details(&self) -> Option<MoveDetails> {
        if self.action != Action::Move {
            return None;
        }

        match &self.details {
            Value::String(text) => serde_json::from_str(text).ok(),
            details => serde_json::from_value(details.clone()).ok(),
        }
    }
}

#[test]
fn move_entry_names_both_clubs() {
    let entry = ActivityLog::moved(
        "a1",
        "admin-1",
        MoveDetails {
            from_club_id: "c1".into(),
            to_club_id: "c2".into(),
            from_club_name: "Chess".into(),
            to_club_name: "Go".into(),
        },
    );

    assert_eq!(entry.action, Action::Move);
    assert_eq!(entry.reason, "Moved from Chess to Go");
    assert_eq!(entry.details["to_club_id"], "c2");
    assert_eq!(entry.move_details().unwrap().from_club_name, "Chess");
}

#[test]
fn unknown_action_survives_a_rewrite() {
    let entry: ActivityLog =
        serde_json::from_str(r#"{"_id":"l1","action":"Delete","reason":"spam"}"#).unwrap();
    assert_eq!(entry.action, Action::Other("Delete".into()));
    assert_eq!(entry.move_details(), None);

    let written = serde_json::to_value(&entry).unwrap();
    assert_eq!(written["action"], "Delete");
    assert_eq!(written["id"], "l1");
}

#[test]
fn move_details_stored_as_text_are_read() {
    let entry: ActivityLog = serde_json::from_str(
        r#"{"id":"l1","action":"Move","details":"{\"from_club_id\":\"c1\",\"to_club_id\":\"c2\",\"from_club_name\":\"Chess\",\"to_club_name\":\"Go\"}"}"#,
    )
    .unwrap();

    let details = entry.move_details().unwrap();
    assert_eq!(details.from_club_id, "c1");
    assert_eq!(details.to_club_name, "Go");
}
