use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Club {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub club_leader_name: String,
    pub is_active: bool,
    #[serde(deserialize_with = "date_or_timestamp")]
    pub established_date: Option<NaiveDate>,
    pub description: String,
    pub avatar_url: Option<String>,
}

/// Administrator-entered club fields, used for both creation and edits.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClubDraft {
    #[validate(length(min = 1, message = "club name is required"))]
    pub name: String,
    pub club_leader_name: String,
    pub is_active: bool,
    #[serde(deserialize_with = "date_or_timestamp")]
    pub established_date: Option<NaiveDate>,
    pub description: String,
    pub avatar_url: Option<String>,
}

impl Club {
    pub fn new(draft: ClubDraft) -> Self {
        let mut club = Self {
            id: Uuid::new_v4().to_string(),
            ..Default::default()
        };
        club.apply(draft);

        club
    }

    pub fn apply(&mut self, draft: ClubDraft) {
        self.name = draft.name;
        self.club_leader_name = draft.club_leader_name;
        self.is_active = draft.is_active;
        self.established_date = draft.established_date;
        self.description = draft.description;
        self.avatar_url = draft.avatar_url;
    }
}

/// Reads a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, which is
/// what date pickers hand back.
fn date_or_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(None),
    };

    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(&text)
        .map(|timestamp| Some(timestamp.date_naive()))
        .map_err(de::Error::custom)
}

#[test]
fn partial_club_record_fills_defaults() {
    let club: Club = serde_json::from_str(r#"{"_id":"c1","name":"Chess"}"#).unwrap();

    assert_eq!(club.id, "c1");
    assert_eq!(club.name, "Chess");
    assert!(!club.is_active);
    assert_eq!(club.established_date, None);
}

#[test]
fn established_date_accepts_timestamps() {
    let clubs: Vec<Club> = serde_json::from_str(
        r#"[
            {"_id":"c1","name":"Chess","established_date":"2024-01-01T00:00:00.000Z"},
            {"_id":"c2","name":"Go","established_date":"2019-09-30"},
            {"_id":"c3","name":"Art","established_date":null}
        ]"#,
    )
    .unwrap();

    assert_eq!(clubs[0].established_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(clubs[1].established_date, NaiveDate::from_ymd_opt(2019, 9, 30));
    assert_eq!(clubs[2].established_date, None);

    let draft: ClubDraft =
        serde_json::from_str(r#"{"name":"Chess","established_date":"2024-01-01T00:00:00Z"}"#)
            .unwrap();
    assert_eq!(draft.established_date, NaiveDate::from_ymd_opt(2024, 1, 1));
}
