use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{invalid_invocation_error, Error};

/// The fields a prospective member fills in on the application form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Applicant {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "a desired club is required"))]
    pub desired_club_id: String,
    #[validate(length(min = 1, message = "strengths are required"))]
    pub strengths: String,
    #[validate(length(min = 1, message = "a reason for applying is required"))]
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub applicant: Applicant,
    pub status: Status,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review state of an application, as shown next to the member it produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Review {
    pub status: Status,
    pub notes: Option<String>,
    #[serde(rename = "created_at")]
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Approved")]
    Approved,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Approved => "approved".into(),
            Self::Rejected => "rejected".into(),
        }
    }
}

impl Application {
    pub fn new(applicant: Applicant) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            applicant,
            status: Status::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn review(&self) -> Review {
        Review {
            status: self.status,
            notes: self.notes.clone(),
            submitted_at: self.created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, Status::Pending)
    }

    pub fn edit(&mut self, applicant: Applicant) {
        self.applicant = applicant;
        self.updated_at = Utc::now();
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn approve(&mut self, notes: Option<String>) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Approved;
                if notes.is_some() {
                    self.notes = notes;
                }
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %self.id))]
    pub fn reject(&mut self, reason: String) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                self.status = Status::Rejected;
                self.notes = Some(reason);
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }
}

#[test]
fn application_decisions_are_terminal() {
    let mut application = Application::new(Applicant::default());
    assert!(application.is_pending());

    application.approve(Some("welcome".into())).unwrap();
    assert_eq!(application.status, Status::Approved);
    assert_eq!(application.notes.as_deref(), Some("welcome"));

    assert!(application.reject("too late".into()).is_err());
    assert!(application.approve(None).is_err());
    assert_eq!(application.status, Status::Approved);
}

#[test]
fn legacy_status_spelling_is_accepted() {
    let application: Application =
        serde_json::from_str(r#"{"_id":"a1","full_name":"Ann","status":"Approved"}"#).unwrap();

    assert_eq!(application.id, "a1");
    assert_eq!(application.applicant.full_name, "Ann");
    assert_eq!(application.status, Status::Approved);
}
