use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Applicant, Application, ApplicationReview};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(alias = "_id")]
    pub id: String,
    pub application_id: String,
    pub club_id: String,
    pub join_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Builds the member record for an approved application.
    pub fn from_application(application: &Application) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            application_id: application.id.clone(),
            club_id: application.applicant.desired_club_id.clone(),
            join_date: now,
            updated_at: now,
        }
    }

    pub fn move_to(&mut self, club_id: &str) {
        self.club_id = club_id.to_string();
        self.updated_at = Utc::now();
    }
}

/// Display projection of a member joined with its application and club.
/// Computed on every read and never persisted. The member's own id and
/// timestamps are never shadowed by the application's.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberView {
    #[serde(flatten)]
    pub member: Member,
    #[serde(flatten)]
    pub applicant: Option<Applicant>,
    #[serde(flatten)]
    pub review: Option<ApplicationReview>,
    pub club_name: String,
}

impl MemberView {
    pub fn full_name(&self) -> Option<&str> {
        self.applicant.as_ref().map(|a| a.full_name.as_str())
    }
}

/// Outcome of moving a batch of members to another club.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveSummary {
    pub moved: usize,
    pub target_club_id: String,
    pub target_club_name: String,
    pub entries: Vec<crate::entities::ActivityLog>,
}
