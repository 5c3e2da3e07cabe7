use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClubApplicationCounts {
    pub club_id: String,
    pub club_name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clubs: usize,
    #[serde(flatten)]
    pub applications: StatusCounts,
    pub clubs: Vec<ClubApplicationCounts>,
}

/// One row of the approved member export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberExportRow {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
    pub club_name: String,
    pub join_date: DateTime<Utc>,
}
