use std::collections::HashSet;

use async_trait::async_trait;

use crate::auth::User;
use crate::entities::{
    ActivityLog, Applicant, Application, ApplicationStatus, Club, ClubDraft, DashboardStats,
    Member, MemberExportRow, MemberView, MoveSummary,
};
use crate::error::Error;

#[async_trait]
pub trait ClubAPI {
    async fn list_clubs(&self, user: User) -> Result<Vec<Club>, Error>;
    async fn find_club(&self, user: User, id: &str) -> Result<Club, Error>;
    async fn create_club(&self, user: User, draft: ClubDraft) -> Result<Club, Error>;
    async fn update_club(&self, user: User, id: &str, draft: ClubDraft) -> Result<Club, Error>;
    async fn delete_club(&self, user: User, id: &str) -> Result<(), Error>;

    /// Display name of a club, or the unknown-club placeholder.
    async fn club_name(&self, user: User, id: &str) -> Result<String, Error>;
}

#[async_trait]
pub trait ApplicationAPI {
    async fn submit_application(
        &self,
        user: User,
        applicant: Applicant,
    ) -> Result<Application, Error>;

    async fn list_applications(
        &self,
        user: User,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, Error>;

    async fn find_application(&self, user: User, id: &str) -> Result<Application, Error>;

    async fn update_application(
        &self,
        user: User,
        id: &str,
        applicant: Applicant,
    ) -> Result<Application, Error>;

    async fn approve_application(
        &self,
        user: User,
        id: &str,
        notes: Option<String>,
    ) -> Result<Member, Error>;

    async fn reject_application(
        &self,
        user: User,
        id: &str,
        reason: String,
    ) -> Result<Application, Error>;
}

#[async_trait]
pub trait MemberAPI {
    async fn list_members(
        &self,
        user: User,
        club_id: Option<&str>,
    ) -> Result<Vec<MemberView>, Error>;

    async fn find_member(&self, user: User, id: &str) -> Result<MemberView, Error>;

    async fn move_members(
        &self,
        user: User,
        member_ids: &HashSet<String>,
        target_club_id: &str,
    ) -> Result<MoveSummary, Error>;

    async fn delete_member(&self, user: User, id: &str) -> Result<(), Error>;

    async fn delete_members(&self, user: User, ids: &HashSet<String>) -> Result<usize, Error>;
}

#[async_trait]
pub trait ActivityLogAPI {
    async fn history_for(
        &self,
        user: User,
        application_id: &str,
    ) -> Result<Vec<ActivityLog>, Error>;

    async fn activity_logs(&self, user: User) -> Result<Vec<ActivityLog>, Error>;
}

#[async_trait]
pub trait DashboardAPI {
    async fn dashboard_stats(&self, user: User) -> Result<DashboardStats, Error>;

    async fn export_members(
        &self,
        user: User,
        club_id: Option<&str>,
    ) -> Result<Vec<MemberExportRow>, Error>;
}

pub trait API: ClubAPI + ApplicationAPI + MemberAPI + ActivityLogAPI + DashboardAPI {}
