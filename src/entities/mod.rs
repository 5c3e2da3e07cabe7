mod activity_log;
mod application;
mod club;
mod dashboard;
mod member;

pub use activity_log::{Action, ActivityLog, MoveDetails};
pub use application::{
    Applicant, Application, Review as ApplicationReview, Status as ApplicationStatus,
};
pub use club::{Club, ClubDraft};
pub use dashboard::{ClubApplicationCounts, DashboardStats, MemberExportRow, StatusCounts};
pub use member::{Member, MemberView, MoveSummary};
