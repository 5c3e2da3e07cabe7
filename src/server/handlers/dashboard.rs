use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::entities::{DashboardStats, MemberExportRow};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ExportParams {
    club_id: Option<String>,
}

pub async fn stats(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<DashboardStats>, Error> {
    let stats = api.dashboard_stats(user).await?;

    Ok(stats.into())
}

pub async fn export(
    Extension(api): Extension<DynAPI>,
    user: User,
    Query(params): Query<ExportParams>,
) -> Result<Json<Vec<MemberExportRow>>, Error> {
    let rows = api.export_members(user, params.club_id.as_deref()).await?;

    Ok(rows.into())
}
