use std::collections::HashSet;

use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::entities::{MemberView, MoveSummary};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ListParams {
    club_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteManyParams {
    ids: HashSet<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteManyResult {
    removed: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MoveParams {
    member_ids: HashSet<String>,
    #[serde(default)]
    target_club_id: String,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MemberView>>, Error> {
    let members = api.list_members(user, params.club_id.as_deref()).await?;

    Ok(members.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<MemberView>, Error> {
    let member = api.find_member(user, &id).await?;

    Ok(member.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<()>, Error> {
    api.delete_member(user, &id).await?;

    Ok(().into())
}

pub async fn delete_many(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<DeleteManyParams>,
) -> Result<Json<DeleteManyResult>, Error> {
    let removed = api.delete_members(user, &params.ids).await?;

    Ok(DeleteManyResult { removed }.into())
}

pub async fn move_to_club(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<MoveParams>,
) -> Result<Json<MoveSummary>, Error> {
    let summary = api
        .move_members(user, &params.member_ids, &params.target_club_id)
        .await?;

    Ok(summary.into())
}
