use axum::extract::{Extension, Json, Path};

use crate::auth::User;
use crate::entities::{Club, ClubDraft};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Club>>, Error> {
    let clubs = api.list_clubs(user).await?;

    Ok(clubs.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Club>, Error> {
    let club = api.find_club(user, &id).await?;

    Ok(club.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(draft): Json<ClubDraft>,
) -> Result<Json<Club>, Error> {
    let club = api.create_club(user, draft).await?;

    Ok(club.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
    Json(draft): Json<ClubDraft>,
) -> Result<Json<Club>, Error> {
    let club = api.update_club(user, &id, draft).await?;

    Ok(club.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<()>, Error> {
    api.delete_club(user, &id).await?;

    Ok(().into())
}
