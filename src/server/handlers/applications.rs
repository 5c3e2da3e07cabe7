use axum::extract::{Extension, Json, Path, Query};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::entities::{Applicant, Application, ApplicationStatus, Member};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ListParams {
    status: Option<ApplicationStatus>,
}

#[derive(Serialize, Deserialize)]
pub struct ApproveParams {
    notes: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RejectParams {
    reason: String,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Application>>, Error> {
    let applications = api.list_applications(user, params.status).await?;

    Ok(applications.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Application>, Error> {
    let application = api.find_application(user, &id).await?;

    Ok(application.into())
}

pub async fn submit(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(applicant): Json<Applicant>,
) -> Result<Json<Application>, Error> {
    let application = api.submit_application(user, applicant).await?;

    Ok(application.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
    Json(applicant): Json<Applicant>,
) -> Result<Json<Application>, Error> {
    let application = api.update_application(user, &id, applicant).await?;

    Ok(application.into())
}

pub async fn approve(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
    Json(params): Json<ApproveParams>,
) -> Result<Json<Member>, Error> {
    let member = api.approve_application(user, &id, params.notes).await?;

    Ok(member.into())
}

pub async fn reject(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<String>,
    Json(params): Json<RejectParams>,
) -> Result<Json<Application>, Error> {
    let application = api.reject_application(user, &id, params.reason).await?;

    Ok(application.into())
}
