use axum::extract::{Extension, Json, Path};

use crate::auth::User;
use crate::entities::ActivityLog;
use crate::error::Error;
use crate::server::DynAPI;

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<ActivityLog>>, Error> {
    let logs = api.activity_logs(user).await?;

    Ok(logs.into())
}

pub async fn history(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(application_id): Path<String>,
) -> Result<Json<Vec<ActivityLog>>, Error> {
    let logs = api.history_for(user, &application_id).await?;

    Ok(logs.into())
}
