mod handlers;
mod identity;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch},
    Router,
};

use crate::api::API;
use crate::error::{self, Error};
use crate::server::handlers::{activity_logs, applications, clubs, dashboard, members};

pub use identity::identify;

pub(crate) type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/clubs", get(clubs::list).post(clubs::create))
        .route(
            "/clubs/:id",
            get(clubs::find).put(clubs::update).delete(clubs::delete),
        )
        .route(
            "/applications",
            get(applications::list).post(applications::submit),
        )
        .route(
            "/applications/:id",
            get(applications::find).put(applications::update),
        )
        .route("/applications/:id/approve", patch(applications::approve))
        .route("/applications/:id/reject", patch(applications::reject))
        .route("/applications/:id/history", get(activity_logs::history))
        .route(
            "/members",
            get(members::list)
                .patch(members::move_to_club)
                .delete(members::delete_many),
        )
        .route("/members/:id", get(members::find).delete(members::delete))
        .route("/activity_logs", get(activity_logs::list))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/export", get(dashboard::export))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(%err, "server stopped");
            error::unexpected_error()
        })
}
