use axum::{routing::get, Json, Router};
use tracing::debug;

use crate::{middleware::auth::AdminUser, state::AppState};
use shared::models::auth::responses::AdminDashboardResponse;

pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(dashboard))
}

async fn dashboard(AdminUser(user): AdminUser) -> Json<AdminDashboardResponse> {
    debug!("Admin {} opened the dashboard", user.user_id);
    Json(AdminDashboardResponse {
        user_id: user.user_id,
        access_level: user.access_level,
    })
}
