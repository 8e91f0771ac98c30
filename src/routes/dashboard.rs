use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{AdminDashboard, DashboardRoute, UserDashboard},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard_route))
        .route("/user", get(user_dashboard))
        .route("/admin", get(admin_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard that matches the stored role", body = ApiResponse<DashboardRoute>),
        (status = 401, description = "Not logged in or user record missing"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard_route(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardRoute>>> {
    let resp = dashboard_service::route(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/user",
    responses(
        (status = 200, description = "Customer dashboard", body = ApiResponse<UserDashboard>),
        (status = 403, description = "Not a customer account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn user_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserDashboard>>> {
    let resp = dashboard_service::user_dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    responses(
        (status = 200, description = "Admin dashboard", body = ApiResponse<AdminDashboard>),
        (status = 403, description = "Not an admin account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminDashboard>>> {
    let resp = dashboard_service::admin_dashboard(&state, &user).await?;
    Ok(Json(resp))
}
