use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};

use crate::{
    dto::users::UpdatePhotoRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/photo", patch(update_photo))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Own profile", body = ApiResponse<User>),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/users/me/photo",
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo URL updated; blank clears it", body = ApiResponse<User>),
        (status = 401, description = "Not logged in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_photo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePhotoRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update_photo(&state, &user, payload).await?;
    Ok(Json(resp))
}
