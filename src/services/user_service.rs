use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::{
    audit,
    dto::users::UpdatePhotoRequest,
    entity::users::{ActiveModel as UserActive, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// The User row behind a token; a token whose user is gone counts as signed out.
pub async fn load_profile(state: &AppState, user: &AuthUser) -> AppResult<UserModel> {
    Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Data user tidak ditemukan.".into()))
}

/// Role gate evaluated against the stored User row rather than the token,
/// so a role change takes effect without a new login.
pub async fn require_role(state: &AppState, user: &AuthUser, role: Role) -> AppResult<User> {
    let profile = User::from(load_profile(state, user).await?);
    if profile.role != role {
        tracing::debug!(uid = %profile.uid, role = %profile.role, wanted = %role, "role denied");
        return Err(AppError::Forbidden);
    }
    Ok(profile)
}

/// Token role first so customers are turned away without a query, then the
/// stored role so a demoted admin is refused right away.
pub async fn require_admin(state: &AppState, user: &AuthUser) -> AppResult<User> {
    ensure_admin(user)?;
    require_role(state, user, Role::Admins).await
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let profile = load_profile(state, user).await?;
    Ok(ApiResponse::success(
        "Profile",
        User::from(profile),
        Some(Meta::empty()),
    ))
}

pub async fn update_photo(
    state: &AppState,
    user: &AuthUser,
    payload: UpdatePhotoRequest,
) -> AppResult<ApiResponse<User>> {
    let profile = load_profile(state, user).await?;
    let photo_url = payload
        .photo_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let mut active: UserActive = profile.into();
    active.photo_url = Set(photo_url.clone());
    let updated = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "user_photo_update",
        "users",
        serde_json::json!({ "photo_url": photo_url }),
    )
    .await;

    Ok(ApiResponse::success(
        "Foto profil diperbarui",
        User::from(updated),
        Some(Meta::empty()),
    ))
}
