use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

use crate::{
    dto::dashboard::{ActivityEntry, AdminDashboard, DashboardRoute, UserDashboard},
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs, Model as AuditModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Product, Role, User},
    response::{ApiResponse, Meta},
    services::{
        cart_service::cart_summary,
        user_service::{load_profile, require_role},
    },
    state::AppState,
};

const LATEST_PRODUCTS: u64 = 5;
const RECENT_ACTIVITY: u64 = 10;

pub async fn route(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardRoute>> {
    let profile = User::from(load_profile(state, user).await?);
    let data = DashboardRoute {
        role: profile.role,
        path: profile.role.dashboard_path().to_string(),
    };
    Ok(ApiResponse::success("Dashboard", data, Some(Meta::empty())))
}

pub async fn user_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserDashboard>> {
    let profile = require_role(state, user, Role::Users).await?;
    let cart = cart_summary(&state.pool, user.user_id).await?;
    Ok(ApiResponse::success(
        format!("Halo, {}", profile.username),
        UserDashboard { profile, cart },
        Some(Meta::empty()),
    ))
}

pub async fn admin_dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminDashboard>> {
    let profile = require_role(state, user, Role::Admins).await?;

    let product_count = Products::find().count(&state.orm).await? as i64;
    let total_likes: Option<i64> = Products::find()
        .select_only()
        .column_as(Expr::col(ProdCol::Likes).sum(), "total_likes")
        .into_tuple::<Option<i64>>()
        .one(&state.orm)
        .await?
        .flatten();

    let latest_products = Products::find()
        .order_by_desc(ProdCol::CreatedAt)
        .limit(LATEST_PRODUCTS)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let recent_activity = AuditLogs::find()
        .order_by_desc(AuditCol::CreatedAt)
        .limit(RECENT_ACTIVITY)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(activity_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Admin dashboard",
        AdminDashboard {
            profile,
            product_count,
            total_likes: total_likes.unwrap_or(0),
            latest_products,
            recent_activity,
        },
        Some(Meta::empty()),
    ))
}

fn activity_from_entity(model: AuditModel) -> ActivityEntry {
    ActivityEntry {
        action: model.action,
        resource: model.resource,
        user_id: model.user_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
