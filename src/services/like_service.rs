use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    catalog::format_count,
    dto::likes::LikeStatus,
    entity::{
        product_likes::{ActiveModel as LikeActive, Entity as ProductLikes},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn status(product_id: Uuid, liked: bool, likes: i32) -> LikeStatus {
    let likes = likes.max(0);
    LikeStatus {
        product_id,
        liked,
        likes,
        likes_display: format_count(i64::from(likes)),
    }
}

async fn lock_product(txn: &DatabaseTransaction, product_id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(product_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(AppError::product_not_found)
}

/// Requested change to a user's like on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    Like,
    Unlike,
    Toggle,
}

impl LikeChange {
    /// Whether the product should end up liked, given its current state.
    pub fn target(self, liked: bool) -> bool {
        match self {
            LikeChange::Like => true,
            LikeChange::Unlike => false,
            LikeChange::Toggle => !liked,
        }
    }
}

/// Reads the like row and applies the change while the product row is
/// locked, so concurrent requests on the same product run one after the
/// other. The counter moves only when the like row changed and never drops
/// below zero.
pub async fn apply(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    change: LikeChange,
) -> AppResult<LikeStatus> {
    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, product_id).await?;

    let liked = ProductLikes::find_by_id((product_id, user.user_id))
        .one(&txn)
        .await?
        .is_some();
    let wanted = change.target(liked);
    if wanted == liked {
        txn.commit().await?;
        return Ok(status(product_id, liked, product.likes));
    }

    let likes = if wanted {
        LikeActive {
            product_id: Set(product_id),
            user_id: Set(user.user_id),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        Products::update_many()
            .col_expr(ProdCol::Likes, Expr::col(ProdCol::Likes).add(1))
            .filter(ProdCol::Id.eq(product_id))
            .exec(&txn)
            .await?;
        product.likes.saturating_add(1)
    } else {
        ProductLikes::delete_by_id((product_id, user.user_id))
            .exec(&txn)
            .await?;
        Products::update_many()
            .col_expr(ProdCol::Likes, Expr::cust("GREATEST(\"likes\" - 1, 0)"))
            .filter(ProdCol::Id.eq(product_id))
            .exec(&txn)
            .await?;
        (product.likes - 1).max(0)
    };

    txn.commit().await?;
    Ok(status(product_id, wanted, likes))
}

async fn change_like(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    change: LikeChange,
) -> AppResult<ApiResponse<LikeStatus>> {
    let data = apply(state, user, product_id, change)
        .await
        .map_err(like_failed)?;
    let (action, message) = if data.liked {
        ("product_like", "Liked")
    } else {
        ("product_unlike", "Unliked")
    };
    audit::record(
        &state.pool,
        Some(user.user_id),
        action,
        "product_likes",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}

pub async fn like_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeStatus>> {
    change_like(state, user, product_id, LikeChange::Like).await
}

pub async fn unlike_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeStatus>> {
    change_like(state, user, product_id, LikeChange::Unlike).await
}

/// The direction is decided inside the locked transaction, so two toggles
/// racing on the same product cancel out.
pub async fn toggle_like(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeStatus>> {
    change_like(state, user, product_id, LikeChange::Toggle).await
}

pub async fn like_status(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<LikeStatus>> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or_else(AppError::product_not_found)?;
    let liked = ProductLikes::find_by_id((product_id, user.user_id))
        .one(&state.orm)
        .await?
        .is_some();
    Ok(ApiResponse::success(
        "Like status",
        status(product_id, liked, product.likes),
        Some(Meta::empty()),
    ))
}

/// Store failures surface as one flat message; a missing product stays a 404.
fn like_failed(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => err,
        other => {
            tracing::error!(error = %other, "like update failed");
            AppError::OperationFailed("Gagal mengupdate like".into())
        }
    }
}
