use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::comments::{AddCommentRequest, CommentList},
    entity::{
        product_comments::{ActiveModel as CommentActive, Column as CommentCol, Entity as ProductComments},
        products::Entity as Products,
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Comment,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub const ANONYMOUS_NAME: &str = "Anonim";

/// Display name for a comment: the given name trimmed, the username when no
/// name was sent, `Anonim` when the name is blank.
pub fn comment_author(name: Option<&str>, username: &str) -> String {
    let name = name.unwrap_or(username).trim();
    if name.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        name.to_string()
    }
}

async fn ensure_product(state: &AppState, product_id: Uuid) -> AppResult<()> {
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or_else(AppError::product_not_found)
}

pub async fn list_comments(
    state: &AppState,
    product_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<CommentList>> {
    ensure_product(state, product_id).await?;
    let (page, limit, offset) = pagination.normalize();

    let finder = ProductComments::find()
        .filter(CommentCol::ProductId.eq(product_id))
        .order_by_desc(CommentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Comment::from)
        .collect();

    Ok(ApiResponse::success(
        "Comments",
        CommentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn add_comment(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddCommentRequest,
) -> AppResult<ApiResponse<Comment>> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Komentar tidak boleh kosong.".into()));
    }
    ensure_product(state, product_id).await?;

    let profile = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Data user tidak ditemukan.".into()))?;

    let comment = CommentActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        user_id: Set(user.user_id),
        name: Set(comment_author(payload.name.as_deref(), &profile.username)),
        text: Set(text.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "comment_add",
        "product_comments",
        serde_json::json!({ "product_id": product_id, "comment_id": comment.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Komentar terkirim",
        Comment::from(comment),
        Some(Meta::empty()),
    ))
}
