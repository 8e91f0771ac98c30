use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        comments::{AddCommentRequest, CommentList},
        likes::LikeStatus,
        products::{ProductDetail, ProductList},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Comment,
    response::ApiResponse,
    routes::params::{Pagination, ProductQuery},
    services::{comment_service, like_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route(
            "/{id}/likes",
            get(like_status).post(like_product).delete(unlike_product),
        )
        .route("/{id}/likes/toggle", post(toggle_like))
        .route("/{id}/comments", get(list_comments).post(add_comment))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category" = Option<String>, Query, description = "Exact category"),
        ("min_price" = Option<i64>, Query, description = "Minimum base price"),
        ("max_price" = Option<i64>, Query, description = "Maximum base price"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, name, likes"),
        ("sort_order" = Option<String>, Query, description = "asc, desc (default desc)")
    ),
    responses(
        (status = 200, description = "Catalog; login-only products are hidden from anonymous viewers", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, viewer.as_ref(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product detail with viewer state", body = ApiResponse<ProductDetail>),
        (status = 401, description = "Product requires login"),
        (status = 404, description = "Produk tidak ditemukan"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    viewer: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = product_service::get_product(&state, viewer.as_ref(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/likes",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Whether the current user likes the product", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Produk tidak ditemukan"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn like_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = like_service::like_status(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/likes",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Liked (idempotent)", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Produk tidak ditemukan"),
        (status = 500, description = "Gagal mengupdate like"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn like_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = like_service::like_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/likes",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Unliked (idempotent)", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Produk tidak ditemukan"),
        (status = 500, description = "Gagal mengupdate like"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn unlike_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = like_service::unlike_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/likes/toggle",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Like toggled", body = ApiResponse<LikeStatus>),
        (status = 404, description = "Produk tidak ditemukan"),
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeStatus>>> {
    let resp = like_service::toggle_like(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/comments",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Comments, newest first", body = ApiResponse<CommentList>),
        (status = 404, description = "Produk tidak ditemukan"),
    ),
    tag = "Comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CommentList>>> {
    let resp = comment_service::list_comments(&state, id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/comments",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "Comment stored", body = ApiResponse<Comment>),
        (status = 400, description = "Empty comment"),
        (status = 404, description = "Produk tidak ditemukan"),
    ),
    security(("bearer_auth" = [])),
    tag = "Comments"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddCommentRequest>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let resp = comment_service::add_comment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
