use crate::{
    dto::products::ProductList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::{
        product_service::{catalog_finder, paginate_products},
        user_service::require_admin,
    },
    state::AppState,
};

/// Admin product list: every product, login-only ones included, newest first
/// unless another order is requested.
pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    require_admin(state, user).await?;
    let finder = catalog_finder(&query, true);
    let (data, meta) = paginate_products(state, finder, &query).await?;
    Ok(ApiResponse::success("Products", data, Some(meta)))
}
