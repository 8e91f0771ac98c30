use uuid::Uuid;

use crate::{
    audit,
    catalog::{MAX_DISCOUNT, MAX_PRICE, derive_labels, normalize_chips},
    dto::products::{CreateProductRequest, ProductDetail, ProductList, ViewerState},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        product_likes::Entity as ProductLikes,
        products::{ActiveModel, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::user_service::require_admin,
    state::AppState,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

/// Filtered, sorted catalog query. `include_private` keeps products that
/// require a login to view.
pub(crate) fn catalog_finder(query: &ProductQuery, include_private: bool) -> Select<Products> {
    let mut condition = Condition::all();

    if !include_private {
        condition = condition.add(Column::RequireLogin.eq(false));
    }

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::val(category).eq(Expr::cust("ANY(\"categories\")")));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Likes => Column::Likes,
    };

    let finder = Products::find().filter(condition);
    match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    }
}

pub(crate) async fn paginate_products(
    state: &AppState,
    finder: Select<Products>,
    query: &ProductQuery,
) -> AppResult<(ProductList, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok((ProductList { items }, Meta::new(page, limit, total)))
}

pub async fn list_products(
    state: &AppState,
    viewer: Option<&AuthUser>,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let finder = catalog_finder(&query, viewer.is_some());
    let (data, meta) = paginate_products(state, finder, &query).await?;
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(
    state: &AppState,
    viewer: Option<&AuthUser>,
    id: Uuid,
) -> AppResult<ApiResponse<ProductDetail>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(AppError::product_not_found)?;

    if product.require_login && viewer.is_none() {
        return Err(AppError::login_required());
    }

    let viewer = match viewer {
        Some(user) => Some(viewer_state(state, user, id).await?),
        None => None,
    };

    let data = ProductDetail {
        product: Product::from(product),
        viewer,
    };
    Ok(ApiResponse::success("Product", data, Some(Meta::empty())))
}

async fn viewer_state(state: &AppState, user: &AuthUser, product_id: Uuid) -> AppResult<ViewerState> {
    let liked = ProductLikes::find_by_id((product_id, user.user_id))
        .one(&state.orm)
        .await?
        .is_some();
    let in_cart = CartItems::find_by_id((user.user_id, product_id))
        .one(&state.orm)
        .await?
        .is_some();
    let cart_count = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .count(&state.orm)
        .await? as i64;

    Ok(ViewerState {
        liked,
        in_cart,
        cart_count,
    })
}

pub fn validate_new_product(payload: &CreateProductRequest, images: &[String]) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Nama dan harga wajib diisi.".into()));
    }
    if payload.price < 0 {
        return Err(AppError::BadRequest("Harga tidak boleh negatif.".into()));
    }
    if payload.price > MAX_PRICE {
        return Err(AppError::BadRequest("Harga melebihi batas maksimum.".into()));
    }
    if images.is_empty() {
        return Err(AppError::BadRequest("Minimal satu foto produk wajib diisi.".into()));
    }
    if !(0..=MAX_DISCOUNT).contains(&payload.discount) {
        return Err(AppError::BadRequest("Diskon harus antara 0 dan 100.".into()));
    }
    if payload.stock < 0 {
        return Err(AppError::BadRequest("Stok tidak boleh negatif.".into()));
    }
    Ok(())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    require_admin(state, user).await?;

    let images = normalize_chips(&payload.images, false);
    validate_new_product(&payload, &images)?;

    let labels = derive_labels(payload.discount, &payload.labels);
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(optional_text(payload.description)),
        price: Set(payload.price),
        discount: Set(payload.discount),
        stock: Set(payload.stock),
        require_login: Set(payload.require_login),
        categories: Set(normalize_chips(&payload.categories, true)),
        images: Set(images),
        extra_images: Set(normalize_chips(&payload.extra_images, false)),
        labels: Set(labels),
        extra_form: Set(optional_text(payload.extra_form)),
        likes: Set(0),
        sold: Set(0),
        created_at: NotSet,
        created_by: Set(Some(user.user_id)),
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Produk berhasil ditambahkan.",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Likes, comments and cart rows of the product go with it (ON DELETE CASCADE).
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    require_admin(state, user).await?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::product_not_found());
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ack("Produk dihapus."))
}
