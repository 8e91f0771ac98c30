use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit,
    catalog::final_price,
    db::DbPool,
    dto::cart::{AddToCartRequest, CartSummary, QuantityChange},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

const CART_COLUMNS: &str = "product_id, name, price, image, qty, created_at";

#[derive(FromRow)]
struct ProductSnapshot {
    name: String,
    price: i64,
    discount: i32,
    stock: i32,
    images: Vec<String>,
}

fn not_in_cart() -> AppError {
    AppError::NotFound("Produk tidak ada di keranjang".into())
}

pub async fn cart_summary(pool: &DbPool, user_id: Uuid) -> AppResult<CartSummary> {
    let items = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(CartSummary::from_items(items))
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSummary>> {
    let summary = cart_summary(&state.pool, user.user_id).await?;
    let meta = Meta::new(1, summary.count.max(1), summary.count);
    Ok(ApiResponse::success("OK", summary, Some(meta)))
}

/// At most one row per (user, product). Adding a product that is already in
/// the cart returns the existing row untouched.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let product: Option<ProductSnapshot> = sqlx::query_as(
        "SELECT name, price, discount, stock, images FROM products WHERE id = $1",
    )
    .bind(payload.product_id)
    .fetch_optional(&state.pool)
    .await?;
    let product = product.ok_or_else(AppError::product_not_found)?;

    if product.stock <= 0 {
        return Err(AppError::BadRequest("Stok produk habis.".into()));
    }

    let image = product.images.first().cloned().unwrap_or_default();
    let price = final_price(product.price, product.discount);

    // The existing row can be removed between the conflicting insert and the
    // read; one more round covers that.
    for _ in 0..2 {
        let inserted: Option<CartItem> = sqlx::query_as(&format!(
            r#"
            INSERT INTO cart_items (user_id, product_id, name, price, image, qty)
            VALUES ($1, $2, $3, $4, $5, 1)
            ON CONFLICT (user_id, product_id) DO NOTHING
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(user.user_id)
        .bind(payload.product_id)
        .bind(&product.name)
        .bind(price)
        .bind(&image)
        .fetch_optional(&state.pool)
        .await?;

        if let Some(item) = inserted {
            audit::record(
                &state.pool,
                Some(user.user_id),
                "cart_add",
                "cart_items",
                serde_json::json!({ "product_id": payload.product_id }),
            )
            .await;
            return Ok(ApiResponse::success(
                "Ditambahkan ke keranjang",
                item,
                Some(Meta::empty()),
            ));
        }

        let existing: Option<CartItem> = sqlx::query_as(&format!(
            "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = $1 AND product_id = $2"
        ))
        .bind(user.user_id)
        .bind(payload.product_id)
        .fetch_optional(&state.pool)
        .await?;

        if let Some(item) = existing {
            return Ok(ApiResponse::success(
                "Sudah ada di keranjang",
                item,
                Some(Meta::empty()),
            ));
        }
    }

    Err(not_in_cart())
}

/// Reads the current quantity and writes the new one back as a plain
/// overwrite; concurrent edits are last-write-wins.
pub async fn change_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    change: QuantityChange,
) -> AppResult<ApiResponse<CartItem>> {
    let current: Option<(i32,)> =
        sqlx::query_as("SELECT qty FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user.user_id)
            .bind(product_id)
            .fetch_optional(&state.pool)
            .await?;
    let (current,) = current.ok_or_else(not_in_cart)?;
    let qty = change.apply(current);

    let item: Option<CartItem> = sqlx::query_as(&format!(
        r#"
        UPDATE cart_items
        SET qty = $3
        WHERE user_id = $1 AND product_id = $2
        RETURNING {CART_COLUMNS}
        "#
    ))
    .bind(user.user_id)
    .bind(product_id)
    .bind(qty)
    .fetch_optional(&state.pool)
    .await?;
    let item = item.ok_or_else(not_in_cart)?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({ "product_id": product_id, "qty": qty }),
    )
    .await;

    Ok(ApiResponse::success("OK", item, Some(Meta::empty())))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE product_id = $1 AND user_id = $2")
        .bind(product_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_in_cart());
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::ack("Dihapus dari keranjang"))
}

pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cart_clear",
        "cart_items",
        serde_json::json!({ "removed": result.rows_affected() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Keranjang dibersihkan",
        serde_json::json!({ "removed": result.rows_affected() }),
        Some(Meta::empty()),
    ))
}
