use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Admin "tambah produk" form. List fields are chip inputs and get trimmed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub discount: i32,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub require_login: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub extra_images: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub extra_form: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// What the current viewer has done with a product.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewerState {
    pub liked: bool,
    pub in_cart: bool,
    pub cart_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub viewer: Option<ViewerState>,
}
