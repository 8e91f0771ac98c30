use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::cart::CartSummary,
    models::{Product, Role, User},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardRoute {
    pub role: Role,
    pub path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboard {
    pub profile: User,
    pub cart: CartSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub profile: User,
    pub product_count: i64,
    pub total_likes: i64,
    pub latest_products: Vec<Product>,
    pub recent_activity: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub action: String,
    pub resource: Option<String>,
    pub user_id: Option<uuid::Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
