use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LikeStatus {
    pub product_id: Uuid,
    pub liked: bool,
    pub likes: i32,
    pub likes_display: String,
}
