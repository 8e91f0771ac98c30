use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePhotoRequest {
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}
