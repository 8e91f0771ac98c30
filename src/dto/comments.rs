use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Comment;

/// `name` defaults to the commenter's username when omitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCommentRequest {
    pub name: Option<String>,
    pub text: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CommentList {
    #[schema(value_type = Vec<Comment>)]
    pub items: Vec<Comment>,
}
