use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::{final_price, format_count};
use crate::entity::{product_comments, products, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Users,
    Admins,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Users => "users",
            Role::Admins => "admins",
        }
    }

    /// Unknown roles fall back to the customer role.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admins" => Role::Admins,
            _ => Role::Users,
        }
    }

    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admins => "/api/dashboard/admin",
            Role::Users => "/api/dashboard/user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub uid: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub saldo: i64,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            uid: model.id,
            username: model.username,
            email: model.email,
            role: Role::from_db(&model.role),
            saldo: model.saldo,
            photo_url: model.photo_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub final_price: i64,
    pub stock: i32,
    pub require_login: bool,
    pub categories: Vec<String>,
    pub images: Vec<String>,
    pub extra_images: Vec<String>,
    pub labels: Vec<String>,
    pub extra_form: Option<String>,
    pub likes: i32,
    pub likes_display: String,
    pub sold: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        let likes = model.likes.max(0);
        Self {
            id: model.id,
            final_price: final_price(model.price, model.discount),
            likes_display: format_count(i64::from(likes)),
            name: model.name,
            description: model.description,
            price: model.price,
            discount: model.discount,
            stock: model.stock,
            require_login: model.require_login,
            categories: model.categories,
            images: model.images,
            extra_images: model.extra_images,
            labels: model.labels,
            extra_form: model.extra_form,
            likes,
            sold: model.sold,
            created_at: model.created_at.with_timezone(&Utc),
            created_by: model.created_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_uid: Uuid,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<product_comments::Model> for Comment {
    fn from(model: product_comments::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_uid: model.user_id,
            name: model.name,
            text: model.text,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub image: String,
    pub qty: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_db_strings() {
        assert_eq!(Role::from_db("admins"), Role::Admins);
        assert_eq!(Role::from_db("users"), Role::Users);
        assert_eq!(Role::from_db("superuser"), Role::Users);
        assert_eq!(Role::Admins.as_str(), "admins");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Admins).unwrap();
        assert_eq!(json, "\"admins\"");
    }
}
