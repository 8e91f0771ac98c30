use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub stock: i32,
    pub require_login: bool,
    pub categories: Vec<String>,
    pub images: Vec<String>,
    pub extra_images: Vec<String>,
    pub labels: Vec<String>,
    pub extra_form: Option<String>,
    pub likes: i32,
    pub sold: i32,
    pub created_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_likes::Entity")]
    ProductLikes,
    #[sea_orm(has_many = "super::product_comments::Entity")]
    ProductComments,
    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,
}

impl Related<super::product_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLikes.def()
    }
}

impl Related<super::product_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductComments.def()
    }
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
