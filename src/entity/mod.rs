pub mod audit_logs;
pub mod cart_items;
pub mod product_comments;
pub mod product_likes;
pub mod products;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use product_comments::Entity as ProductComments;
pub use product_likes::Entity as ProductLikes;
pub use products::Entity as Products;
pub use users::Entity as Users;
