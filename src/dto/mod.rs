pub mod auth;
pub mod cart;
pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod products;
pub mod users;
