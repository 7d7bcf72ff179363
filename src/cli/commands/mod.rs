pub mod auth;
pub mod folder;
pub mod graphql;
pub mod product;
pub mod project;
pub mod task;
pub mod user;
