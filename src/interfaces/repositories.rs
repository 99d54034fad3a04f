pub mod application;
pub mod blob_store;
pub mod bookmark;
pub mod company;
pub mod job;
pub mod notifier;
pub mod sqlx_repo;
pub mod token;
pub mod user;
