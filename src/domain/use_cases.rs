pub mod application;
pub mod auth;
pub mod bookmark;
pub mod company;
pub mod dashboard;
pub mod extractors;
pub mod job;
pub mod upload;
