pub mod actor;
pub mod application;
pub mod bookmark;
pub mod company;
pub mod dashboard;
pub mod job;
pub mod token;
pub mod upload;
pub mod user;
pub mod validation;
