pub mod applications;
pub mod auth;
pub mod bookmarks;
pub mod companies;
pub mod dashboard;
pub mod home;
pub mod jobs;
pub mod system;
pub mod uploads;
pub mod users;
