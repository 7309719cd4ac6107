pub mod activity;
pub mod datetime;
pub mod notification;
pub mod timeline;
pub mod transaction;
pub mod user;
