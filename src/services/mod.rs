pub mod activity;
pub mod approval;
pub mod fanout;
pub mod routing;
pub mod store;
pub mod timeline;
