pub mod notifications;
pub mod transactions;
pub mod users;
