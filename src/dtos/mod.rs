pub mod notification_dtos;
pub mod transaction_dtos;
