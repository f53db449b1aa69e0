pub mod notification;
pub mod upload_batch;
pub mod user;
