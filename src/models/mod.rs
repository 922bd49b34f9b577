pub mod cache;
pub mod message;
