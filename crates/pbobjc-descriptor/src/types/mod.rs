pub mod common;
pub mod error;
pub mod field;
pub mod file;
pub mod message;
