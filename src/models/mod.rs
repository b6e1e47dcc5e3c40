pub mod dto;
pub mod error;
pub use error::Error;
