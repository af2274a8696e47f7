pub mod auth;
pub mod error;
pub mod messages;
pub mod password;
pub mod store;

pub use error::Error;
