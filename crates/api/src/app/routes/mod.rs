pub mod auth;
pub mod records;
pub mod system;
