pub mod auth;
pub mod config;
pub mod directory;
pub mod models;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
