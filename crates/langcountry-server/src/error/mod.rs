//! Error handling for the LangCountry server.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult, StoreError};
