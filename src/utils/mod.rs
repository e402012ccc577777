pub mod response;
pub mod validation;

pub use response::{ApiError, ApiResponse};
