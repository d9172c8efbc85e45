pub mod auth;
pub mod response;

pub use auth::{api_key_middleware, API_KEY_HEADER, UNAUTHORIZED_MESSAGE};
pub use response::ApiResponse;
