// handlers/mod.rs - Two-tier handler layout
//
// Public (no key) → Protected (X-API-Key required)
pub mod public;    // Tier 1: No authentication required (/health)
pub mod protected; // Tier 2: API key required (/api/*)

use crate::error::ApiError;

/// Method fallback for the POST-only API routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Router fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
