//! Authentication and session lifecycle for the Joy Kunga platform
//!
//! Issues access/refresh token pairs, rotates and revokes refresh tokens
//! against the credential store, authenticates inbound requests, and checks
//! resource ownership. The account routes live here too; other services reuse
//! the verifier through [`middleware::auth_middleware`].

pub mod authorize;
pub mod cookies;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limiter;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use authorize::{Owned, ensure_owner};
pub use error::{ApiError, ApiResult, AuthError};
pub use middleware::{CurrentUser, auth_middleware};
pub use response::ApiResponse;
pub use session::{SessionManager, TokenPair};
pub use state::AppState;
