// src/middleware/mod.rs

pub mod public_assets;
pub mod request_size_limit;
pub mod session_auth;

pub use public_assets::public_asset_filter;
pub use request_size_limit::{request_size_limit_middleware, MAX_REQUEST_SIZE};
pub use session_auth::{session_auth_middleware, AuthenticatedUser, LOGIN_PAGE, SESSION_COOKIE};
