//! Authentication layer

pub mod session;

pub use session::{SessionClaims, UserIdentity, session_auth_middleware};
