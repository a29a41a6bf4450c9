use serde::{Deserialize, Serialize};

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    /// Expiry, unix seconds
    pub exp: usize,
    /// Issued at, unix seconds
    pub iat: usize,
}
