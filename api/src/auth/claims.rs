use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Internal user id.
    pub sub: i64,
    /// Admin role flag; everything else is a regular user.
    pub admin: bool,
    /// Expiry as unix seconds.
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
