pub mod claims;
pub mod extractors;
pub mod guards;

pub use claims::{AuthUser, Claims};

use chrono::Utc;
use common::config;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

/// Signs a JWT for the given user. Returns the token and its expiry (unix
/// seconds). Used by ops tooling and tests; there is no login endpoint.
pub fn generate_jwt(user_id: i64, admin: bool) -> (String, usize) {
    let minutes = config::jwt_duration_minutes();
    let exp = (Utc::now() + chrono::Duration::minutes(minutes as i64)).timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        admin,
        exp,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .expect("Failed to sign JWT");
    (token, exp)
}
