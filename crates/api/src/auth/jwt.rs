//! Signed access tokens for servdesk accounts.
//!
//! A token names the account and the role it held when the token was issued.
//! Request extractors trust only `sub` and reload the profile, so the role
//! claim is a hint for clients, not an authorization input.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use servdesk_core::access::{ROLE_CUSTOMER, ROLE_EMPLOYEE};
use servdesk_core::types::DbId;
use servdesk_db::models::user::UserWithProfile;
use uuid::Uuid;

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Token lifetime in seconds, as reported to clients in `expires_in`.
    pub fn lifetime_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Role recorded in a token at issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    Employee,
    Customer,
}

impl TokenRole {
    pub fn for_profile(is_employee: bool) -> Self {
        if is_employee {
            Self::Employee
        } else {
            Self::Customer
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => ROLE_EMPLOYEE,
            Self::Customer => ROLE_CUSTOMER,
        }
    }
}

/// Payload of a servdesk access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub sub: DbId,
    pub username: String,
    pub role: TokenRole,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Sign an access token for `account`.
pub fn issue_access_token(
    account: &UserWithProfile,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        sub: account.user.id,
        username: account.user.username.clone(),
        role: TokenRole::for_profile(account.profile.is_employee),
        exp: issued_at + config.lifetime_secs(),
        iat: issued_at,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, &config.encoding_key())?;
    Ok(IssuedToken {
        token,
        expires_in: config.lifetime_secs(),
    })
}

/// Check signature and expiry, returning the claims.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<AccessClaims>(token, &config.decoding_key(), &validation).map(|data| data.claims)
}
