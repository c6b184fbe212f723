use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

const TOKEN_EXPIRY_SECONDS: i64 = 10;

/// Claims expected by the PDF Generator API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorClaims {
    pub iss: String, // api key
    pub sub: String, // workspace identifier
    pub exp: usize,
}

/// Mint a short-lived HS256 token. A new token is signed for every call.
pub fn generate_token(
    api_key: &str,
    workspace_id: &str,
    api_secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = GeneratorClaims {
        iss: api_key.to_string(),
        sub: workspace_id.to_string(),
        exp: (now + TOKEN_EXPIRY_SECONDS) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(api_secret.as_bytes()),
    )
}

pub fn get_token_expiry() -> i64 {
    TOKEN_EXPIRY_SECONDS
}
