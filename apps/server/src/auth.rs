use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::main_lib::AppState;

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

/// Roles may be issued as a JSON list or as one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RolesClaim {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles = match Option::<RolesClaim>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RolesClaim::List(list)) => list,
        Some(RolesClaim::Joined(joined)) => joined
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
    };
    Ok(roles)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Caller identity attached to requests that passed [`require_jwt`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub roles: Vec<String>,
}

impl AuthManager {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue_token(
        &self,
        subject: &str,
        roles: &[&str],
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + ttl;
        let claims = Claims {
            sub: subject.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| AuthenticatedUser {
                subject: data.claims.sub,
                roles: data.claims.roles,
            })
            .map_err(|err| {
                debug!("Rejected bearer token: {:?}", err.kind());
                AuthError::Unauthorized
            })
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(auth) = state.auth.clone() else {
        return Ok(next.run(request).await);
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let user = auth.validate_token(token)?;
    debug!("Authenticated {} for {}", user.subject, request.uri().path());
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
