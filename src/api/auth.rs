use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::error::ApiError;

const TOKEN_TTL_HOURS: i64 = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub user: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            secret: secret.to_string(),
            validation,
        }
    }

    pub fn issue(&self, user: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            user: user.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map(|data| data.claims)
    }

    /// Check an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<Claims, ApiError> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::MissingToken)?;
        self.validate(token)
            .map_err(|err| ApiError::InvalidToken(err.to_string()))
    }
}

/// The authenticated admin; extracting it rejects the request with 401 when
/// the bearer token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl AdminUser {
    pub fn name(&self) -> &str {
        &self.0.user
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ApiError::Internal {
                context: "Authentication unavailable".to_string(),
                details: "application state not registered".to_string(),
            }));
        };
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        ready(state.auth.authorize(header).map(AdminUser))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let (user, pass) = match (body.user, body.pass) {
        (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => (user, pass),
        _ => return Err(ApiError::BadRequest("Missing user/pass".to_string())),
    };

    if user != state.config.admin_user || pass != state.config.admin_pass {
        warn!("Login failed for `{user}`: bad credentials");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.auth.issue(&user).map_err(|err| ApiError::Internal {
        context: "Could not issue token".to_string(),
        details: err.to_string(),
    })?;
    info!("Login success: {user}");
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "token": token })))
}

/// GET /api/auth/config
pub async fn auth_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true, "ADMIN_USER": state.config.admin_user }))
}
