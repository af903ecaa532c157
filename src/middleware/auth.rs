//! # 요청자 인증
//!
//! `Authorization: Bearer <JWT>` 헤더에서 요청한 사용자의 id를 꺼냅니다.
//! 토큰의 `sub` 클레임이 `user` 테이블의 정수 id(문자열 형태)입니다.
//!
//! - `AuthUser`: 토큰이 반드시 있어야 하는 핸들러용
//! - `MaybeAuthUser`: 익명 접근도 허용하는 핸들러용 (헤더가 없으면 `None`)

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;
use crate::routes::memos::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// 익명 요청이면 `MaybeAuthUser(None)`입니다.
/// 헤더가 있는데 토큰이 잘못되었으면 익명으로 취급하지 않고 거부합니다.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        Ok(authenticate(auth_header, &state.jwt_secret)?)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeAuthUser(None));
        };
        let auth_header = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

        let user = authenticate(auth_header, &state.jwt_secret)?;

        Ok(MaybeAuthUser(Some(user)))
    }
}

fn authenticate(auth_header: &str, secret: &str) -> Result<AuthUser, AuthError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    let claims = verify_access_token(token, secret)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthUser { user_id })
}

/// 토큰 검증 실패 사유. 응답은 `AppError::Auth`가 401로 만듭니다.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Authorization token has expired")]
    ExpiredToken,
}

impl AuthError {
    /// 에러 응답 본문의 `code` 값
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
        }
    }
}

/// 사용자 id로 1시간짜리 access 토큰을 발급합니다.
pub fn create_access_token(
    user_id: i64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
