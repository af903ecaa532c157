//! # 에러 처리 모듈
//!
//! 저장소 계층과 HTTP 계층에서 발생할 수 있는 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 저장소 함수는 "찾지 못함"을 에러가 아니라 빈 결과(`Vec::new()`, `None`)로 돌려줍니다.
//! `NotFound`는 HTTP 계층에서 `None`을 404로 바꿀 때만 사용합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::auth::AuthError;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403). 다른 사용자의 메모를 수정/삭제하려는 경우
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 데이터 정합성 오류 (HTTP 500)
    /// 예: INSERT 직후 같은 id로 다시 조회했는데 행이 없는 경우
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// 토큰 누락/위조/만료 (HTTP 401). 응답 코드는 `AuthError::code()`를 따릅니다.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 데이터베이스 오류 (HTTP 500)
    /// 연결 실패, 제약 조건 위반, 행 디코딩 실패 등이 모두 여기에 해당합니다.
    /// #[from]: sqlx 함수 호출 뒤의 `?`가 자동으로 AppError::Database로 변환합니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Consistency)는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Consistency(ref msg) => {
                tracing::error!("Consistency error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "consistency_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Auth(ref e) => (StatusCode::UNAUTHORIZED, e.code(), e.to_string()),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
