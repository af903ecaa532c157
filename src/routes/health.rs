//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 데이터베이스에 `SELECT 1`을 실행하여 연결 풀이 살아 있는지도 함께 확인합니다.

use crate::{error::AppError, routes::memos::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /health` — 서버와 데이터베이스 상태를 확인합니다.
///
/// DB 연결에 실패하면 `AppError::Database`가 500 응답으로 변환됩니다.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(json!({
        "status": "ok"
    })))
}
