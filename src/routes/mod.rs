//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터 구성입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `memos`: 메모 CRUD, 지도 보기, 고정, 댓글 핸들러

pub mod health;
pub mod memos;

pub use health::*;
pub use memos::*;

use axum::{
    routing::{get, post, put},
    Router,
};

/// `/api/v1` 아래에 중첩될 API 라우터를 만듭니다.
///
/// 정적 경로(`/memos/map`)가 경로 파라미터(`/memos/{id}`)보다 우선 매칭됩니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/memos", get(list_memos).post(create_memo))
        .route("/memos/map", get(list_map_memos))
        .route(
            "/memos/{id}",
            get(get_memo).patch(update_memo).delete(delete_memo),
        )
        .route("/memos/{id}/organizer", put(upsert_memo_organizer))
        .route("/memos/{id}/comments", post(create_memo_comment))
        .route("/health", get(health_check))
        .with_state(state)
}

/// 전체 애플리케이션 라우터: API를 `/api/v1` 아래에 둡니다.
pub fn app(state: AppState) -> Router {
    Router::new().nest("/api/v1", api_router(state))
}
