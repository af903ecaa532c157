//! # 메모 모델 정의
//!
//! 메모 저장소 계층이 주고받는 값 객체들입니다.
//!
//! ## 구조체 역할
//! - `Memo`: `memo` 테이블 한 행 + 조인으로 계산된 `pinned`, `parent_id`
//! - `MapMemo`: 위치가 있는 메모의 지도 보기용 읽기 전용 투영(projection)
//! - `CreateMemo` / `FindMemo` / `UpdateMemo` / `DeleteMemo`: 저장소 함수의 입력
//! - `*Request`, `ListMemosQuery`: HTTP 요청 본문/쿼리 문자열
//!
//! `FindMemo`와 `UpdateMemo`는 모든 필드가 선택적인 "희소(sparse)" 구조체입니다.
//! 필드가 `None`(또는 빈 Vec)이면 "조건 없음" / "변경 없음"을 뜻합니다.

use serde::{Deserialize, Serialize};

/// 메모의 공개 범위
///
/// DB에는 `"PUBLIC"`처럼 대문자 문자열(TEXT)로 저장됩니다.
/// `sqlx::Type` derive가 문자열 인코딩/디코딩을 자동 구현합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Visibility {
    Private,
    Protected,
    Public,
}

/// 행 상태 (보관 처리 여부)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum RowStatus {
    Normal,
    Archived,
}

/// 메모 엔티티
///
/// `created_ts`, `updated_ts`는 epoch 초(i64)입니다.
/// DB에는 ISO-8601 UTC 문자열로 저장되어 있고, 조회 시 SQL에서 변환합니다.
///
/// `pinned`와 `parent_id`는 테이블 컬럼이 아니라 LEFT JOIN으로 계산되는 값입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Memo {
    pub id: i64,
    pub resource_name: String,
    pub creator_id: i64,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub row_status: RowStatus,
    pub visibility: Visibility,
    pub pinned: bool,
    pub parent_id: Option<i64>,
    pub location_name: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
    /// `FindMemo::exclude_content`로 조회하면 컬럼 자체가 없으므로
    /// `#[sqlx(default)]`에 의해 빈 문자열이 됩니다.
    #[sqlx(default)]
    pub content: String,
}

/// 지도 보기용 메모 투영
///
/// 작성자의 표시 이름(닉네임이 없으면 username)과 아바타를 함께 담습니다.
/// 위치 세 필드는 쿼리 조건상 항상 값이 있으므로 Option이 아닙니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MapMemo {
    pub id: i64,
    pub resource_name: String,
    pub creator_id: i64,
    pub creator_name: Option<String>,
    pub avatar_url: Option<String>,
    pub visibility: Visibility,
    pub created_ts: i64,
    pub location_name: String,
    pub location_lat: f64,
    pub location_lon: f64,
    pub content: String,
}

/// 메모 생성 입력
#[derive(Debug, Clone)]
pub struct CreateMemo {
    pub resource_name: String,
    pub creator_id: i64,
    pub content: String,
    pub visibility: Visibility,
    pub location_name: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
}

/// 메모 목록 조회 조건
///
/// 설정된 필드만 WHERE 절의 AND 조건이 됩니다.
/// `offset`은 `limit`이 있을 때만 적용됩니다.
#[derive(Debug, Clone, Default)]
pub struct FindMemo {
    pub id: Option<i64>,
    pub resource_name: Option<String>,
    pub creator_id: Option<i64>,
    pub row_status: Option<RowStatus>,
    pub created_ts_before: Option<i64>,
    pub created_ts_after: Option<i64>,
    pub updated_ts_before: Option<i64>,
    pub updated_ts_after: Option<i64>,
    /// 각 항목이 별도의 `content LIKE '%항목%'` 조건이 됩니다 (대소문자 구분).
    pub content_search: Vec<String>,
    pub visibility_list: Vec<Visibility>,
    /// 댓글(COMMENT 관계의 자식) 메모를 제외합니다.
    pub exclude_comments: bool,
    /// `content` 컬럼을 조회하지 않습니다.
    pub exclude_content: bool,
    pub order_by_pinned: bool,
    /// true면 수정 시각, false면 생성 시각 내림차순
    pub order_by_updated_ts: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// 메모 부분 수정 입력 (id를 제외한 모든 필드는 선택)
#[derive(Debug, Clone, Default)]
pub struct UpdateMemo {
    pub id: i64,
    pub resource_name: Option<String>,
    pub created_ts: Option<i64>,
    pub updated_ts: Option<i64>,
    pub row_status: Option<RowStatus>,
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMemo {
    pub id: i64,
}

// ── HTTP 요청 본문 / 쿼리 문자열 ──

/// `POST /api/v1/memos`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateMemoRequest {
    /// 없으면 UUIDv7로 생성합니다.
    pub resource_name: Option<String>,
    pub content: String,
    pub visibility: Option<Visibility>,
    pub location_name: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lon: Option<f64>,
}

/// `PATCH /api/v1/memos/:id`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpdateMemoRequest {
    pub content: Option<String>,
    pub visibility: Option<Visibility>,
    pub row_status: Option<RowStatus>,
    pub location_name: Option<String>,
    pub created_ts: Option<i64>,
}

/// `GET /api/v1/memos`의 쿼리 문자열
///
/// 예: `/memos?creator_id=1&content_search=hello&limit=10`
#[derive(Debug, Default, Deserialize)]
pub struct ListMemosQuery {
    pub creator_id: Option<i64>,
    pub row_status: Option<RowStatus>,
    pub visibility: Option<Visibility>,
    pub content_search: Option<String>,
    #[serde(default)]
    pub exclude_comments: bool,
    #[serde(default)]
    pub order_by_pinned: bool,
    #[serde(default)]
    pub order_by_updated_ts: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `PUT /api/v1/memos/:id/organizer`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct UpsertOrganizerRequest {
    pub pinned: bool,
}

/// `POST /api/v1/memos/:id/comments`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub visibility: Option<Visibility>,
}
