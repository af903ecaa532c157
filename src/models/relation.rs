//! # 메모 부가 정보 모델
//!
//! - `MemoOrganizer`: 사용자별 메모 메타데이터 (`memo_organizer` 테이블)
//! - `MemoRelation`: 두 메모 사이의 관계 (`memo_relation` 테이블)

use serde::{Deserialize, Serialize};

/// 사용자가 메모를 고정(pinned)했는지 여부
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemoOrganizer {
    pub memo_id: i64,
    pub user_id: i64,
    pub pinned: bool,
}

/// 관계 종류
///
/// `Comment`면 `memo_id` 메모가 `related_memo_id` 메모의 댓글입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum MemoRelationType {
    Reference,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemoRelation {
    pub memo_id: i64,
    pub related_memo_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub relation_type: MemoRelationType,
}
