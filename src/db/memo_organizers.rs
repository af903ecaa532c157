//! # 메모 고정(organizer) 쿼리 모듈
//!
//! `memo_organizer`는 (memo_id, user_id)를 복합 기본키로 가지는 사용자별 메타데이터입니다.
//! 메모 목록의 `pinned` 값은 작성자 본인의 행에서 계산됩니다.

use crate::error::AppError;
use crate::models::MemoOrganizer;
use sqlx::{SqliteConnection, SqlitePool};

/// 고정 여부를 저장합니다. 이미 행이 있으면 `pinned`만 갱신합니다.
///
/// `ON CONFLICT ... DO UPDATE`: SQLite의 UPSERT 구문입니다.
pub async fn upsert_memo_organizer(
    pool: &SqlitePool,
    organizer: &MemoOrganizer,
) -> Result<MemoOrganizer, AppError> {
    sqlx::query(
        r#"
        INSERT INTO memo_organizer (memo_id, user_id, pinned)
        VALUES (?, ?, ?)
        ON CONFLICT (memo_id, user_id) DO UPDATE SET pinned = excluded.pinned
        "#,
    )
    .bind(organizer.memo_id)
    .bind(organizer.user_id)
    .bind(organizer.pinned)
    .execute(pool)
    .await?;

    Ok(organizer.clone())
}

/// 메모나 사용자가 사라진 고정 정보를 삭제합니다.
pub async fn vacuum_memo_organizers(conn: &mut SqliteConnection) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM memo_organizer
        WHERE memo_id NOT IN (SELECT id FROM memo)
           OR user_id NOT IN (SELECT id FROM `user`)
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
