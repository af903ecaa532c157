//! # 메모 관계(relation) 쿼리 모듈
//!
//! COMMENT 관계의 `memo_id` 쪽 메모가 댓글입니다.
//! 메모 목록의 `parent_id`와 지도 보기의 댓글 제외가 이 테이블을 조인합니다.

use crate::error::AppError;
use crate::models::MemoRelation;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

/// 관계를 저장합니다. 같은 (memo_id, related_memo_id, type)이 있으면 무시합니다.
///
/// 풀이나 트랜잭션(`&mut *tx`) 어느 쪽에서도 실행할 수 있습니다.
pub async fn upsert_memo_relation<'e, E>(
    executor: E,
    relation: &MemoRelation,
) -> Result<MemoRelation, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT OR IGNORE INTO memo_relation (memo_id, related_memo_id, type) VALUES (?, ?, ?)",
    )
    .bind(relation.memo_id)
    .bind(relation.related_memo_id)
    .bind(relation.relation_type)
    .execute(executor)
    .await?;

    Ok(relation.clone())
}

/// 특정 메모에서 출발하는 관계 목록을 조회합니다.
pub async fn list_memo_relations(
    pool: &SqlitePool,
    memo_id: i64,
) -> Result<Vec<MemoRelation>, AppError> {
    let relations = sqlx::query_as::<_, MemoRelation>(
        r#"
        SELECT memo_id, related_memo_id, type
        FROM memo_relation
        WHERE memo_id = ?
        ORDER BY related_memo_id
        "#,
    )
    .bind(memo_id)
    .fetch_all(pool)
    .await?;

    Ok(relations)
}

/// 양쪽 메모 중 하나라도 사라진 관계를 삭제합니다.
pub async fn vacuum_memo_relations(conn: &mut SqliteConnection) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM memo_relation
        WHERE memo_id NOT IN (SELECT id FROM memo)
           OR related_memo_id NOT IN (SELECT id FROM memo)
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
