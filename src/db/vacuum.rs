//! # 고아(orphan) 행 정리
//!
//! 외래 키 없이 삭제가 일어나므로, 삭제 후 참조 대상이 사라진 행을 지웁니다.
//! 순서가 중요합니다: 메모를 먼저 지워야 그 메모를 가리키는 고정/관계 행도 함께 정리됩니다.

use crate::db::{memo_organizers, memo_relations, memos};
use crate::error::AppError;
use sqlx::SqlitePool;

/// 메모 → 고정 정보 → 관계 순으로 한 트랜잭션 안에서 정리합니다.
///
/// 어느 단계든 실패하면 트랜잭션은 롤백되고 에러가 반환됩니다.
pub async fn vacuum(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let removed_memos = memos::vacuum_memos(&mut *tx).await?;
    let removed_organizers = memo_organizers::vacuum_memo_organizers(&mut *tx).await?;
    let removed_relations = memo_relations::vacuum_memo_relations(&mut *tx).await?;

    tx.commit().await?;

    if removed_memos + removed_organizers + removed_relations > 0 {
        tracing::debug!(
            memos = removed_memos,
            organizers = removed_organizers,
            relations = removed_relations,
            "vacuum removed orphaned rows"
        );
    }

    Ok(())
}
