use crate::error::AppError;
use crate::models::user::{CreateUser, User};
use sqlx::SqlitePool;

pub async fn create_user(pool: &SqlitePool, create: &CreateUser) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO `user` (username, nickname, avatar_url)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&create.username)
    .bind(&create.nickname)
    .bind(&create.avatar_url)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Consistency(format!("failed to retrieve created user {}", id)))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, nickname, avatar_url,
               CAST(strftime('%s', created_ts) AS INTEGER) AS created_ts
        FROM `user`
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 사용자를 삭제하고, 그 사용자가 남긴 메모/고정 정보를 vacuum으로 정리합니다.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM `user` WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    super::vacuum(pool).await?;

    Ok(result.rows_affected() > 0)
}
