//! # 메모 데이터베이스 쿼리 모듈
//!
//! `memo` 테이블에 대한 생성/조회/지도 보기/수정/삭제 쿼리와
//! 작성자가 사라진 메모를 지우는 vacuum 쿼리가 정의되어 있습니다.
//!
//! ## 시각(timestamp) 표현
//! DB에는 `2024-01-01T00:00:00Z` 형태의 UTC 문자열로 저장하고,
//! Rust 쪽에서는 epoch 초(i64)로 다룹니다. 변환은 모두 SQL 안에서 합니다.
//! - 읽기: `CAST(strftime('%s', memo.created_ts) AS INTEGER)`
//! - 쓰기: `strftime('%Y-%m-%dT%H:%M:%SZ', ?, 'unixepoch')`
//!
//! ## 계산 컬럼
//! - `pinned`: 작성자 본인의 `memo_organizer` 행에서 가져옵니다 (없으면 0).
//! - `parent_id`: COMMENT 타입 `memo_relation` 행의 `related_memo_id`입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const CREATED_TS_EPOCH: &str = "CAST(strftime('%s', memo.created_ts) AS INTEGER)";
const UPDATED_TS_EPOCH: &str = "CAST(strftime('%s', memo.updated_ts) AS INTEGER)";

/// 목록 조회 쿼리를 만듭니다.
///
/// `find`에서 설정된 필드만 WHERE 조건이 됩니다. 모든 값은 `push_bind`로 바인딩됩니다.
fn build_list_query(find: &FindMemo) -> QueryBuilder<'static, Sqlite> {
    let mut fields = vec![
        "memo.id AS id".to_string(),
        "memo.resource_name AS resource_name".to_string(),
        "memo.creator_id AS creator_id".to_string(),
        format!("{} AS created_ts", CREATED_TS_EPOCH),
        format!("{} AS updated_ts", UPDATED_TS_EPOCH),
        "memo.row_status AS row_status".to_string(),
        "memo.visibility AS visibility".to_string(),
        "IFNULL(memo_organizer.pinned, 0) AS pinned".to_string(),
        "memo_relation.related_memo_id AS parent_id".to_string(),
        "memo.location_name AS location_name".to_string(),
        "memo.location_lat AS location_lat".to_string(),
        "memo.location_lon AS location_lon".to_string(),
    ];
    if !find.exclude_content {
        fields.push("memo.content AS content".to_string());
    }

    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM memo \
         LEFT JOIN memo_organizer ON memo.id = memo_organizer.memo_id AND memo.creator_id = memo_organizer.user_id \
         LEFT JOIN memo_relation ON memo.id = memo_relation.memo_id AND memo_relation.type = 'COMMENT' \
         WHERE 1 = 1",
        fields.join(", "),
    ));

    if let Some(id) = find.id {
        builder.push(" AND memo.id = ").push_bind(id);
    }
    if let Some(resource_name) = &find.resource_name {
        builder
            .push(" AND memo.resource_name = ")
            .push_bind(resource_name.clone());
    }
    if let Some(creator_id) = find.creator_id {
        builder.push(" AND memo.creator_id = ").push_bind(creator_id);
    }
    if let Some(row_status) = find.row_status {
        builder.push(" AND memo.row_status = ").push_bind(row_status);
    }
    if let Some(ts) = find.created_ts_before {
        builder
            .push(format!(" AND {} < ", CREATED_TS_EPOCH))
            .push_bind(ts);
    }
    if let Some(ts) = find.created_ts_after {
        builder
            .push(format!(" AND {} > ", CREATED_TS_EPOCH))
            .push_bind(ts);
    }
    if let Some(ts) = find.updated_ts_before {
        builder
            .push(format!(" AND {} < ", UPDATED_TS_EPOCH))
            .push_bind(ts);
    }
    if let Some(ts) = find.updated_ts_after {
        builder
            .push(format!(" AND {} > ", UPDATED_TS_EPOCH))
            .push_bind(ts);
    }
    // SQLite의 LIKE는 ASCII 대소문자를 구분하지 않고 `%`, `_`를 와일드카드로 해석하므로
    // 대소문자를 구분하는 부분 문자열 검색에는 instr()을 사용합니다.
    for search in &find.content_search {
        builder
            .push(" AND instr(memo.content, ")
            .push_bind(search.clone())
            .push(") > 0");
    }
    if !find.visibility_list.is_empty() {
        builder.push(" AND memo.visibility IN (");
        let mut values = builder.separated(", ");
        for visibility in &find.visibility_list {
            values.push_bind(*visibility);
        }
        values.push_unseparated(")");
    }
    if find.exclude_comments {
        builder.push(" AND memo_relation.related_memo_id IS NULL");
    }

    builder.push(" ORDER BY ");
    if find.order_by_pinned {
        builder.push("pinned DESC, ");
    }
    if find.order_by_updated_ts {
        builder.push("updated_ts DESC, id DESC");
    } else {
        builder.push("created_ts DESC, id DESC");
    }

    if let Some(limit) = find.limit {
        builder.push(" LIMIT ").push_bind(limit);
        if let Some(offset) = find.offset {
            builder.push(" OFFSET ").push_bind(offset);
        }
    }

    builder
}

/// 지도 보기 쿼리를 만듭니다.
///
/// - `Some(user_id)`: 공개 메모 + 해당 사용자의 모든 메모
/// - `None`: 공개 메모만
fn build_map_query(user_id: Option<i64>) -> QueryBuilder<'static, Sqlite> {
    // COMMENT 관계만 조인하므로, 조인된 행이 없어야 댓글이 아닌 메모입니다.
    let mut builder = QueryBuilder::new(format!(
        "SELECT memo.id AS id, \
                memo.resource_name AS resource_name, \
                memo.creator_id AS creator_id, \
                COALESCE(`user`.nickname, `user`.username) AS creator_name, \
                `user`.avatar_url AS avatar_url, \
                memo.visibility AS visibility, \
                {} AS created_ts, \
                memo.location_name AS location_name, \
                memo.location_lat AS location_lat, \
                memo.location_lon AS location_lon, \
                memo.content AS content \
         FROM memo \
         LEFT JOIN `user` ON memo.creator_id = `user`.id \
         LEFT JOIN memo_relation ON memo.id = memo_relation.memo_id AND memo_relation.type = 'COMMENT' \
         WHERE memo.location_name IS NOT NULL \
           AND memo.location_lat IS NOT NULL \
           AND memo.location_lon IS NOT NULL \
           AND memo_relation.memo_id IS NULL",
        CREATED_TS_EPOCH,
    ));

    match user_id {
        Some(user_id) => {
            builder
                .push(" AND (memo.visibility = ")
                .push_bind(Visibility::Public)
                .push(" OR memo.creator_id = ")
                .push_bind(user_id)
                .push(")");
        }
        None => {
            builder
                .push(" AND memo.visibility = ")
                .push_bind(Visibility::Public);
        }
    }
    builder.push(" ORDER BY created_ts DESC, id DESC");

    builder
}

/// 부분 수정 UPDATE 문을 만듭니다.
///
/// 설정된 필드가 하나도 없으면 `SET id = id`로 실행되어 아무것도 바뀌지 않습니다.
/// 시각 필드는 epoch 초를 받아 `strftime(..., 'unixepoch')`로 저장 형식으로 바꿉니다.
fn build_update_statement(update: &UpdateMemo) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("UPDATE memo SET ");
    let mut set = builder.separated(", ");
    let mut changed = false;

    if let Some(resource_name) = &update.resource_name {
        set.push("resource_name = ")
            .push_bind_unseparated(resource_name.clone());
        changed = true;
    }
    if let Some(ts) = update.created_ts {
        set.push("created_ts = strftime('%Y-%m-%dT%H:%M:%SZ', ")
            .push_bind_unseparated(ts)
            .push_unseparated(", 'unixepoch')");
        changed = true;
    }
    if let Some(ts) = update.updated_ts {
        set.push("updated_ts = strftime('%Y-%m-%dT%H:%M:%SZ', ")
            .push_bind_unseparated(ts)
            .push_unseparated(", 'unixepoch')");
        changed = true;
    }
    if let Some(row_status) = update.row_status {
        set.push("row_status = ").push_bind_unseparated(row_status);
        changed = true;
    }
    if let Some(content) = &update.content {
        set.push("content = ").push_bind_unseparated(content.clone());
        changed = true;
    }
    if let Some(visibility) = update.visibility {
        set.push("visibility = ").push_bind_unseparated(visibility);
        changed = true;
    }
    if let Some(location_name) = &update.location_name {
        set.push("location_name = ")
            .push_bind_unseparated(location_name.clone());
        changed = true;
    }
    if !changed {
        set.push("id = id");
    }

    builder.push(" WHERE id = ").push_bind(update.id);
    builder
}

async fn insert_memo<'e, E>(executor: E, create: &CreateMemo) -> Result<i64, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO memo (resource_name, creator_id, content, visibility,
                          location_name, location_lat, location_lon)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&create.resource_name)
    .bind(create.creator_id)
    .bind(&create.content)
    .bind(create.visibility)
    .bind(&create.location_name)
    .bind(create.location_lat)
    .bind(create.location_lon)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn fetch_created(pool: &SqlitePool, id: i64) -> Result<Memo, AppError> {
    get_memo(
        pool,
        &FindMemo {
            id: Some(id),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| AppError::Consistency(format!("failed to retrieve created memo {}", id)))
}

/// 새 메모를 생성합니다.
///
/// INSERT 후 생성된 rowid로 다시 조회하여 계산 컬럼과 DB 기본값이 채워진 메모를 반환합니다.
///
/// # 에러
/// - `AppError::Database`: 제약 조건 위반(예: 중복 resource_name) 또는 연결 실패
/// - `AppError::Consistency`: 방금 삽입한 행을 다시 조회하지 못한 경우
pub async fn create_memo(pool: &SqlitePool, create: &CreateMemo) -> Result<Memo, AppError> {
    let id = insert_memo(pool, create).await?;
    tracing::debug!(memo_id = id, creator_id = create.creator_id, "memo created");

    fetch_created(pool, id).await
}

/// `parent_id` 메모에 대한 댓글 메모를 생성합니다.
///
/// 메모 INSERT와 COMMENT 관계 INSERT는 한 트랜잭션입니다.
/// 둘 중 하나라도 실패하면 아무것도 남지 않습니다.
pub async fn create_memo_comment(
    pool: &SqlitePool,
    create: &CreateMemo,
    parent_id: i64,
) -> Result<Memo, AppError> {
    let mut tx = pool.begin().await?;

    let id = insert_memo(&mut *tx, create).await?;
    super::upsert_memo_relation(
        &mut *tx,
        &MemoRelation {
            memo_id: id,
            related_memo_id: parent_id,
            relation_type: MemoRelationType::Comment,
        },
    )
    .await?;

    tx.commit().await?;
    tracing::debug!(memo_id = id, parent_id, "comment created");

    fetch_created(pool, id).await
}

/// 조건에 맞는 메모 목록을 조회합니다.
///
/// 정렬: (요청 시) 고정 메모 먼저 → 수정 또는 생성 시각 내림차순 → id 내림차순
///
/// 일치하는 행이 없으면 에러가 아니라 빈 Vec을 반환합니다.
pub async fn list_memos(pool: &SqlitePool, find: &FindMemo) -> Result<Vec<Memo>, AppError> {
    let mut query = build_list_query(find);
    let memos = query
        .build_query_as::<Memo>()
        .fetch_all(pool)
        .await?;

    Ok(memos)
}

/// 조건에 맞는 메모 하나를 조회합니다 (`limit 1`로 고정된 `list_memos`).
///
/// # 반환값
/// - `Ok(Some(Memo))`: 첫 번째 일치 행
/// - `Ok(None)`: 일치하는 행이 없음
pub async fn get_memo(pool: &SqlitePool, find: &FindMemo) -> Result<Option<Memo>, AppError> {
    let find = FindMemo {
        limit: Some(1),
        ..find.clone()
    };
    let memos = list_memos(pool, &find).await?;

    Ok(memos.into_iter().next())
}

/// 위치 정보가 있는 메모를 지도 보기용으로 조회합니다.
///
/// `user`가 있으면 공개 메모와 그 사용자의 메모(공개 범위 무관)를,
/// 없으면 공개 메모만 반환합니다. 댓글 메모는 항상 제외됩니다.
pub async fn list_map_memos(
    pool: &SqlitePool,
    user: Option<&User>,
) -> Result<Vec<MapMemo>, AppError> {
    let mut query = build_map_query(user.map(|u| u.id));
    let memos = query
        .build_query_as::<MapMemo>()
        .fetch_all(pool)
        .await?;

    Ok(memos)
}

/// 메모를 부분 수정합니다. 수정 결과를 다시 조회하지는 않습니다.
pub async fn update_memo(pool: &SqlitePool, update: &UpdateMemo) -> Result<(), AppError> {
    let mut statement = build_update_statement(update);
    statement.build().execute(pool).await?;

    Ok(())
}

/// 메모를 삭제한 뒤 vacuum 단계를 실행합니다.
///
/// vacuum 실패도 삭제 실패로 반환됩니다. 삭제 자체는 이미 반영된 상태입니다.
///
/// # 반환값
/// - `Ok(true)`: 행이 삭제됨
/// - `Ok(false)`: 해당 id의 메모가 없었음
pub async fn delete_memo(pool: &SqlitePool, delete: &DeleteMemo) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM memo WHERE id = ?")
        .bind(delete.id)
        .execute(pool)
        .await?;

    super::vacuum(pool).await?;

    Ok(result.rows_affected() > 0)
}

/// 작성자가 `user` 테이블에 더 이상 없는 메모를 삭제합니다.
///
/// 여러 번 실행해도 결과가 같으므로(idempotent) 동시에 실행되어도 문제없습니다.
/// 삭제된 행 수를 반환합니다.
pub async fn vacuum_memos(conn: &mut SqliteConnection) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM memo WHERE creator_id NOT IN (SELECT id FROM `user`)")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_without_filters_has_trivial_where_and_default_order() {
        let query = build_list_query(&FindMemo::default());
        assert!(query
            .sql()
            .ends_with("WHERE 1 = 1 ORDER BY created_ts DESC, id DESC"));
        assert!(query.sql().contains("memo.content AS content"));
        assert!(!query.sql().contains("LIMIT"));
        assert!(!query.sql().contains('?'));
    }

    #[test]
    fn list_adds_only_set_fields_in_order() {
        let find = FindMemo {
            creator_id: Some(7),
            row_status: Some(RowStatus::Normal),
            content_search: vec!["foo".to_string(), "bar".to_string()],
            visibility_list: vec![Visibility::Public, Visibility::Protected],
            ..Default::default()
        };
        let query = build_list_query(&find);

        assert!(query.sql().contains(
            "WHERE 1 = 1 AND memo.creator_id = ? AND memo.row_status = ? \
             AND instr(memo.content, ?) > 0 AND instr(memo.content, ?) > 0 \
             AND memo.visibility IN (?, ?) ORDER BY"
        ));
    }

    #[test]
    fn list_values_are_never_interpolated() {
        let find = FindMemo {
            resource_name: Some("x' OR '1'='1".to_string()),
            content_search: vec!["'; DROP TABLE memo; --".to_string()],
            ..Default::default()
        };
        let query = build_list_query(&find);
        assert!(!query.sql().contains("DROP TABLE"));
        assert!(!query.sql().contains("'1'='1"));
    }

    #[test]
    fn list_ordering_options() {
        let find = FindMemo {
            order_by_pinned: true,
            order_by_updated_ts: true,
            ..Default::default()
        };
        let query = build_list_query(&find);
        assert!(query
            .sql()
            .ends_with("ORDER BY pinned DESC, updated_ts DESC, id DESC"));
    }

    #[test]
    fn offset_requires_limit() {
        let only_offset = FindMemo {
            offset: Some(5),
            ..Default::default()
        };
        assert!(!build_list_query(&only_offset).sql().contains("OFFSET"));

        let both = FindMemo {
            limit: Some(10),
            offset: Some(5),
            ..Default::default()
        };
        assert!(build_list_query(&both).sql().ends_with(" LIMIT ? OFFSET ?"));
    }

    #[test]
    fn exclude_content_and_comments() {
        let find = FindMemo {
            exclude_content: true,
            exclude_comments: true,
            ..Default::default()
        };
        let query = build_list_query(&find);
        assert!(!query.sql().contains("memo.content AS content"));
        assert!(query.sql().contains("memo_relation.related_memo_id IS NULL"));
    }

    #[test]
    fn map_query_for_anonymous_is_public_only() {
        let query = build_map_query(None);
        assert!(query.sql().contains(" AND memo.visibility = ? ORDER BY"));
        assert!(!query.sql().contains("memo.creator_id = ?"));
    }

    #[test]
    fn map_query_for_user_includes_own_memos() {
        let query = build_map_query(Some(3));
        assert!(query
            .sql()
            .contains(" AND (memo.visibility = ? OR memo.creator_id = ?) ORDER BY"));
    }

    #[test]
    fn update_sets_only_present_fields_then_id() {
        let update = UpdateMemo {
            id: 42,
            content: Some("bye".to_string()),
            updated_ts: Some(1_700_000_000),
            ..Default::default()
        };
        let statement = build_update_statement(&update);
        assert_eq!(
            statement.sql(),
            "UPDATE memo SET updated_ts = strftime('%Y-%m-%dT%H:%M:%SZ', ?, 'unixepoch'), \
             content = ? WHERE id = ?"
        );
    }

    #[test]
    fn update_without_fields_is_a_no_op_statement() {
        let statement = build_update_statement(&UpdateMemo {
            id: 1,
            ..Default::default()
        });
        assert_eq!(statement.sql(), "UPDATE memo SET id = id WHERE id = ?");
    }
}
