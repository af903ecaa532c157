#![allow(dead_code)]

use memos_store::db;
use memos_store::models::*;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// 마이그레이션이 적용된 인메모리 SQLite 풀
///
/// `sqlite::memory:`는 연결마다 별도 DB이므로 연결을 하나로 고정하고 만료시키지 않습니다.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

pub async fn create_user(pool: &SqlitePool, username: &str, nickname: Option<&str>) -> User {
    db::users::create_user(
        pool,
        &CreateUser {
            username: username.to_string(),
            nickname: nickname.map(str::to_string),
            avatar_url: Some(format!("https://example.com/{}.png", username)),
        },
    )
    .await
    .expect("create user")
}

pub fn new_memo(creator_id: i64, content: &str, visibility: Visibility) -> CreateMemo {
    CreateMemo {
        resource_name: format!("memo-{}-{}", creator_id, content.replace(' ', "-")),
        creator_id,
        content: content.to_string(),
        visibility,
        location_name: None,
        location_lat: None,
        location_lon: None,
    }
}

pub fn located(mut create: CreateMemo, name: &str, lat: f64, lon: f64) -> CreateMemo {
    create.location_name = Some(name.to_string());
    create.location_lat = Some(lat);
    create.location_lon = Some(lon);
    create
}

pub fn by_id(id: i64) -> FindMemo {
    FindMemo {
        id: Some(id),
        ..Default::default()
    }
}

pub async fn set_created_ts(pool: &SqlitePool, id: i64, ts: i64) {
    db::update_memo(
        pool,
        &UpdateMemo {
            id,
            created_ts: Some(ts),
            ..Default::default()
        },
    )
    .await
    .expect("update created_ts");
}
