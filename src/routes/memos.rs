//! # 메모(Memo) 라우트 핸들러
//!
//! 저장소 계층(`db::memos`)을 HTTP로 노출하는 얇은 계층입니다.
//! 공개 범위 판단과 작성자 확인만 여기서 하고, SQL은 모두 `db` 모듈에 있습니다.
//!
//! ## 엔드포인트
//! - `GET    /api/v1/memos`                → 메모 목록 조회
//! - `POST   /api/v1/memos`                → 새 메모 생성
//! - `GET    /api/v1/memos/map`            → 위치가 있는 메모 (지도 보기)
//! - `GET    /api/v1/memos/{id}`           → 단일 메모 조회
//! - `PATCH  /api/v1/memos/{id}`           → 메모 수정 (부분 업데이트)
//! - `DELETE /api/v1/memos/{id}`           → 메모 삭제
//! - `PUT    /api/v1/memos/{id}/organizer` → 고정 여부 설정
//! - `POST   /api/v1/memos/{id}/comments`  → 댓글 메모 생성
//!
//! ## 공개 범위 규칙
//! - PUBLIC: 누구나
//! - PROTECTED: 로그인한 사용자
//! - PRIVATE: 작성자 본인

use crate::{
    db,
    error::AppError,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::*,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 토큰 검증용 비밀키
    pub jwt_secret: String,
}

/// 요청자가 메모를 볼 수 있는지 판단합니다.
fn can_view(memo: &Memo, user: Option<AuthUser>) -> bool {
    match memo.visibility {
        Visibility::Public => true,
        Visibility::Protected => user.is_some(),
        Visibility::Private => user.is_some_and(|u| u.user_id == memo.creator_id),
    }
}

/// 목록 조회 시 요청자에게 허용되는 공개 범위
fn visible_scopes(user: Option<AuthUser>, creator_id: Option<i64>) -> Vec<Visibility> {
    match user {
        None => vec![Visibility::Public],
        Some(u) if creator_id == Some(u.user_id) => vec![
            Visibility::Public,
            Visibility::Protected,
            Visibility::Private,
        ],
        Some(_) => vec![Visibility::Public, Visibility::Protected],
    }
}

fn validate_location(lat: Option<f64>, lon: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::BadRequest(format!("invalid latitude: {}", lat)));
        }
    }
    if let Some(lon) = lon {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::BadRequest(format!("invalid longitude: {}", lon)));
        }
    }
    Ok(())
}

/// 토큰의 사용자가 `user` 테이블에 있는지 확인합니다.
///
/// 삭제된 사용자의 토큰으로 만든 행은 다음 vacuum에서 사라지므로, 쓰기 전에 401로 막습니다.
async fn require_user(pool: &SqlitePool, auth: AuthUser) -> Result<User, AppError> {
    db::users::find_by_id(pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("user no longer exists".to_string()))
}

/// id로 메모를 찾고, 없거나 볼 수 없으면 404를 반환합니다.
///
/// 볼 수 없는 메모도 404로 응답하여 존재 여부를 드러내지 않습니다.
async fn find_visible_memo(
    pool: &SqlitePool,
    id: i64,
    user: Option<AuthUser>,
) -> Result<Memo, AppError> {
    let memo = db::get_memo(
        pool,
        &FindMemo {
            id: Some(id),
            ..Default::default()
        },
    )
    .await?
    .ok_or(AppError::NotFound)?;

    if !can_view(&memo, user) {
        return Err(AppError::NotFound);
    }
    Ok(memo)
}

/// `GET /memos` — 메모 목록을 조회합니다.
///
/// `{ "memos": [...] }` 형태의 JSON을 반환합니다. 결과가 없으면 빈 배열입니다.
pub async fn list_memos(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<ListMemosQuery>,
) -> Result<Json<Value>, AppError> {
    let scopes = visible_scopes(user, query.creator_id);
    let visibility_list = match query.visibility {
        Some(v) if scopes.contains(&v) => vec![v],
        // 요청한 공개 범위를 볼 권한이 없으면 결과는 항상 비어 있습니다.
        Some(_) => return Ok(Json(json!({ "memos": [] }))),
        None => scopes,
    };

    let find = FindMemo {
        creator_id: query.creator_id,
        row_status: query.row_status,
        content_search: query.content_search.into_iter().collect(),
        visibility_list,
        exclude_comments: query.exclude_comments,
        order_by_pinned: query.order_by_pinned,
        order_by_updated_ts: query.order_by_updated_ts,
        limit: query.limit,
        offset: query.offset,
        ..Default::default()
    };
    let memos = db::list_memos(&state.pool, &find).await?;

    Ok(Json(json!({ "memos": memos })))
}

/// `GET /memos/{id}` — 단일 메모를 조회합니다.
pub async fn get_memo(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Memo>, AppError> {
    let memo = find_visible_memo(&state.pool, id, user).await?;
    Ok(Json(memo))
}

/// `POST /memos` — 새 메모를 생성합니다.
///
/// `resource_name`이 없으면 UUIDv7을, `visibility`가 없으면 PRIVATE를 사용합니다.
pub async fn create_memo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateMemoRequest>,
) -> Result<(StatusCode, Json<Memo>), AppError> {
    validate_location(req.location_lat, req.location_lon)?;
    let creator = require_user(&state.pool, user).await?;

    let create = CreateMemo {
        resource_name: req
            .resource_name
            .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
        creator_id: creator.id,
        content: req.content,
        visibility: req.visibility.unwrap_or(Visibility::Private),
        location_name: req.location_name,
        location_lat: req.location_lat,
        location_lon: req.location_lon,
    };
    let memo = db::create_memo(&state.pool, &create).await?;

    Ok((StatusCode::CREATED, Json(memo)))
}

/// `PATCH /memos/{id}` — 작성자 본인만 메모를 수정할 수 있습니다.
///
/// 요청에 포함된 필드만 바뀌고, `updated_ts`는 현재 시각으로 갱신됩니다.
pub async fn update_memo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMemoRequest>,
) -> Result<Json<Memo>, AppError> {
    let memo = find_visible_memo(&state.pool, id, Some(user)).await?;
    if memo.creator_id != user.user_id {
        return Err(AppError::Forbidden("only the creator can edit a memo".to_string()));
    }

    let update = UpdateMemo {
        id,
        content: req.content,
        visibility: req.visibility,
        row_status: req.row_status,
        location_name: req.location_name,
        created_ts: req.created_ts,
        updated_ts: Some(chrono::Utc::now().timestamp()),
        ..Default::default()
    };
    db::update_memo(&state.pool, &update).await?;

    let memo = find_visible_memo(&state.pool, id, Some(user)).await?;
    Ok(Json(memo))
}

/// `DELETE /memos/{id}` — 작성자 본인만 메모를 삭제할 수 있습니다.
///
/// 삭제 후 vacuum 단계가 함께 실행됩니다. 성공 시 204 No Content.
pub async fn delete_memo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let memo = find_visible_memo(&state.pool, id, Some(user)).await?;
    if memo.creator_id != user.user_id {
        return Err(AppError::Forbidden("only the creator can delete a memo".to_string()));
    }

    let deleted = db::delete_memo(&state.pool, &DeleteMemo { id }).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    tracing::debug!(memo_id = id, "memo deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /memos/{id}/organizer` + `{ "pinned": true }` — 요청자 기준 고정 여부를 설정합니다.
///
/// 목록의 `pinned` 값은 작성자 본인의 설정만 반영합니다.
pub async fn upsert_memo_organizer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpsertOrganizerRequest>,
) -> Result<Json<MemoOrganizer>, AppError> {
    require_user(&state.pool, user).await?;
    find_visible_memo(&state.pool, id, Some(user)).await?;

    let organizer = db::upsert_memo_organizer(
        &state.pool,
        &MemoOrganizer {
            memo_id: id,
            user_id: user.user_id,
            pinned: req.pinned,
        },
    )
    .await?;

    Ok(Json(organizer))
}

/// `POST /memos/{id}/comments` — 메모에 댓글 메모를 추가합니다.
///
/// 댓글 메모와 COMMENT 관계는 한 트랜잭션으로 저장됩니다.
/// 반환되는 메모의 `parent_id`는 부모 메모의 id입니다.
pub async fn create_memo_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Memo>), AppError> {
    let creator = require_user(&state.pool, user).await?;
    let parent = find_visible_memo(&state.pool, id, Some(user)).await?;

    let create = CreateMemo {
        resource_name: uuid::Uuid::now_v7().to_string(),
        creator_id: creator.id,
        content: req.content,
        visibility: req.visibility.unwrap_or(parent.visibility),
        location_name: None,
        location_lat: None,
        location_lon: None,
    };
    let comment = db::create_memo_comment(&state.pool, &create, parent.id).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// `GET /memos/map` — 지도에 표시할 메모 목록을 조회합니다.
///
/// 로그인한 사용자는 공개 메모와 자신의 모든 메모를, 익명 사용자는 공개 메모만 봅니다.
pub async fn list_map_memos(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> Result<Json<Value>, AppError> {
    let user = match user {
        Some(auth) => Some(require_user(&state.pool, auth).await?),
        None => None,
    };

    let memos = db::list_map_memos(&state.pool, user.as_ref()).await?;
    Ok(Json(json!({ "memos": memos })))
}
