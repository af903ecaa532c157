//! # memos-store
//!
//! 메모(memo) 엔티티의 관계형 저장소 계층과 이를 노출하는 HTTP API입니다.
//!
//! - `db`: SQL 쿼리 (생성, 조건 조회, 지도 보기, 부분 수정, 삭제, vacuum)
//! - `models`: 엔티티와 조회/수정 조건 구조체
//! - `routes`: Axum 핸들러와 라우터
//! - `middleware`: 요청자 인증 (Bearer JWT)
//! - `config`, `error`: 환경변수 설정과 에러 타입

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
