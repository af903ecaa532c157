//! # 데이터 모델 모듈
//!
//! 저장소 계층과 HTTP 계층이 공유하는 데이터 구조체들을 정의합니다.
//! - `memo`: 메모 엔티티, 지도 보기 투영, 조회/수정 조건, HTTP 요청 본문
//! - `relation`: 메모 고정(organizer)과 메모 간 관계(relation)
//! - `user`: 메모 작성자
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Memo`처럼 짧게 접근합니다.

pub mod memo;
pub mod relation;
pub mod user;

pub use memo::*;
pub use relation::*;
pub use user::*;
