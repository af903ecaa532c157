//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)와 통합 테스트가 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `memos`: 메모 생성/조회/지도 보기/수정/삭제, 작성자 없는 메모 정리
//! - `memo_organizers`: 사용자별 메모 고정 정보
//! - `memo_relations`: 메모 간 관계 (댓글 등)
//! - `users`: 메모 작성자
//! - `vacuum`: 고아 행 정리 트랜잭션

pub mod memo_organizers;
pub mod memo_relations;
pub mod memos;
pub mod users;
pub mod vacuum;

pub use memo_organizers::*;
pub use memo_relations::*;
pub use memos::*;
pub use vacuum::vacuum;
