//! # 미들웨어 모듈
//!
//! - `auth`: Bearer JWT에서 요청자(user id)를 추출하는 Axum 추출자(Extractor)

pub mod auth;
