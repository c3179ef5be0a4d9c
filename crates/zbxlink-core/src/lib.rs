//! # zbxlink-core
//!
//! zbxlink 도메인 모델, 설정, 에러 타입.
//! RPC 클라이언트와 트래퍼 전송기가 공유하는 핵심 타입을 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 메트릭, 서버 엔드포인트
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 클라이언트 설정 구조체
//! - [`config_manager`]: 설정 파일/환경변수 로드 (`config` crate)
//! - [`redact`]: 로그 출력용 민감 정보 마스킹

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod redact;
