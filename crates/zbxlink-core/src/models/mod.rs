//! zbxlink 도메인 모델.
//!
//! 트래퍼 전송 단위(메트릭)와 전송 대상(서버 엔드포인트)을 정의한다.

pub mod endpoint;
pub mod metric;
