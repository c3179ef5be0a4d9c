//! 트래퍼 전송기 에러 타입.

use serde_json::Value;
use thiserror::Error;
use zbxlink_core::error::CoreError;

/// 트래퍼 전송 에러
#[derive(Debug, Error)]
pub enum SenderError {
    /// 연결, 쓰기, 읽기 실패와 타임아웃 (`ErrorKind::TimedOut`)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 응답 헤더가 `ZBXD\x01`로 시작하는 13바이트가 아님
    #[error("잘못된 응답 헤더: {header:02x?}")]
    InvalidHeader {
        /// 실제로 읽은 바이트
        header: Vec<u8>,
    },

    /// 응답 본문이 헤더에 선언된 길이보다 짧음
    #[error("응답 본문 길이 불일치: 예상 {expected}바이트, 수신 {actual}바이트")]
    ShortBody { expected: usize, actual: usize },

    /// 응답 본문이 JSON이 아님
    #[error("응답 JSON 해석 실패: {raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// 서버가 `response != "success"`로 응답
    #[error("서버가 데이터를 거부함: {response}")]
    Rejected {
        /// 서버 응답 원문
        response: Value,
    },

    /// `info` 문자열이 집계 형식과 맞지 않음
    #[error("info 형식 불일치: {info}")]
    InvalidInfo { info: String },

    /// 코어 에러 (인자 검증 등)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SenderError {
    /// 트래퍼 프로토콜 위반 여부 (전송 실패, 인자 오류는 제외)
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHeader { .. }
                | Self::ShortBody { .. }
                | Self::InvalidJson { .. }
                | Self::Rejected { .. }
                | Self::InvalidInfo { .. }
        )
    }
}
