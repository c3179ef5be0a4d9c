//! 트래퍼 응답 집계.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

use super::error::SenderError;

/// 서버 `info` 문자열 형식 (버전별 구두점 차이 허용)
static INFO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[Pp]rocessed:? (\d*);? [Ff]ailed:? (\d*);? [Tt]otal:? (\d*);? [Ss]econds spent:? (\d*\.\d*)",
    )
    .expect("info 정규식 컴파일 실패")
});

/// 엔드포인트 × 배치 단위 응답의 누적 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendResult {
    processed: u64,
    failed: u64,
    total: u64,
    time: Decimal,
    batch_count: u64,
}

impl SendResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 서버가 처리한 값 개수
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// 서버가 거부한 값 개수
    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// 서버 측 처리 시간 합계 (초, 정확한 십진수)
    pub fn time(&self) -> Decimal {
        self.time
    }

    /// 집계된 응답 수
    pub fn batch_count(&self) -> u64 {
        self.batch_count
    }

    /// 성공 응답 하나를 누적
    ///
    /// `info`가 형식과 맞지 않으면 아무 값도 바꾸지 않고 실패한다.
    pub fn parse(&mut self, response: &Value) -> Result<(), SenderError> {
        let info = response
            .get("info")
            .and_then(Value::as_str)
            .ok_or_else(|| SenderError::InvalidInfo {
                info: response.get("info").map(Value::to_string).unwrap_or_default(),
            })?;

        let invalid = || SenderError::InvalidInfo {
            info: info.to_string(),
        };
        let caps = INFO_RE.captures(info).ok_or_else(invalid)?;

        let count = |i: usize| -> Result<u64, SenderError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(invalid)
        };
        let processed = count(1)?;
        let failed = count(2)?;
        let total = count(3)?;
        let time = caps
            .get(4)
            .and_then(|m| Decimal::from_str(m.as_str()).ok())
            .ok_or_else(invalid)?;

        // 서버 입력이므로 넘침은 형식 오류로 취급
        let processed = self.processed.checked_add(processed).ok_or_else(invalid)?;
        let failed = self.failed.checked_add(failed).ok_or_else(invalid)?;
        let total = self.total.checked_add(total).ok_or_else(invalid)?;
        let time = self.time.checked_add(time).ok_or_else(invalid)?;

        self.processed = processed;
        self.failed = failed;
        self.total = total;
        self.time = time;
        self.batch_count += 1;
        Ok(())
    }
}

impl std::fmt::Display for SendResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = json!({
            "processed": self.processed,
            "failed": self.failed,
            "total": self.total,
            "time": self.time.to_string(),
            "chunk": self.batch_count,
        });
        write!(f, "{summary}")
    }
}
