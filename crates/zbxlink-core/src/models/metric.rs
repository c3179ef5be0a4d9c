//! 메트릭 모델.
//!
//! 트래퍼 프로토콜로 전송되는 단일 값. 직렬화 시 설정된 필드만 출력된다.

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// 메트릭 값: 서버는 숫자와 문자열을 모두 받는다
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// 정수
    Int(i64),
    /// 부동소수: 유한값만 허용 (NaN, 무한대는 JSON `null`이 된다)
    Float(#[serde(serialize_with = "finite_float")] f64),
    /// 문자열 (로그, 텍스트 아이템)
    Text(String),
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl TryFrom<f64> for MetricValue {
    type Error = CoreError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        if v.is_finite() {
            Ok(Self::Float(v))
        } else {
            Err(CoreError::validation(
                "value",
                format!("유한하지 않은 실수는 전송할 수 없음: {v}"),
            ))
        }
    }
}

fn finite_float<S: Serializer>(v: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !v.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "유한하지 않은 실수 값: {v}"
        )));
    }
    serializer.serialize_f64(*v)
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Text(v) => f.write_str(v),
        }
    }
}

/// 트래퍼 메트릭: 생성 후 변경 불가
///
/// `ns`는 `clock`이 있을 때만 설정할 수 있다.
/// `clock` 없이 `ns`를 지정하면 [`Metric::with_ns`]가 `Validation` 에러를 반환한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    host: String,
    key: String,
    value: MetricValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    clock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ns: Option<u32>,
}

impl Metric {
    /// 새 메트릭 생성 (타임스탬프 없음 → 서버 수신 시각 사용)
    pub fn new(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<MetricValue>,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock: None,
            ns: None,
        }
    }

    /// Unix 타임스탬프(초) 지정
    pub fn with_clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }

    /// 초 + 나노초 동시 지정
    pub fn with_timestamp(mut self, clock: i64, ns: u32) -> Self {
        self.clock = Some(clock);
        self.ns = Some(ns);
        self
    }

    /// 나노초 지정: `clock`이 먼저 설정되어 있어야 한다
    pub fn with_ns(mut self, ns: u32) -> Result<Self, CoreError> {
        if self.clock.is_none() {
            return Err(CoreError::validation(
                "ns",
                "clock 없이 ns를 지정할 수 없음",
            ));
        }
        self.ns = Some(ns);
        Ok(self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &MetricValue {
        &self.value
    }

    pub fn clock(&self) -> Option<i64> {
        self.clock
    }

    pub fn ns(&self) -> Option<u32> {
        self.ns
    }
}
