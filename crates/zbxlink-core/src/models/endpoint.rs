//! 서버 엔드포인트 모델.
//!
//! `host[:port]`, `[IPv6]:port`, 괄호 없는 IPv6 표기를 모두 해석한다.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// 트래퍼 기본 포트
pub const DEFAULT_TRAPPER_PORT: u16 = 10051;

/// 기본 트래퍼 호스트
pub const DEFAULT_TRAPPER_HOST: &str = "127.0.0.1";

/// 트래퍼 전송 대상 (host, port)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerEndpoint {
    /// 호스트명 또는 IP (IPv6는 괄호 없이 저장)
    pub host: String,
    /// TCP 포트
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// 기본 포트(10051) 엔드포인트
    pub fn with_default_port(host: impl Into<String>) -> Self {
        Self::new(host, DEFAULT_TRAPPER_PORT)
    }
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_TRAPPER_HOST, DEFAULT_TRAPPER_PORT)
    }
}

impl std::fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(raw: &str, input: &str) -> Result<u16, CoreError> {
    raw.parse::<u16>()
        .map_err(|_| CoreError::validation("port", format!("잘못된 포트: {input}")))
}

impl FromStr for ServerEndpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::validation("host", "빈 엔드포인트"));
        }

        // [IPv6] 또는 [IPv6]:port
        if let Some(rest) = s.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| CoreError::validation("host", format!("닫는 괄호 없음: {s}")))?;
            if host.is_empty() {
                return Err(CoreError::validation("host", format!("빈 호스트: {s}")));
            }
            let port = match after {
                "" => DEFAULT_TRAPPER_PORT,
                _ => {
                    let raw = after.strip_prefix(':').ok_or_else(|| {
                        CoreError::validation("port", format!("잘못된 포트 구분자: {s}"))
                    })?;
                    parse_port(raw, s)?
                }
            };
            return Ok(Self::new(host, port));
        }

        // 괄호 없는 IPv6: 포트 지정 불가
        if s.matches(':').count() > 1 {
            return Ok(Self::with_default_port(s));
        }

        match s.split_once(':') {
            Some((host, port)) if !host.is_empty() => Ok(Self::new(host, parse_port(port, s)?)),
            Some(_) => Err(CoreError::validation("host", format!("빈 호스트: {s}"))),
            None => Ok(Self::with_default_port(s)),
        }
    }
}
