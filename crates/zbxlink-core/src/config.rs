//! 클라이언트 설정 구조체.
//!
//! JSON-RPC API 접속 정보와 트래퍼 전송 설정을 정의한다.
//! `config` crate를 통해 파일/환경변수에서 로드 ([`crate::config_manager`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::endpoint::ServerEndpoint;

/// 최상위 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// JSON-RPC API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// 트래퍼 전송 설정
    #[serde(default)]
    pub sender: SenderConfig,
}

impl AppConfig {
    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api.url.trim().is_empty() {
            return Err(CoreError::validation("api.url", "빈 URL"));
        }
        if self.sender.batch_size == 0 {
            return Err(CoreError::validation(
                "sender.batch_size",
                "배치 크기는 1 이상이어야 함",
            ));
        }
        if self.sender.timeout_secs == 0 {
            return Err(CoreError::validation(
                "sender.timeout_secs",
                "타임아웃은 1초 이상이어야 함",
            ));
        }
        self.sender.endpoints()?;
        Ok(())
    }
}

// ============================================================
// API 설정
// ============================================================

/// JSON-RPC API 접속 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 웹 프론트엔드 기본 URL (`/api_jsonrpc.php` 생략 가능)
    #[serde(default = "default_api_url")]
    pub url: String,
    /// HTTP 요청 타임아웃 (초). 없으면 무제한
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// 로그인 전 서버 버전 자동 감지
    #[serde(default = "default_true")]
    pub detect_version: bool,
    /// 구형 `user.authenticate` 사용
    #[serde(default)]
    pub use_authenticate: bool,
    /// 로그인 사용자명
    #[serde(default)]
    pub user: Option<String>,
    /// 로그인 비밀번호
    #[serde(default)]
    pub password: Option<String>,
    /// API 토큰 (설정 시 로그인 생략)
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: None,
            detect_version: true,
            use_authenticate: false,
            user: None,
            password: None,
            api_token: None,
        }
    }
}

impl ApiConfig {
    /// HTTP 타임아웃
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// ============================================================
// 트래퍼 전송 설정
// ============================================================

/// 트래퍼 전송 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// 전송 대상 목록 (`host[:port]`)
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,
    /// 에이전트 설정 파일에서 서버 목록 로드 (경로)
    #[serde(default)]
    pub agent_config: Option<PathBuf>,
    /// 에이전트 기본 설정 파일 사용 여부
    #[serde(default)]
    pub use_agent_config: bool,
    /// 배치당 메트릭 수
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// 소켓 타임아웃 (초)
    #[serde(default = "default_sender_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            agent_config: None,
            use_agent_config: false,
            batch_size: default_batch_size(),
            timeout_secs: default_sender_timeout_secs(),
        }
    }
}

impl SenderConfig {
    /// 소켓 타임아웃
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `servers` 문자열을 엔드포인트로 변환
    pub fn endpoints(&self) -> Result<Vec<ServerEndpoint>, CoreError> {
        self.servers.iter().map(|s| s.parse()).collect()
    }
}

fn default_api_url() -> String {
    "http://localhost/zabbix".to_string()
}

fn default_servers() -> Vec<String> {
    vec![ServerEndpoint::default().to_string()]
}

fn default_batch_size() -> usize {
    250
}

fn default_sender_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
