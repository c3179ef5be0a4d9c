//! 에이전트 설정 파일에서 트래퍼 엔드포인트 찾기.
//!
//! `Key=Value` 줄 단위 형식. 우선순위는 `ServerActive` → `Server` → 기본값
//! (`127.0.0.1:10051`). `ServerActive`는 `host[:port]` 목록이고 `Server`는
//! 수신 허용 주소 목록이라 CIDR 대역은 건너뛰고 기본 포트를 붙인다.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zbxlink_core::error::CoreError;
use zbxlink_core::models::endpoint::ServerEndpoint;

/// 에이전트 설정 기본 경로
pub const DEFAULT_AGENT_CONFIG_PATH: &str = "/etc/zabbix/zabbix_agentd.conf";

const SERVER_ACTIVE_KEY: &str = "ServerActive";
const SERVER_KEY: &str = "Server";

/// 에이전트 설정 위치
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentConfigSource {
    /// [`DEFAULT_AGENT_CONFIG_PATH`]
    DefaultPath,
    /// 명시적 경로
    Path(PathBuf),
}

impl AgentConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            AgentConfigSource::DefaultPath => Path::new(DEFAULT_AGENT_CONFIG_PATH),
            AgentConfigSource::Path(path) => path,
        }
    }
}

impl From<Option<PathBuf>> for AgentConfigSource {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => AgentConfigSource::Path(path),
            None => AgentConfigSource::DefaultPath,
        }
    }
}

/// 설정 파일을 읽어 엔드포인트 목록 반환
pub fn servers_from_config(source: &AgentConfigSource) -> Result<Vec<ServerEndpoint>, CoreError> {
    let path = source.path();
    debug!("에이전트 설정 로드: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(servers_from_config_str(&text))
}

/// 설정 텍스트에서 엔드포인트 목록 추출 (항상 하나 이상)
pub fn servers_from_config_str(text: &str) -> Vec<ServerEndpoint> {
    let server_active = last_value(text, SERVER_ACTIVE_KEY);
    let server = last_value(text, SERVER_KEY);

    let servers = match (server_active, server) {
        (Some(active), _) => parse_server_active(active),
        (None, Some(passive)) => parse_server(passive),
        (None, None) => Vec::new(),
    };

    if servers.is_empty() {
        debug!("에이전트 설정에 사용 가능한 엔드포인트 없음, 기본값 사용");
        return vec![ServerEndpoint::default()];
    }

    debug!("에이전트 설정 엔드포인트: {servers:?}");
    servers
}

/// 마지막으로 나타난 비어 있지 않은 값 (키는 대소문자 무시)
fn last_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .last()
        .filter(|v| !v.is_empty())
}

fn parse_server_active(value: &str) -> Vec<ServerEndpoint> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<ServerEndpoint>() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("ServerActive 항목 무시 ({entry}): {e}");
                None
            }
        })
        .collect()
}

fn parse_server(value: &str) -> Vec<ServerEndpoint> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| {
            if entry.contains('/') {
                debug!("Server CIDR 항목 건너뜀: {entry}");
                false
            } else {
                true
            }
        })
        .map(|entry| {
            let host = entry
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .unwrap_or(entry);
            ServerEndpoint::with_default_port(host)
        })
        .collect()
}
