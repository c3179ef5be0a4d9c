//! 서브커맨드 실행.
//!
//! CLI 인자와 설정을 조합해 전송기/API 클라이언트를 만들고 한 번 실행한다.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};
use zbxlink_core::config::{ApiConfig, SenderConfig};
use zbxlink_core::models::endpoint::ServerEndpoint;
use zbxlink_core::models::metric::{Metric, MetricValue};
use zbxlink_network::agent_config::AgentConfigSource;
use zbxlink_network::api::ZabbixApi;
use zbxlink_network::sender::{MetricSender, SendResult};

/// `send` 인자
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// 모니터링 서버에 등록된 호스트명
    #[arg(long, short = 's')]
    pub host: String,

    /// 아이템 키
    #[arg(long, short = 'k')]
    pub key: String,

    /// 값 (정수, 실수 순으로 해석, 아니면 문자열)
    #[arg(long, short = 'o')]
    pub value: String,

    /// Unix 타임스탬프 (초)
    #[arg(long, conflicts_with = "now")]
    pub clock: Option<i64>,

    /// 현재 시각을 타임스탬프로 사용
    #[arg(long)]
    pub now: bool,

    /// 나노초 (타임스탬프 필요)
    #[arg(long)]
    pub ns: Option<u32>,

    /// 트래퍼 주소 `host[:port]` (반복 가능, 설정 파일 대체)
    #[arg(long = "server", short = 'z')]
    pub servers: Vec<String>,

    /// 에이전트 설정에서 서버 목록 로드 (경로 생략 시 기본 경로)
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    pub agent_config: Option<Option<PathBuf>>,

    /// 배치당 메트릭 수
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// `call` 인자
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CallArgs {
    /// `namespace.method` 형식 메서드명
    pub method: String,

    /// JSON 파라미터 (객체 또는 배열)
    #[arg(long, short = 'p')]
    pub params: Option<String>,

    /// 로그인 사용자명
    #[arg(long, requires = "password", conflicts_with = "token")]
    pub user: Option<String>,

    /// 로그인 비밀번호
    #[arg(long)]
    pub password: Option<String>,

    /// API 토큰 (로그인 생략)
    #[arg(long)]
    pub token: Option<String>,
}

/// 문자열 값을 정수 → 실수 → 문자열 순으로 해석
pub fn parse_value(raw: &str) -> MetricValue {
    if let Ok(v) = raw.parse::<i64>() {
        return MetricValue::Int(v);
    }
    raw.parse::<f64>()
        .ok()
        .and_then(|v| MetricValue::try_from(v).ok())
        .unwrap_or_else(|| MetricValue::Text(raw.to_string()))
}

/// 인자로부터 메트릭 생성
pub fn build_metric(args: &SendArgs) -> Result<Metric> {
    let mut metric = Metric::new(
        args.host.as_str(),
        args.key.as_str(),
        parse_value(&args.value),
    );

    let clock = if args.now {
        Some(chrono::Utc::now().timestamp())
    } else {
        args.clock
    };
    if let Some(clock) = clock {
        metric = metric.with_clock(clock);
    }
    if let Some(ns) = args.ns {
        metric = metric.with_ns(ns)?;
    }
    Ok(metric)
}

/// 전송 대상 결정
///
/// 우선순위: `--server` → `--agent-config` → 설정 파일 (`agent_config`, `servers`)
pub fn resolve_sender(config: &SenderConfig, args: &SendArgs) -> Result<MetricSender> {
    let sender = if !args.servers.is_empty() {
        let endpoints = args
            .servers
            .iter()
            .map(|s| s.parse::<ServerEndpoint>())
            .collect::<Result<Vec<_>, _>>()?;
        MetricSender::with_servers(endpoints)?
    } else if let Some(path) = &args.agent_config {
        MetricSender::from_agent_config(&AgentConfigSource::from(path.clone()))?
    } else if config.agent_config.is_some() || config.use_agent_config {
        MetricSender::from_agent_config(&AgentConfigSource::from(config.agent_config.clone()))?
    } else {
        MetricSender::with_servers(config.endpoints()?)?
    };

    let batch_size = args.batch_size.unwrap_or(config.batch_size);
    Ok(sender
        .with_batch_size(batch_size)?
        .with_timeout(config.timeout()))
}

pub async fn run_send(config: &SenderConfig, args: &SendArgs) -> Result<SendResult> {
    let metric = build_metric(args)?;
    let sender = resolve_sender(config, args)?;
    debug!("전송기: {sender:?}");

    let result = sender.send(&[metric]).await?;
    Ok(result)
}

/// `namespace.method` 분리
pub fn split_method(method: &str) -> Result<(&str, &str)> {
    match method.split_once('.') {
        Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Ok((ns, name)),
        _ => bail!("메서드명은 namespace.method 형식이어야 함: {method}"),
    }
}

/// `--params` 해석 (없으면 빈 객체)
pub fn parse_params(raw: Option<&str>) -> Result<Value> {
    let params: Value = match raw {
        Some(raw) => serde_json::from_str(raw).context("--params JSON 해석 실패")?,
        None => Value::Object(Default::default()),
    };
    match params {
        Value::Object(_) | Value::Array(_) => Ok(params),
        other => Err(anyhow!("--params는 객체 또는 배열이어야 함: {other}")),
    }
}

/// 설정으로부터 API 클라이언트 생성
pub fn build_api(config: &ApiConfig) -> Result<ZabbixApi> {
    let mut builder = ZabbixApi::builder(&config.url)
        .use_authenticate(config.use_authenticate)
        .detect_version(config.detect_version);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

pub async fn run_call(config: &ApiConfig, args: &CallArgs) -> Result<Value> {
    let (namespace, method) = split_method(&args.method)?;
    let params = parse_params(args.params.as_deref())?;
    let mut api = build_api(config)?;

    let token = args.token.as_deref().or(config.api_token.as_deref());
    let user = args.user.as_deref().or(config.user.as_deref());
    let password = args.password.as_deref().or(config.password.as_deref());

    if let Some(token) = token {
        if config.detect_version {
            api.detect_version().await?;
        }
        api.login("", "", Some(token)).await?;
        info!("API 토큰으로 호출: {}", args.method);
        let result = api.namespace(namespace).method(method).params(params).call().await?;
        return Ok(result);
    }

    if let (Some(user), Some(password)) = (user, password) {
        let mut session = api.session();
        let outcome = match session.login(user, password, None).await {
            Ok(()) => {
                session
                    .namespace(namespace)
                    .method(method)
                    .params(params)
                    .call()
                    .await
            }
            Err(e) => Err(e),
        };
        return Ok(session.finish(outcome).await?);
    }

    debug!("인증 정보 없음, 익명 호출: {}", args.method);
    let result = api.namespace(namespace).method(method).params(params).call().await?;
    Ok(result)
}

pub async fn run_version(config: &ApiConfig) -> Result<String> {
    let mut api = build_api(config)?;
    Ok(api.api_version().await?)
}
