//! 트래퍼 전송기.
//!
//! 메트릭을 배치로 나눠 모든 엔드포인트에 순서대로 전송하고,
//! 각 엔드포인트의 승인 응답을 [`SendResult`]로 누적한다.
//! 배치 N+1은 모든 엔드포인트가 배치 N을 승인한 뒤에 보낸다. 재시도는 없다.

mod error;
mod packet;
mod response;
mod transport;

pub use error::SenderError;
pub use packet::{create_packet, create_request, parse_header, HEADER_LEN, HEADER_MAGIC};
pub use response::SendResult;
pub use transport::{connect, AsyncStream, BoxedStream, StreamWrapper};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use zbxlink_core::error::CoreError;
use zbxlink_core::models::endpoint::ServerEndpoint;
use zbxlink_core::models::metric::Metric;
use zbxlink_core::redact::hide_sensitive;

use crate::agent_config::{servers_from_config, AgentConfigSource};
use transport::{exchange, timed_out, with_timeout};

/// 배치당 기본 메트릭 수
pub const DEFAULT_BATCH_SIZE: usize = 250;

/// 소켓당 기본 타임아웃
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 서버 승인 응답값
const SUCCESS: &str = "success";

/// 트래퍼 프로토콜 전송기
#[derive(Clone)]
pub struct MetricSender {
    servers: Vec<ServerEndpoint>,
    batch_size: usize,
    timeout: Duration,
    wrapper: Option<Arc<dyn StreamWrapper>>,
}

impl std::fmt::Debug for MetricSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricSender")
            .field("servers", &self.servers)
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .field("wrapped", &self.wrapper.is_some())
            .finish()
    }
}

impl Default for MetricSender {
    fn default() -> Self {
        Self {
            servers: vec![ServerEndpoint::default()],
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            wrapper: None,
        }
    }
}

impl MetricSender {
    /// `127.0.0.1:10051` 단일 엔드포인트로 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 단일 엔드포인트로 생성
    pub fn with_server(endpoint: ServerEndpoint) -> Self {
        Self {
            servers: vec![endpoint],
            ..Self::default()
        }
    }

    /// 엔드포인트 목록으로 생성 (비어 있으면 에러)
    pub fn with_servers(servers: Vec<ServerEndpoint>) -> Result<Self, CoreError> {
        if servers.is_empty() {
            return Err(CoreError::validation("servers", "엔드포인트가 하나 이상 필요"));
        }
        Ok(Self {
            servers,
            ..Self::default()
        })
    }

    /// 에이전트 설정 파일에서 엔드포인트를 읽어 생성
    pub fn from_agent_config(source: &AgentConfigSource) -> Result<Self, CoreError> {
        Self::with_servers(servers_from_config(source)?)
    }

    /// 기본 배치 크기 변경 (0이면 에러)
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, CoreError> {
        if batch_size == 0 {
            return Err(CoreError::validation("batch_size", "1 이상이어야 함"));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// 소켓 타임아웃 (연결, 송수신 각각에 적용)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 연결 직후 스트림 래퍼 지정 (TLS 등)
    pub fn with_stream_wrapper(mut self, wrapper: Arc<dyn StreamWrapper>) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    pub fn servers(&self) -> &[ServerEndpoint] {
        &self.servers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 인스턴스 배치 크기로 전송
    pub async fn send(&self, metrics: &[Metric]) -> Result<SendResult, SenderError> {
        self.send_with_batch_size(metrics, self.batch_size).await
    }

    /// 호출 단위 배치 크기로 전송 (인스턴스 설정은 바뀌지 않음)
    pub async fn send_with_batch_size(
        &self,
        metrics: &[Metric],
        batch_size: usize,
    ) -> Result<SendResult, SenderError> {
        if batch_size == 0 {
            return Err(CoreError::validation("batch_size", "1 이상이어야 함").into());
        }

        let mut result = SendResult::new();
        for (index, batch) in metrics.chunks(batch_size).enumerate() {
            debug!("배치 {index} 전송: {}개 메트릭", batch.len());
            let request = create_request(batch)?;
            debug!(
                "요청: {}",
                hide_sensitive(&String::from_utf8_lossy(&request))
            );
            let packet = create_packet(&request);

            for endpoint in &self.servers {
                let response = self.send_packet(endpoint, &packet).await?;
                debug!("{endpoint} 응답: {response}");

                if response.get("response").and_then(|v| v.as_str()) != Some(SUCCESS) {
                    warn!("{endpoint}가 데이터를 거부함: {response}");
                    return Err(SenderError::Rejected { response });
                }
                result.parse(&response)?;
            }
        }

        info!("트래퍼 전송 완료: {result}");
        Ok(result)
    }

    /// 엔드포인트 하나에 프레임 하나를 보내고 응답 수신
    async fn send_packet(
        &self,
        endpoint: &ServerEndpoint,
        packet: &[u8],
    ) -> Result<serde_json::Value, SenderError> {
        let tcp = connect(endpoint, self.timeout).await?;
        let mut stream: BoxedStream = match &self.wrapper {
            Some(wrapper) => with_timeout(self.timeout, "래핑", wrapper.wrap(tcp, endpoint))
                .await
                .inspect_err(|e| warn!("{endpoint} 스트림 래핑 실패: {e}"))?,
            None => Box::new(tcp),
        };

        match tokio::time::timeout(self.timeout, exchange(&mut *stream, packet)).await {
            Ok(result) => result,
            Err(_) => {
                let err = timed_out(self.timeout, "송수신");
                warn!("{endpoint} 전송 실패: {err}");
                Err(err.into())
            }
        }
    }
}
