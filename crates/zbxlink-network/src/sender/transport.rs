//! 트래퍼 TCP 전송.
//!
//! 엔드포인트당 소켓 하나로 요청 프레임을 쓰고 응답 프레임을 읽는다.
//! 소켓은 모든 경로에서 drop으로 닫힌다.

use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;
use tracing::{debug, warn};
use zbxlink_core::models::endpoint::ServerEndpoint;

use super::error::SenderError;
use super::packet::{parse_header, HEADER_LEN};

/// 양방향 비동기 스트림
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// 래핑된 연결 (평문 TCP 또는 TLS 등)
pub type BoxedStream = Box<dyn AsyncStream>;

/// 연결 직후 스트림 래핑 (TLS 등)
///
/// 구현: 호출자 제공. 기본값은 평문 TCP.
#[async_trait]
pub trait StreamWrapper: Send + Sync {
    /// 연결된 TCP 스트림을 감싸 반환
    async fn wrap(&self, stream: TcpStream, endpoint: &ServerEndpoint) -> io::Result<BoxedStream>;
}

/// `ErrorKind::TimedOut` I/O 에러 생성
pub(crate) fn timed_out(limit: Duration, what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("{what}: {}초 후 타임아웃", limit.as_secs_f64()),
    )
}

/// 타임아웃을 `ErrorKind::TimedOut` I/O 에러로 변환
pub(crate) async fn with_timeout<T, F>(limit: Duration, what: &str, fut: F) -> io::Result<T>
where
    F: std::future::Future<Output = io::Result<T>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(timed_out(limit, what)),
    }
}

/// 엔드포인트 이름 해석 후 응답하는 첫 주소로 연결
///
/// IPv4/IPv6 후보를 순서대로 시도한다. 후보마다 `limit` 안에 연결되어야 한다.
pub async fn connect(endpoint: &ServerEndpoint, limit: Duration) -> io::Result<TcpStream> {
    let candidates: Vec<SocketAddr> = with_timeout(
        limit,
        "이름 해석",
        lookup_host((endpoint.host.as_str(), endpoint.port)),
    )
    .await?
    .collect();

    let mut last_error = None;
    for addr in candidates {
        match with_timeout(limit, "연결", TcpStream::connect(addr)).await {
            Ok(stream) => {
                debug!("트래퍼 연결: {endpoint} ({addr})");
                return Ok(stream);
            }
            Err(e) => {
                warn!("연결 실패 {addr}: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("연결 가능한 주소 없음: {endpoint}"),
        )
    }))
}

/// 최대 `count`바이트 읽기 (EOF에서 멈춤)
pub(crate) async fn receive<S>(stream: &mut S, count: usize) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut buf = Vec::with_capacity(count.min(64 * 1024));
    (&mut *stream).take(count as u64).read_to_end(&mut buf).await?;
    Ok(buf)
}

/// 요청 프레임 전송 후 응답 JSON 수신
pub(crate) async fn exchange<S>(stream: &mut S, packet: &[u8]) -> Result<Value, SenderError>
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    stream.write_all(packet).await?;
    stream.flush().await?;

    let header = receive(stream, HEADER_LEN).await?;
    debug!("응답 헤더: {header:02x?}");
    let expected = parse_header(&header)?;

    let body = receive(stream, expected).await?;
    if body.len() != expected {
        return Err(SenderError::ShortBody {
            expected,
            actual: body.len(),
        });
    }

    match serde_json::from_slice(&body) {
        Ok(value) => Ok(value),
        Err(source) => Err(SenderError::InvalidJson {
            raw: String::from_utf8_lossy(&body).into_owned(),
            source,
        }),
    }
}
