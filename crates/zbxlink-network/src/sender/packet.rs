//! 트래퍼 패킷 코덱.
//!
//! 프레임 형식: `ZBXD` + `0x01` + 페이로드 길이(u64 little-endian) + JSON 페이로드.
//! 페이로드는 `", "`, `": "` 구분자로 직렬화한다. 기존 트래퍼 클라이언트와
//! 바이트 단위로 같은 요청을 만들어야 하기 때문이다.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use zbxlink_core::error::CoreError;
use zbxlink_core::models::metric::Metric;

use super::error::SenderError;

/// 프로토콜 시그니처 + 버전 바이트
pub const HEADER_MAGIC: &[u8; 5] = b"ZBXD\x01";

/// 헤더 길이 (시그니처 5 + 길이 8)
pub const HEADER_LEN: usize = 13;

/// 요청 종류 필드값
const SENDER_REQUEST: &str = "sender data";

/// 요소/키 사이에 공백을 넣는 JSON 포매터
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[derive(Serialize)]
struct SenderRequest<'a> {
    request: &'static str,
    data: &'a [Metric],
}

/// 메트릭 배치를 요청 페이로드(UTF-8 JSON)로 직렬화
pub fn create_request(metrics: &[Metric]) -> Result<Vec<u8>, CoreError> {
    let request = SenderRequest {
        request: SENDER_REQUEST,
        data: metrics,
    };
    let mut buf = Vec::with_capacity(64 + metrics.len() * 96);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    request.serialize(&mut ser)?;
    Ok(buf)
}

/// 페이로드에 헤더를 붙여 전송 프레임 생성
pub fn create_packet(request: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(HEADER_LEN + request.len());
    packet.extend_from_slice(HEADER_MAGIC);
    packet.extend_from_slice(&(request.len() as u64).to_le_bytes());
    packet.extend_from_slice(request);
    packet
}

/// 응답 헤더 검증 후 본문 길이 반환
pub fn parse_header(header: &[u8]) -> Result<usize, SenderError> {
    if header.len() != HEADER_LEN || !header.starts_with(HEADER_MAGIC) {
        return Err(SenderError::InvalidHeader {
            header: header.to_vec(),
        });
    }

    let mut len = [0u8; 8];
    len.copy_from_slice(&header[HEADER_MAGIC.len()..]);
    usize::try_from(u64::from_le_bytes(len)).map_err(|_| SenderError::InvalidHeader {
        header: header.to_vec(),
    })
}
