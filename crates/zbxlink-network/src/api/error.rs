//! JSON-RPC 클라이언트 에러 타입.
//!
//! 전송 계층 실패는 `reqwest::Error`를 그대로 노출하고,
//! 서버가 돌려준 `error` 객체는 코드/메시지/데이터를 구조화해 보존한다.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use zbxlink_core::error::CoreError;

/// `error.data`가 없을 때 채우는 값 (기존 로그 파서 호환)
pub const NO_DATA: &str = "No data";

/// JSON-RPC 클라이언트 에러
///
/// 서버 에러 코드 예시:
/// - `-32700`: 잘못된 JSON
/// - `-32600`: 유효하지 않은 JSON-RPC 요청
/// - `-32601`: 존재하지 않는 메서드
/// - `-32602`: 잘못된 파라미터 (이미 존재하는 엔티티 포함)
/// - `-32603`: 내부 JSON-RPC 에러
/// - `-32500`: 애플리케이션 에러 (권한 없음 등)
/// - `-32400`: 시스템 에러
/// - `-32300`: 전송 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 전송 실패 (연결, 타임아웃, 2xx 이외 상태 코드)
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// 응답 본문이 비어 있음
    #[error("Received empty response")]
    EmptyResponse,

    /// 응답 본문이 JSON이 아님
    #[error("Unable to parse json: {raw}")]
    InvalidJson {
        /// 서버가 보낸 원문
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON-RPC 봉투 형식 오류 (`result`/`error` 누락 등)
    #[error("잘못된 JSON-RPC 응답: {0}")]
    Protocol(String),

    /// 서버가 반환한 API 에러
    #[error("Error {code}: {message}, {data}")]
    Api {
        /// JSON-RPC 에러 코드
        code: i64,
        /// 에러 메시지
        message: String,
        /// 상세 데이터 (없으면 `"No data"`)
        data: String,
    },

    /// 호출자 인자 오류 (위치/키워드 인자 동시 사용 등)
    #[error("잘못된 인자: {0}")]
    InvalidArgument(String),

    /// 코어 에러 (직렬화 등)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// 서버 `error` 객체
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl ApiError {
    /// 응답의 `error` 객체로부터 `Api` 에러 생성
    pub(crate) fn from_error_object(error: &Value) -> Self {
        match RpcErrorObject::deserialize(error) {
            Ok(obj) => {
                let data = match obj.data {
                    None | Some(Value::Null) => NO_DATA.to_string(),
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                };
                Self::Api {
                    code: obj.code,
                    message: obj.message,
                    data,
                }
            }
            Err(e) => Self::Protocol(format!("error 객체 해석 실패 ({e}): {error}")),
        }
    }

    /// API 에러 코드 (다른 종류면 `None`)
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// 라이브러리 자체 프로토콜 에러 여부
    ///
    /// 세션 가드는 이 종류의 에러(또는 성공)로 끝난 경우에만 로그아웃한다.
    /// 전송 실패, 인자 오류, 코어 에러는 해당하지 않는다.
    pub fn permits_logout(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::EmptyResponse | Self::InvalidJson { .. } | Self::Protocol(_)
        )
    }
}
