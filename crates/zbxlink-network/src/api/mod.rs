//! JSON-RPC 제어 API 모듈
//!
//! `ZabbixApi`는 메서드 집합을 미리 선언하지 않고 호출 시점에
//! `namespace.method` 이름을 조립해 전송한다.
//!
//! ## 세션 정리
//!
//! ```rust,ignore
//! let mut api = ZabbixApi::new("http://zabbix.example.com")?;
//! let mut session = api.session();
//! session.login("Admin", "zabbix", None).await?;
//! let outcome = session.namespace("host").method("get").call().await;
//! let hosts = session.finish(outcome).await?;
//! ```

mod client;
mod dispatch;
mod error;
mod guard;
mod profile;
mod session;

pub use client::{normalize_url, ZabbixApi, ZabbixApiBuilder, API_PATH};
pub use dispatch::{ApiMethod, ApiNamespace};
pub use error::{ApiError, NO_DATA};
pub use guard::SessionGuard;
pub use profile::{parse_api_version, AuthPlacement, LoginStyle, ProtocolProfile};
pub use session::{AuthMode, Session};
