//! # zbxlink-network
//!
//! 모니터링 서버 네트워크 어댑터.
//! JSON-RPC 제어 API 클라이언트와 트래퍼(바이너리 푸시) 전송기를 제공한다.
//! 두 프로토콜은 상태를 공유하지 않는다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use serde_json::json;
//! use zbxlink_network::api::ZabbixApi;
//! use zbxlink_network::sender::MetricSender;
//! use zbxlink_core::models::metric::Metric;
//!
//! let mut api = ZabbixApi::new("http://zabbix.example.com")?;
//! api.login("Admin", "zabbix", None).await?;
//! let hosts = api
//!     .namespace("host")
//!     .method("get")
//!     .kwarg("output", "extend")
//!     .call()
//!     .await?;
//!
//! let sender = MetricSender::new();
//! let result = sender.send(&[Metric::new("host1", "key1", 1)]).await?;
//! ```

pub mod agent_config;
pub mod api;
pub mod sender;

pub use api::{ApiError, ZabbixApi};
pub use sender::{MetricSender, SendResult, SenderError};
