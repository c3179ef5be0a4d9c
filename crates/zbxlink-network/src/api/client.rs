//! JSON-RPC 2.0 API 클라이언트.
//!
//! 임의의 `namespace.method` 호출을 HTTP POST 요청으로 변환하고,
//! 인증 토큰을 서버 버전에 맞는 위치에 자동으로 첨부한다.

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use semver::Version;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use zbxlink_core::error::CoreError;
use zbxlink_core::redact::hide_sensitive;

use super::dispatch::ApiNamespace;
use super::error::ApiError;
use super::guard::SessionGuard;
use super::profile::{parse_api_version, AuthPlacement};
use super::session::Session;

/// JSON-RPC 엔드포인트 경로
pub const API_PATH: &str = "/api_jsonrpc.php";

/// 요청 Content-Type
const JSON_RPC_CONTENT_TYPE: &str = "application/json-rpc";

/// 고정 User-Agent
const CLIENT_USER_AGENT: &str = "rust/zbxlink";

/// 토큰 없이 호출해야 하는 메서드 (로그인 전에도 도달 가능)
const ANONYMOUS_METHODS: [&str; 3] = [
    "apiinfo.version",
    "user.checkAuthentication",
    "user.login",
];

/// 기본 URL 정규화: 끝 `/` 제거 후 `/api_jsonrpc.php`를 한 번만 붙인다
pub fn normalize_url(server: &str) -> String {
    if server.ends_with(API_PATH) {
        server.to_string()
    } else {
        format!("{}{}", server.trim_end_matches('/'), API_PATH)
    }
}

/// `ZabbixApi` 빌더
#[derive(Debug)]
pub struct ZabbixApiBuilder {
    server: String,
    client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    use_authenticate: bool,
    detect_version: bool,
    server_version: Option<Version>,
}

impl ZabbixApiBuilder {
    /// 미리 구성된 HTTP 클라이언트 사용 (프록시, TLS 설정 등)
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// 요청 타임아웃
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 구형 `user.authenticate` 로그인 사용
    pub fn use_authenticate(mut self, enabled: bool) -> Self {
        self.use_authenticate = enabled;
        self
    }

    /// 로그인 전 서버 버전 자동 감지 여부
    pub fn detect_version(mut self, enabled: bool) -> Self {
        self.detect_version = enabled;
        self
    }

    /// 알려진 서버 버전을 미리 지정 (감지 요청 없이 프로필 결정)
    ///
    /// API 토큰만 쓰는 클라이언트가 6.4.0 이상 서버에 Bearer 헤더를 보내도록 할 때 쓴다.
    pub fn server_version(mut self, version: Version) -> Self {
        self.server_version = Some(version);
        self
    }

    pub fn build(self) -> Result<ZabbixApi, ApiError> {
        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        let url = normalize_url(&self.server);
        info!("JSON-RPC 엔드포인트: {url}");

        let mut session = Session::default();
        match self.server_version {
            Some(version) => session.set_version(version, self.use_authenticate),
            None => session.refresh_profile(self.use_authenticate),
        }

        Ok(ZabbixApi {
            client,
            url,
            timeout: self.timeout,
            use_authenticate: self.use_authenticate,
            detect_version: self.detect_version,
            session,
        })
    }
}

/// JSON-RPC API 클라이언트
///
/// 메서드 집합을 미리 선언하지 않는다. `namespace("host").method("get")`
/// 또는 `call("host.get", params)`로 호출 시점에 이름을 조립한다.
#[derive(Debug)]
pub struct ZabbixApi {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
    use_authenticate: bool,
    detect_version: bool,
    session: Session,
}

impl ZabbixApi {
    /// 기본 설정으로 클라이언트 생성
    pub fn new(server: &str) -> Result<Self, ApiError> {
        Self::builder(server).build()
    }

    pub fn builder(server: &str) -> ZabbixApiBuilder {
        ZabbixApiBuilder {
            server: server.to_string(),
            client: None,
            timeout: None,
            use_authenticate: false,
            detect_version: true,
            server_version: None,
        }
    }

    /// 정규화된 엔드포인트 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 현재 인증 토큰 (비어 있으면 미인증)
    pub fn auth(&self) -> &str {
        self.session.auth()
    }

    /// 다음 요청 ID
    pub fn request_id(&self) -> u64 {
        self.session.request_id()
    }

    /// 감지된 서버 버전
    pub fn version(&self) -> Option<&Version> {
        self.session.version()
    }

    pub fn uses_api_token(&self) -> bool {
        self.session.uses_api_token()
    }

    pub fn session_state(&self) -> &Session {
        &self.session
    }

    /// 네임스페이스 핸들 (`host`, `item`, ...)
    pub fn namespace(&mut self, name: &str) -> ApiNamespace<'_> {
        ApiNamespace::new(self, name)
    }

    /// 범위 기반 세션: `finish` 시 조건부 로그아웃
    pub fn session(&mut self) -> SessionGuard<'_> {
        SessionGuard::new(self)
    }

    /// 요청 전송 후 응답 봉투 전체 반환
    ///
    /// `params`는 객체(키워드 인자) 또는 배열(위치 인자)이어야 한다. `null`은 `{}`로 보낸다.
    /// 요청 ID는 결과와 무관하게 발급될 때마다 1씩 증가한다.
    pub async fn do_request(&mut self, method: &str, params: Value) -> Result<Value, ApiError> {
        let params = match params {
            Value::Null => json!({}),
            Value::Object(_) | Value::Array(_) => params,
            other => {
                return Err(ApiError::InvalidArgument(format!(
                    "params는 객체 또는 배열이어야 함: {other}"
                )))
            }
        };

        let id = self.session.take_id();
        let mut payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, JSON_RPC_CONTENT_TYPE)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CACHE_CONTROL, "no-cache");

        let token = self.session.auth();
        if !token.is_empty() && !ANONYMOUS_METHODS.contains(&method) {
            match self.session.profile().auth {
                AuthPlacement::BearerHeader => request = request.bearer_auth(token),
                AuthPlacement::BodyField => payload["auth"] = Value::String(token.to_string()),
            }
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let body = serde_json::to_vec(&payload).map_err(CoreError::from)?;
        debug!("전송: {}", hide_sensitive(&String::from_utf8_lossy(&body)));

        let resp = request.body(body).send().await?;
        debug!("응답 코드: {}", resp.status());

        let resp = resp.error_for_status()?;
        let text = resp.text().await?;

        if text.is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        let response: Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(source) => return Err(ApiError::InvalidJson { raw: text, source }),
        };
        debug!("응답 본문: {}", hide_sensitive(&text));

        if let Some(error) = response.get("error") {
            return Err(ApiError::from_error_object(error));
        }

        Ok(response)
    }

    /// 메서드 호출 후 `result` 필드 반환
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, ApiError> {
        let mut response = self.do_request(method, params).await?;
        match response.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(ApiError::Protocol(format!(
                "result 필드 없음 ({method}): {response}"
            ))),
        }
    }

    /// 서버 API 버전 문자열 (`apiinfo.version`, 인증 불필요)
    pub async fn api_version(&mut self) -> Result<String, ApiError> {
        let result = self.namespace("apiinfo").method("version").call().await?;
        match result {
            Value::String(version) => Ok(version),
            other => Err(ApiError::Protocol(format!(
                "apiinfo.version 응답이 문자열이 아님: {other}"
            ))),
        }
    }

    /// 서버 버전 감지 후 세션 프로필 갱신
    pub async fn detect_version(&mut self) -> Result<Version, ApiError> {
        let raw = self.api_version().await?;
        let version = parse_api_version(&raw)?;
        self.session.set_version(version.clone(), self.use_authenticate);
        info!("API 버전: {version}");
        Ok(version)
    }

    /// 로그인 후 토큰 저장
    ///
    /// `api_token`이 주어지면 네트워크 호출 없이 토큰 모드로 전환한다.
    ///
    /// **주의:** 이 경로는 버전을 감지하지 않는다. 버전을 모르면 토큰은 본문 `auth`
    /// 필드로 전달되고, 본문 `auth`를 제거한 서버(7.2 이상 등)는 호출을 거부한다.
    /// 6.4.0 이상 서버라면 먼저 [`Self::detect_version`]을 호출하거나
    /// [`ZabbixApiBuilder::server_version`]으로 버전을 지정해 Bearer 헤더를 쓰게 한다.
    pub async fn login(
        &mut self,
        user: &str,
        password: &str,
        api_token: Option<&str>,
    ) -> Result<(), ApiError> {
        if let Some(token) = api_token {
            self.session.set_api_token(token);
            info!("API 토큰 인증 사용");
            return Ok(());
        }

        if self.detect_version {
            self.detect_version().await?;
        }

        // 무효한 토큰이 남아 있으면 로그인 요청이 거부되므로 먼저 비운다
        self.session.clear_auth();

        let style = self.session.profile().login;
        let result = self
            .namespace("user")
            .method(style.method_name())
            .kwarg(style.user_field(), user)
            .kwarg("password", password)
            .call()
            .await?;

        let token = match result {
            Value::String(token) => token,
            other => {
                return Err(ApiError::Protocol(format!(
                    "로그인 응답이 문자열 토큰이 아님: {}",
                    hide_sensitive(&other.to_string())
                )))
            }
        };

        self.session.set_credentials_token(token);
        debug!("로그인 성공: {user}");
        Ok(())
    }

    /// 로그아웃 (`user.logout`): API 토큰 모드에서는 아무것도 하지 않는다
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        if self.session.uses_api_token() {
            return Ok(());
        }

        self.namespace("user").method("logout").call().await?;
        self.session.clear_auth();
        debug!("로그아웃 완료");
        Ok(())
    }

    /// `user.checkAuthentication` 원본 결과: API 토큰 모드에서는 `true`
    pub async fn check_authentication(&mut self) -> Result<Value, ApiError> {
        if self.session.uses_api_token() {
            return Ok(Value::Bool(true));
        }

        let session_id = self.session.auth().to_string();
        self.namespace("user")
            .method("checkAuthentication")
            .kwarg("sessionid", session_id)
            .call()
            .await
    }

    /// 현재 세션이 유효한지 확인
    ///
    /// 서버가 API 에러로 답하면 미인증으로 본다. 전송 실패는 그대로 반환한다.
    pub async fn is_authenticated(&mut self) -> Result<bool, ApiError> {
        if self.session.uses_api_token() {
            return Ok(true);
        }
        if self.session.auth().is_empty() {
            return Ok(false);
        }

        match self.check_authentication().await {
            Ok(_) => Ok(true),
            Err(e) if e.permits_logout() => {
                debug!("인증 확인 실패: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TOKEN: &str = "0424bd59b807674191e7d77572075f33";

    fn rpc_result(result: Value, id: u64) -> String {
        json!({"jsonrpc": "2.0", "result": result, "id": id}).to_string()
    }

    async fn mock_method(
        server: &mut mockito::ServerGuard,
        method: &str,
        result: Value,
    ) -> mockito::Mock {
        server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(rpc_result(result, 0))
            .create_async()
            .await
    }

    #[test]
    fn url_normalization() {
        assert_eq!(normalize_url("http://h"), "http://h/api_jsonrpc.php");
        assert_eq!(normalize_url("http://h/"), "http://h/api_jsonrpc.php");
        assert_eq!(normalize_url("http://h/base"), "http://h/base/api_jsonrpc.php");
        assert_eq!(normalize_url("http://h/base/"), "http://h/base/api_jsonrpc.php");
        assert_eq!(
            normalize_url("http://h/base/api_jsonrpc.php"),
            "http://h/base/api_jsonrpc.php"
        );
    }

    #[test]
    fn new_client_is_unauthenticated() {
        let api = ZabbixApi::new("http://localhost/zabbix").unwrap();
        assert_eq!(api.url(), "http://localhost/zabbix/api_jsonrpc.php");
        assert_eq!(api.auth(), "");
        assert_eq!(api.request_id(), 0);
        assert!(api.version().is_none());
        assert!(!api.uses_api_token());
    }

    #[tokio::test]
    async fn call_sends_json_rpc_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", API_PATH)
            .match_header("content-type", JSON_RPC_CONTENT_TYPE)
            .match_header("user-agent", CLIENT_USER_AGENT)
            .match_header("cache-control", "no-cache")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({
                "jsonrpc": "2.0",
                "method": "host.get",
                "params": {"output": "extend"},
                "id": 0,
            })))
            .with_status(200)
            .with_body(rpc_result(json!([{"hostid": "10084"}]), 0))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let result = api
            .call("host.get", json!({"output": "extend"}))
            .await
            .unwrap();

        assert_eq!(result, json!([{"hostid": "10084"}]));
        assert_eq!(api.request_id(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn null_params_become_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({"method": "apiinfo.version", "params": {}})))
            .with_status(200)
            .with_body(rpc_result(json!("6.0.0"), 0))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.call("apiinfo.version", Value::Null).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn scalar_params_are_rejected_without_request() {
        let mut api = ZabbixApi::new("http://127.0.0.1:1").unwrap();
        let err = api.call("host.get", json!(5)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(api.request_id(), 0);
    }

    #[tokio::test]
    async fn request_id_increments_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _fail = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({"id": 0})))
            .with_status(500)
            .create_async()
            .await;
        let ok = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({"id": 1})))
            .with_status(200)
            .with_body(rpc_result(json!(true), 1))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let err = api.call("host.get", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(api.request_id(), 1);

        api.call("host.get", json!({})).await.unwrap();
        assert_eq!(api.request_id(), 2);
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn empty_body_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", API_PATH)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let err = api.call("host.get", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse));
    }

    #[tokio::test]
    async fn invalid_json_keeps_raw_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", API_PATH)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        match api.call("host.get", json!({})).await.unwrap_err() {
            ApiError::InvalidJson { raw, .. } => assert_eq!(raw, "<html>maintenance</html>"),
            other => panic!("예상치 못한 에러: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_object_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", API_PATH)
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params."},"id":0}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let err = api.call("host.create", json!({})).await.unwrap_err();
        assert_eq!(err.code(), Some(-32602));
        assert!(err
            .to_string()
            .contains("Error -32602: Invalid params., No data"));
    }

    #[tokio::test]
    async fn missing_result_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", API_PATH)
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":0}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let err = api.call("host.get", json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[tokio::test]
    async fn login_legacy_uses_user_field_and_body_auth() {
        let mut server = mockito::Server::new_async().await;
        let version = mock_method(&mut server, "apiinfo.version", json!("5.0.12")).await;
        let login = server
            .mock("POST", API_PATH)
            .match_body(Matcher::Json(json!({
                "jsonrpc": "2.0",
                "method": "user.login",
                "params": {"user": "mylogin", "password": "mypass"},
                "id": 1,
            })))
            .with_status(200)
            .with_body(rpc_result(json!(TOKEN), 1))
            .create_async()
            .await;
        let host_get = server
            .mock("POST", API_PATH)
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({"method": "host.get", "auth": TOKEN})))
            .with_status(200)
            .with_body(rpc_result(json!([]), 2))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.login("mylogin", "mypass", None).await.unwrap();
        assert_eq!(api.auth(), TOKEN);
        assert_eq!(api.version(), Some(&Version::new(5, 0, 12)));

        api.call("host.get", json!({})).await.unwrap();
        version.assert_async().await;
        login.assert_async().await;
        host_get.assert_async().await;
    }

    #[tokio::test]
    async fn login_5_4_uses_username_field() {
        let mut server = mockito::Server::new_async().await;
        let _version = mock_method(&mut server, "apiinfo.version", json!("5.4.0")).await;
        let login = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({
                "method": "user.login",
                "params": {"username": "Admin", "password": "zabbix"},
            })))
            .with_status(200)
            .with_body(rpc_result(json!(TOKEN), 1))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.login("Admin", "zabbix", None).await.unwrap();
        login.assert_async().await;
    }

    #[tokio::test]
    async fn bearer_header_from_6_4() {
        let mut server = mockito::Server::new_async().await;
        let _version = mock_method(&mut server, "apiinfo.version", json!("6.4.0")).await;
        let _login = mock_method(&mut server, "user.login", json!(TOKEN)).await;
        let host_get = server
            .mock("POST", API_PATH)
            .match_header("authorization", format!("Bearer {TOKEN}").as_str())
            .match_body(Matcher::Json(json!({
                "jsonrpc": "2.0",
                "method": "host.get",
                "params": {},
                "id": 2,
            })))
            .with_status(200)
            .with_body(rpc_result(json!([]), 2))
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.login("Admin", "zabbix", None).await.unwrap();
        api.call("host.get", json!({})).await.unwrap();
        host_get.assert_async().await;
    }

    #[tokio::test]
    async fn legacy_authenticate_is_opt_in() {
        let mut server = mockito::Server::new_async().await;
        let login = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({
                "method": "user.authenticate",
                "params": {"user": "Admin", "password": "zabbix"},
                "id": 0,
            })))
            .with_status(200)
            .with_body(rpc_result(json!(TOKEN), 0))
            .create_async()
            .await;

        let mut api = ZabbixApi::builder(&server.url())
            .use_authenticate(true)
            .detect_version(false)
            .build()
            .unwrap();
        api.login("Admin", "zabbix", None).await.unwrap();
        assert_eq!(api.auth(), TOKEN);
        login.assert_async().await;
    }

    #[tokio::test]
    async fn api_token_login_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("POST", API_PATH)
            .expect(0)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.login("", "", Some("api-token-value")).await.unwrap();
        assert!(api.uses_api_token());
        assert_eq!(api.auth(), "api-token-value");
        assert!(api.is_authenticated().await.unwrap());
        assert_eq!(api.check_authentication().await.unwrap(), json!(true));
        api.logout().await.unwrap();
        assert_eq!(api.auth(), "api-token-value");
        assert_eq!(api.request_id(), 0);
        any.assert_async().await;
    }

    #[tokio::test]
    async fn preset_version_sends_api_token_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let items = server
            .mock("POST", API_PATH)
            .match_header("authorization", "Bearer api-token-value")
            .match_body(Matcher::Json(json!({
                "jsonrpc": "2.0",
                "method": "item.get",
                "params": {},
                "id": 0,
            })))
            .with_status(200)
            .with_body(rpc_result(json!([]), 0))
            .expect(1)
            .create_async()
            .await;

        let mut api = ZabbixApi::builder(&server.url())
            .server_version(Version::new(7, 0, 0))
            .build()
            .unwrap();
        api.login("", "", Some("api-token-value")).await.unwrap();
        assert_eq!(api.version(), Some(&Version::new(7, 0, 0)));
        assert_eq!(api.session_state().profile().auth, AuthPlacement::BearerHeader);

        api.call("item.get", Value::Null).await.unwrap();
        items.assert_async().await;
    }

    #[tokio::test]
    async fn anonymous_methods_never_carry_token() {
        let mut server = mockito::Server::new_async().await;
        let version = server
            .mock("POST", API_PATH)
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({
                "jsonrpc": "2.0",
                "method": "apiinfo.version",
                "params": {},
                "id": 0,
            })))
            .with_status(200)
            .with_body(rpc_result(json!("7.0.0"), 0))
            .create_async()
            .await;

        let mut api = ZabbixApi::builder(&server.url())
            .detect_version(false)
            .build()
            .unwrap();
        api.login("", "", Some(TOKEN)).await.unwrap();
        let version_str = api.api_version().await.unwrap();
        assert_eq!(version_str, "7.0.0");
        version.assert_async().await;
    }

    #[tokio::test]
    async fn is_authenticated_treats_api_error_as_false() {
        let mut server = mockito::Server::new_async().await;
        let _version = mock_method(&mut server, "apiinfo.version", json!("6.0.0")).await;
        let _login = mock_method(&mut server, "user.login", json!(TOKEN)).await;
        let _check = server
            .mock("POST", API_PATH)
            .match_body(Matcher::PartialJson(json!({
                "method": "user.checkAuthentication",
                "params": {"sessionid": TOKEN},
            })))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params.","data":"Session terminated, re-login, please."},"id":2}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        assert!(!api.is_authenticated().await.unwrap());
        api.login("Admin", "zabbix", None).await.unwrap();
        assert!(!api.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn transport_error_is_passed_through() {
        let mut api = ZabbixApi::builder("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = api.call("host.get", json!({})).await.unwrap_err();
        match err {
            ApiError::Transport(e) => assert!(e.is_connect() || e.is_timeout()),
            other => panic!("예상치 못한 에러: {other:?}"),
        }
        assert_eq!(api.request_id(), 1);
    }
}
