//! 동적 메서드 디스패치.
//!
//! `api.namespace("host").method("get")`는 호출 시점에 `"host.get"`을 조립한다.
//! 원격 메서드 집합은 서버 버전마다 달라지므로 고정 테이블을 두지 않는다.

use serde_json::{Map, Value};

use super::client::ZabbixApi;
use super::error::ApiError;

/// 네임스페이스 핸들 (`host`, `item`, `configuration`, ...)
pub struct ApiNamespace<'a> {
    api: &'a mut ZabbixApi,
    name: String,
}

impl<'a> ApiNamespace<'a> {
    pub(crate) fn new(api: &'a mut ZabbixApi, name: &str) -> Self {
        Self {
            api,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 메서드 핸들 생성: 예약어와 겹치는 이름(`import` 등)도 그대로 쓸 수 있다
    pub fn method(self, method: &str) -> ApiMethod<'a> {
        ApiMethod {
            api: self.api,
            method: format!("{}.{}", self.name, method),
            args: Vec::new(),
            kwargs: Map::new(),
            invalid: None,
        }
    }
}

/// 호출 가능한 메서드 핸들
///
/// 위치 인자는 JSON 배열, 키워드 인자는 JSON 객체로 전송된다.
/// 둘을 동시에 지정하면 네트워크 호출 전에 `InvalidArgument`로 실패한다.
pub struct ApiMethod<'a> {
    api: &'a mut ZabbixApi,
    method: String,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
    invalid: Option<String>,
}

impl<'a> ApiMethod<'a> {
    /// 전체 메서드명 (`namespace.method`)
    pub fn name(&self) -> &str {
        &self.method
    }

    /// 위치 인자 추가
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// 키워드 인자 추가
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// JSON 값으로 인자 일괄 지정: 객체는 키워드, 배열은 위치 인자
    pub fn params(mut self, params: Value) -> Self {
        match params {
            Value::Object(map) => self.kwargs.extend(map),
            Value::Array(values) => self.args.extend(values),
            Value::Null => {}
            other => {
                self.invalid = Some(format!("params는 객체 또는 배열이어야 함: {other}"));
            }
        }
        self
    }

    /// 요청 전송 후 `result` 반환
    pub async fn call(self) -> Result<Value, ApiError> {
        let ApiMethod {
            api,
            method,
            args,
            kwargs,
            invalid,
        } = self;

        if let Some(reason) = invalid {
            return Err(ApiError::InvalidArgument(reason));
        }
        if !args.is_empty() && !kwargs.is_empty() {
            return Err(ApiError::InvalidArgument(format!(
                "위치 인자와 키워드 인자를 동시에 사용할 수 없음: {method}"
            )));
        }

        let params = if args.is_empty() {
            Value::Object(kwargs)
        } else {
            Value::Array(args)
        };

        api.call(&method, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn kwargs_become_object_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api_jsonrpc.php")
            .match_body(Matcher::PartialJson(json!({
                "method": "item.create",
                "params": {"name": "cpu", "key_": "system.cpu.load", "hostid": "10084"},
            })))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","result":{"itemids":["1"]},"id":0}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let result = api
            .namespace("item")
            .method("create")
            .kwarg("name", "cpu")
            .kwarg("key_", "system.cpu.load")
            .kwarg("hostid", "10084")
            .call()
            .await
            .unwrap();

        assert_eq!(result, json!({"itemids": ["1"]}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn args_become_array_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api_jsonrpc.php")
            .match_body(Matcher::PartialJson(json!({
                "method": "host.delete",
                "params": ["10084", "10085"],
            })))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","result":{"hostids":["10084","10085"]},"id":0}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        api.namespace("host")
            .method("delete")
            .arg("10084")
            .arg("10085")
            .call()
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reserved_word_method_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api_jsonrpc.php")
            .match_body(Matcher::PartialJson(json!({
                "method": "configuration.import",
                "params": {"format": "xml", "source": "<x/>", "rules": {}},
            })))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","result":true,"id":0}"#)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let result = api
            .namespace("configuration")
            .method("import")
            .params(json!({"format": "xml", "source": "<x/>", "rules": {}}))
            .call()
            .await
            .unwrap();
        assert_eq!(result, json!(true));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mixed_args_fail_before_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api_jsonrpc.php")
            .expect(0)
            .create_async()
            .await;

        let mut api = ZabbixApi::new(&server.url()).unwrap();
        let err = api
            .namespace("host")
            .method("get")
            .arg("10084")
            .kwarg("output", "extend")
            .call()
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidArgument(_)));
        assert_eq!(api.request_id(), 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn scalar_params_are_invalid() {
        let mut api = ZabbixApi::new("http://127.0.0.1:1").unwrap();
        let err = api
            .namespace("host")
            .method("get")
            .params(json!("extend"))
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn names_are_composed_lazily() {
        let mut api = ZabbixApi::new("http://localhost").unwrap();
        let ns = api.namespace("trigger");
        assert_eq!(ns.name(), "trigger");
        let method = ns.method("get");
        assert_eq!(method.name(), "trigger.get");
    }
}
