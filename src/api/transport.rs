use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use super::error::TransportError;
use super::value::{Struct, Value};
use super::xmlrpc;

/// The untyped result of one remote call: the registrar's status line and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub code: i64,
    pub message: String,
    pub reason: String,
    pub reason_code: String,
    pub data: Struct,
}

impl RawResponse {
    /// Splits the registrar's response struct (`code`, `msg`, `reason`, `reasonCode`, `resData`) into its parts.
    pub fn from_value(value: Value) -> Result<Self, TransportError> {
        let Value::Struct(mut fields) = value else {
            return Err(TransportError::Malformed(format!("response is a {}, not a struct", value.kind())));
        };

        let code = match fields.remove("code") {
            Some(Value::Int(code)) => code,
            Some(other) => {
                return Err(TransportError::Malformed(format!("response `code` is a {}", other.kind())));
            },
            None => return Err(TransportError::Malformed("response has no `code`".to_string())),
        };

        let data = match fields.remove("resData") {
            Some(Value::Struct(data)) => data,
            Some(Value::Nil) | None => Struct::new(),
            Some(other) => {
                return Err(TransportError::Malformed(format!("response `resData` is a {}", other.kind())));
            },
        };

        Ok(Self {
            code,
            message: take_text(&mut fields, "msg"),
            reason: take_text(&mut fields, "reason"),
            // The registrar sends reason codes both as identifiers and as numbers.
            reason_code: take_text(&mut fields, "reasonCode"),
            data,
        })
    }
}

/// Removes `key` from `fields` as text, rendering numbers; anything else is treated as absent.
fn take_text(fields: &mut Struct, key: &str) -> String {
    match fields.remove(key) {
        Some(Value::String(s)) => s,
        Some(Value::Int(i)) => i.to_string(),
        _ => String::new(),
    }
}

/// A channel that can carry one remote call and bring back its raw response.
///
/// Implementations must not retry: a failed attempt is reported as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: &str, args: Struct) -> Result<RawResponse, TransportError>;
}

/// XML-RPC over HTTPS, keeping the login session in a cookie store.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    reqwest: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::ClientBuilder::new()
            .default_headers(HeaderMap::from_iter([
                (ACCEPT, HeaderValue::from_static("text/xml")),
                (CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=utf-8")),
                (
                    USER_AGENT,
                    HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))),
                ),
            ]))
            // The registrar ties the session from `account.login` to a cookie.
            .cookie_store(true)
            .build()?;

        Ok(Self {
            reqwest: client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, args: Struct) -> Result<RawResponse, TransportError> {
        let body = xmlrpc::encode_call(method, &args)?;

        let res = self.reqwest.post(&self.url).body(body).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        // Read the body as text first and parse it ourselves, so that XML problems are reported as such and not as
        // HTTP errors.
        let text = res.text().await?;
        let value = xmlrpc::decode_response(&text)?;
        RawResponse::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    fn response(pairs: Vec<(&str, Value)>) -> Value {
        Value::Struct(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn splits_the_status_line_from_the_payload() {
        let mut data = Struct::new();
        data.insert("id".into(), Value::Int(42));

        let raw = RawResponse::from_value(response(vec![
            ("code", Value::Int(2303)),
            ("msg", Value::String("Object does not exist".into())),
            ("reason", Value::String("Record not found".into())),
            ("reasonCode", Value::Int(17)),
            ("resData", Value::Struct(data.clone())),
        ]))
        .unwrap();

        assert_eq!(
            raw,
            RawResponse {
                code: 2303,
                message: "Object does not exist".into(),
                reason: "Record not found".into(),
                reason_code: "17".into(),
                data,
            }
        );
    }

    #[test]
    fn missing_payload_is_empty() {
        let raw = RawResponse::from_value(response(vec![("code", Value::Int(1000))])).unwrap();
        assert!(raw.data.is_empty());
        assert!(raw.message.is_empty());
    }

    #[test]
    fn missing_or_bad_code_is_malformed() {
        for value in [
            response(vec![("msg", Value::String("hi".into()))]),
            response(vec![("code", Value::String("1000".into()))]),
            Value::Array(vec![]),
        ] {
            assert!(matches!(RawResponse::from_value(value), Err(TransportError::Malformed(_))));
        }
    }

    #[test]
    fn http_transport_keeps_its_url() {
        let transport = HttpTransport::new(crate::api::API_SANDBOX_BASE_URL).unwrap();
        assert_eq!(transport.url(), "https://api.ote.domrobot.com/xmlrpc/");
    }

    /// Answers a single HTTP request on a local port with `status` and `body`. The handle yields the request as text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/xmlrpc/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);

                let text = String::from_utf8_lossy(&request);
                if let Some(head_len) = text.find("\r\n\r\n") {
                    let content_length = text[..head_len]
                        .lines()
                        .filter_map(|line| line.split_once(':'))
                        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_len + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    fn args() -> Struct {
        let mut args = Struct::new();
        args.insert("lang".into(), Value::String("eng".into()));
        args
    }

    #[tokio::test]
    async fn posts_the_call_and_parses_the_reply() {
        let (url, server) = serve_once(
            "200 OK",
            "<?xml version=\"1.0\"?><methodResponse><params><param><value><struct>\
             <member><name>code</name><value><int>1000</int></value></member>\
             <member><name>msg</name><value><string>Command completed successfully</string></value></member>\
             <member><name>resData</name><value><struct><member><name>id</name><value><int>42</int></value></member></struct></value></member>\
             </struct></value></param></params></methodResponse>",
        )
        .await;

        let raw = HttpTransport::new(url).unwrap().call("nameserver.createRecord", args()).await.unwrap();
        assert_eq!(raw.code, 1000);
        assert_eq!(raw.message, "Command completed successfully");
        assert_eq!(raw.data.get("id"), Some(&Value::Int(42)));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /xmlrpc/ "), "{request}");
        assert!(request.to_ascii_lowercase().contains("content-type: text/xml"));
        assert!(request.contains("<methodName>nameserver.createRecord</methodName>"));
        assert!(request.contains("<name>lang</name><value><string>eng</string></value>"));
    }

    #[tokio::test]
    async fn http_errors_are_reported_by_status() {
        let (url, server) = serve_once("500 Internal Server Error", "oops").await;

        let err = HttpTransport::new(url).unwrap().call("account.info", args()).await.unwrap_err();
        assert!(
            matches!(err, TransportError::Status(status) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            "{err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn garbage_bodies_are_malformed() {
        let (url, server) = serve_once("200 OK", "<html><body>maintenance</body></html>").await;

        let err = HttpTransport::new(url).unwrap().call("account.info", args()).await.unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_failures_are_http_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/xmlrpc/", listener.local_addr().unwrap());
        drop(listener);

        let err = HttpTransport::new(url).unwrap().call("account.info", args()).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unencodable_arguments_are_not_sent() {
        let mut args = args();
        args.insert("price".into(), Value::Double(f64::NAN));

        // Nothing listens here; the call must fail before connecting.
        let transport = HttpTransport::new("http://127.0.0.1:9/xmlrpc/").unwrap();
        let err = transport.call("domain.update", args).await.unwrap_err();
        assert!(matches!(err, TransportError::Unencodable(_)), "{err:?}");
    }
}
