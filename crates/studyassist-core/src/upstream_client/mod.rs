use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use wreq::{Client, Proxy};

use studyassist_common::GlobalConfig;

pub type Headers = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub struct UpstreamHttpRequest {
    pub url: String,
    pub headers: Headers,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct UpstreamHttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl UpstreamHttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamTransportErrorKind {
    Timeout,
    ReadTimeout,
    Dns,
    Tls,
    Connect,
    Other,
}

impl fmt::Display for UpstreamTransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamTransportErrorKind::Timeout => "timeout",
            UpstreamTransportErrorKind::ReadTimeout => "read_timeout",
            UpstreamTransportErrorKind::Dns => "dns",
            UpstreamTransportErrorKind::Tls => "tls",
            UpstreamTransportErrorKind::Connect => "connect",
            UpstreamTransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("upstream transport error ({kind}): {message}")]
    Transport {
        kind: UpstreamTransportErrorKind,
        message: String,
    },
}

/// One outbound POST. Implemented over wreq in production and by fakes in tests.
pub trait UpstreamClient: Send + Sync {
    fn post<'a>(
        &'a self,
        req: UpstreamHttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamHttpResponse, UpstreamFailure>> + Send + 'a>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UpstreamClientConfig {
    pub proxy: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl UpstreamClientConfig {
    pub fn from_global(global: &GlobalConfig) -> Self {
        Self {
            proxy: normalize_proxy(global.proxy.clone()),
            request_timeout: global.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

pub type ClientConfigResolver = Arc<dyn Fn() -> UpstreamClientConfig + Send + Sync>;

/// wreq-backed client. The config is resolved on every call so proxy/timeout
/// changes apply without a restart; built clients are cached per config.
#[derive(Clone)]
pub struct WreqUpstreamClient {
    resolver: ClientConfigResolver,
    clients: Arc<Mutex<HashMap<UpstreamClientConfig, Client>>>,
}

impl WreqUpstreamClient {
    pub fn new_with_resolver<F>(resolver: F) -> Result<Self, wreq::Error>
    where
        F: Fn() -> UpstreamClientConfig + Send + Sync + 'static,
    {
        let resolver: ClientConfigResolver = Arc::new(resolver);
        let initial = resolver();
        let initial_client = build_client(&initial)?;
        let mut clients = HashMap::new();
        clients.insert(initial, initial_client);
        Ok(Self {
            resolver,
            clients: Arc::new(Mutex::new(clients)),
        })
    }

    fn current_client(&self) -> Result<Client, UpstreamFailure> {
        let config = (self.resolver)();
        let mut guard = self
            .clients
            .lock()
            .map_err(|_| UpstreamFailure::Transport {
                kind: UpstreamTransportErrorKind::Other,
                message: "upstream client cache lock failed".to_string(),
            })?;
        if let Some(client) = guard.get(&config) {
            return Ok(client.clone());
        }
        let client = build_client(&config).map_err(map_wreq_error)?;
        guard.insert(config, client.clone());
        Ok(client)
    }
}

fn normalize_proxy(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn build_client(config: &UpstreamClientConfig) -> Result<Client, wreq::Error> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = config.proxy.as_deref() {
        builder = builder.proxy(Proxy::all(proxy)?);
    }
    builder.build()
}

impl UpstreamClient for WreqUpstreamClient {
    fn post<'a>(
        &'a self,
        req: UpstreamHttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamHttpResponse, UpstreamFailure>> + Send + 'a>>
    {
        Box::pin(async move {
            let client = self.current_client()?;
            let mut builder = client.post(&req.url);
            for (k, v) in &req.headers {
                builder = builder.header(k, v);
            }
            let resp = builder.body(req.body).send().await.map_err(map_wreq_error)?;
            let status = resp.status().as_u16();
            let headers = headers_from_wreq(resp.headers());
            let body = resp.bytes().await.map_err(map_wreq_error)?;
            Ok(UpstreamHttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

fn headers_from_wreq(map: &wreq::header::HeaderMap) -> Headers {
    let mut out = Vec::new();
    for (k, v) in map {
        if let Ok(s) = v.to_str() {
            out.push((k.as_str().to_string(), s.to_string()));
        }
    }
    out
}

fn map_wreq_error(err: wreq::Error) -> UpstreamFailure {
    let kind = classify_wreq_error(&err);
    UpstreamFailure::Transport {
        kind,
        message: err.to_string(),
    }
}

fn classify_wreq_error(err: &wreq::Error) -> UpstreamTransportErrorKind {
    let message = err.to_string().to_ascii_lowercase();
    classify_message(err.is_timeout(), err.is_connect(), &message)
}

fn classify_message(is_timeout: bool, is_connect: bool, message: &str) -> UpstreamTransportErrorKind {
    if is_timeout {
        if message.contains("read") || message.contains("idle") {
            return UpstreamTransportErrorKind::ReadTimeout;
        }
        return UpstreamTransportErrorKind::Timeout;
    }
    if is_connect {
        if message.contains("dns") || message.contains("resolve") {
            return UpstreamTransportErrorKind::Dns;
        }
        if message.contains("tls") || message.contains("ssl") {
            return UpstreamTransportErrorKind::Tls;
        }
        return UpstreamTransportErrorKind::Connect;
    }
    if message.contains("tls") || message.contains("ssl") {
        return UpstreamTransportErrorKind::Tls;
    }
    UpstreamTransportErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_proxy_is_ignored() {
        let global = GlobalConfig {
            proxy: Some("   ".to_string()),
            request_timeout_secs: Some(30),
            ..GlobalConfig::default()
        };
        let config = UpstreamClientConfig::from_global(&global);
        assert_eq!(config.proxy, None);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn transport_errors_are_classified() {
        assert_eq!(
            classify_message(true, false, "operation timed out"),
            UpstreamTransportErrorKind::Timeout
        );
        assert_eq!(
            classify_message(false, true, "dns error: failed to lookup address"),
            UpstreamTransportErrorKind::Dns
        );
        assert_eq!(
            classify_message(false, true, "connection refused"),
            UpstreamTransportErrorKind::Connect
        );
        assert_eq!(
            classify_message(false, false, "tls handshake eof"),
            UpstreamTransportErrorKind::Tls
        );
    }
}
