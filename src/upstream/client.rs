use std::time::Duration;

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use reqwest::{Client, Identity, Proxy};
use url::Url;

use super::{ProxyRequest, TransportError, Upstream, UpstreamResponse};
use crate::config::{ConfigError, UpstreamConfig};

/// HTTPS client for the controller API, authenticating with a client
/// certificate. Built once at startup and shared by all requests.
pub struct UpstreamClient {
    base_url: Url,
    client: Client,
}

impl UpstreamClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let identity = config.credentials.identity()?;
        Self::build(
            config.api_host.clone(),
            Some(identity),
            config.https_proxy.as_ref(),
            config.timeout(),
        )
        .map_err(|e| ConfigError::Client(e.to_string()))
    }

    /// The controller's server certificate is deliberately not verified;
    /// deployments reach it through self-signed or private CAs.
    pub fn build(
        base_url: Url,
        identity: Option<Identity>,
        https_proxy: Option<&Url>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(true)
            .timeout(timeout);

        if let Some(identity) = identity {
            builder = builder.identity(identity);
        }

        builder = match https_proxy {
            Some(proxy) => builder.proxy(Proxy::https(proxy.as_str())?),
            None => builder.no_proxy(),
        };

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    /// Join a controller-relative path onto the configured host, keeping any
    /// base path the host URL carries. The parsed path must be exactly the
    /// path that was authorized; any normalization by the parser is refused.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, path))
            .map_err(|e| TransportError::Request(format!("invalid upstream url: {}", e)))?;

        let expected = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        if url.path() != expected {
            return Err(TransportError::PathRewritten {
                requested: path.to_string(),
                parsed: url.path().to_string(),
            });
        }

        url.set_query(query);
        Ok(url)
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn forward(&self, request: ProxyRequest) -> Result<UpstreamResponse, TransportError> {
        let url = self.target_url(&request.target_path, request.query.as_deref())?;

        tracing::debug!("Forwarding {} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn host(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientCredentials;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::build(Url::parse(base).unwrap(), None, None, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn target_url_appends_path_and_query() {
        let upstream = client("https://controller.example:9443");
        let url = upstream
            .target_url("/magma/networks/mynet/gateways", Some("view=full"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://controller.example:9443/magma/networks/mynet/gateways?view=full"
        );
    }

    #[test]
    fn target_url_keeps_base_path() {
        let upstream = client("https://controller.example/api/");
        let url = upstream.target_url("/magma/networks", None).unwrap();
        assert_eq!(url.as_str(), "https://controller.example/api/magma/networks");
    }

    #[test]
    fn target_url_refuses_normalized_paths() {
        let upstream = client("https://controller.example/api");
        for path in [
            "/magma/networks/mynet/..\\theirnet",
            "/magma/networks/mynet/../theirnet",
            "/magma/channels/x\\..\\..\\networks\\theirnet",
        ] {
            let err = upstream.target_url(path, None).unwrap_err();
            assert!(matches!(err, TransportError::PathRewritten { .. }), "{}", path);
        }
    }

    #[test]
    fn builds_with_generated_client_identity() {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["nms-gate.test".to_string()]).unwrap();
        let credentials = ClientCredentials::from_pem(
            cert.pem().into_bytes(),
            key_pair.serialize_pem().into_bytes(),
        );

        let identity = credentials.identity().unwrap();
        let upstream = UpstreamClient::build(
            Url::parse("https://controller.example").unwrap(),
            Some(identity),
            None,
            Duration::from_secs(5),
        );
        assert!(upstream.is_ok());
    }

    #[test]
    fn builds_behind_https_proxy() {
        let proxy = Url::parse("http://proxy.internal:3128").unwrap();
        let upstream = UpstreamClient::build(
            Url::parse("https://controller.example").unwrap(),
            None,
            Some(&proxy),
            Duration::from_secs(5),
        );
        assert!(upstream.is_ok());
    }
}
