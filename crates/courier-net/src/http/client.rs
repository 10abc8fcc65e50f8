//! Shared HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;

use super::request::{FormRequestBuilder, HttpMethod};
use crate::error::{NetworkError, Result};

/// Client settings, applied once when the client is built.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Redirects to follow; `0` disables following.
    pub max_redirects: usize,
    /// Keep session cookies between requests.
    pub cookies_enabled: bool,
    pub user_agent: Option<String>,
    /// Proxy for every scheme.
    pub proxy: Option<String>,
    /// Headers sent with every request.
    pub default_headers: http::HeaderMap,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            max_redirects: 10,
            cookies_enabled: true,
            user_agent: Some(format!("Courier/{} (Rust)", env!("CARGO_PKG_VERSION"))),
            proxy: None,
            default_headers: http::HeaderMap::new(),
        }
    }
}

impl HttpClientConfig {
    fn to_reqwest(&self) -> Result<reqwest::Client> {
        let redirect = match self.max_redirects {
            0 => Policy::none(),
            max => Policy::limited(max),
        };
        let mut builder = reqwest::Client::builder()
            .redirect(redirect)
            .cookie_store(self.cookies_enabled)
            .default_headers(self.default_headers.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua);
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| NetworkError::Proxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(builder.build()?)
    }
}

/// Builder for [`HttpClient`].
#[derive(Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Start from the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Do not follow redirects.
    pub fn no_redirects(self) -> Self {
        self.max_redirects(0)
    }

    /// Disable the cookie jar.
    pub fn no_cookies(mut self) -> Self {
        self.config.cookies_enabled = false;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Route every request through a proxy.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    /// Header sent with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self> {
        let name = name
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid header name".to_string()))?;
        let value = value
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader(format!("invalid value for {}", name.as_str())))?;
        self.config.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpClient> {
        HttpClient::with_config(self.config)
    }
}

struct Shared {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// Cloneable handle to one connection pool and cookie jar.
///
/// ```ignore
/// use courier_net::http::HttpClient;
///
/// let client = HttpClient::new()?;
/// let response = client
///     .post("https://api.example.com/winner/detail")
///     .param("period_id", "7")
///     .no_cache()
///     .send()
///     .await?
///     .ensure_success()?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    shared: Arc<Shared>,
}

impl HttpClient {
    /// Client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client with the given settings.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = config.to_reqwest()?;
        Ok(Self {
            shared: Arc::new(Shared { client, config }),
        })
    }

    /// Builder for a custom client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.shared.config
    }

    /// Start a form POST.
    pub fn post(&self, url: impl Into<String>) -> FormRequestBuilder {
        self.request(HttpMethod::Post, url)
    }

    /// Start a request with any method.
    pub fn request(&self, method: HttpMethod, url: impl Into<String>) -> FormRequestBuilder {
        FormRequestBuilder::new(self.clone(), method, url.into())
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.shared.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.shared.config)
            .finish()
    }
}
