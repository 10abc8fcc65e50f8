//! Form requests: the field bag and the builder that sends it.

use std::time::Duration;

use courier_core::logging::targets;
use serde::Serialize;

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::Result;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request method.
///
/// `Post` and `Put` send the fields as a form body; `Get` and `Delete` append
/// them to the query string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Whether fields travel in the body.
    pub fn carries_form(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form fields for a request, in insertion order.
///
/// Field names may repeat; every pair is sent. The bag is passed through
/// request code untouched.
///
/// ```
/// use courier_net::RequestParams;
///
/// let params = RequestParams::new()
///     .with("goods_id", "1024")
///     .with("period_id", "7");
/// assert_eq!(params.get("goods_id"), Some("1024"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequestParams {
    fields: Vec<(String, String)>,
}

impl RequestParams {
    /// An empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Append a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// URL-encoded form representation (`a=1&b=2`).
    pub fn to_form_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RequestParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// A form request ready to be sent.
#[derive(Clone, Debug)]
pub struct FormRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: http::HeaderMap,
    pub params: RequestParams,
    /// Overrides the client timeout.
    pub timeout: Option<Duration>,
}

impl FormRequest {
    /// The URL to hit, with the fields appended when the method has no body.
    pub fn target(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.method.carries_form() && !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url)
    }

    /// Encoded body, for methods that carry one.
    pub fn form_body(&self) -> Option<String> {
        self.method
            .carries_form()
            .then(|| self.params.to_form_string())
    }
}

/// Builds a [`FormRequest`] against an [`HttpClient`].
pub struct FormRequestBuilder {
    client: HttpClient,
    request: FormRequest,
}

impl FormRequestBuilder {
    pub(crate) fn new(client: HttpClient, method: HttpMethod, url: String) -> Self {
        Self {
            client,
            request: FormRequest {
                method,
                url,
                headers: http::HeaderMap::new(),
                params: RequestParams::new(),
                timeout: None,
            },
        }
    }

    /// Set a header. Invalid names or values are dropped with a warning.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.request.headers.insert(name, value);
            }
            _ => tracing::warn!(target: targets::HTTP, "dropping invalid request header"),
        }
        self
    }

    /// Replace the fields.
    pub fn params(mut self, params: RequestParams) -> Self {
        self.request.params = params;
        self
    }

    /// Append one field.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.params.add(name, value);
        self
    }

    /// Ask every cache on the way to revalidate.
    pub fn no_cache(self) -> Self {
        self.header(http::header::CACHE_CONTROL, "no-cache")
            .header(http::header::PRAGMA, "no-cache")
    }

    /// Timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> FormRequest {
        self.request
    }

    /// Send the request and buffer the response.
    pub async fn send(self) -> Result<HttpResponse> {
        let Self { client, request } = self;
        let url = request.target()?;

        tracing::debug!(
            target: targets::HTTP,
            method = %request.method,
            %url,
            fields = request.params.len(),
            "sending request"
        );

        let mut builder = client
            .reqwest_client()
            .request(request.method.into(), url)
            .headers(request.headers.clone());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.form_body() {
            builder = builder
                .header(http::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(body);
        }

        HttpResponse::read(builder.send().await?).await
    }
}
