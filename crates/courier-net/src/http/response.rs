//! Buffered responses.

use crate::error::{NetworkError, Result};

/// A response whose body has already been read.
///
/// Form endpoints answer with short JSON documents, so the body is read
/// eagerly and the connection released before the caller sees the response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    status: http::StatusCode,
    body: String,
}

impl HttpResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Fail non-2xx responses with [`NetworkError::HttpStatus`], keeping a
    /// non-empty body as the message.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = (!self.body.is_empty()).then_some(self.body);
        Err(NetworkError::HttpStatus {
            status: self.status.as_u16(),
            message,
        })
    }
}
