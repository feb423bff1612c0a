//! HTTP 전송 계층.
//!
//! 어댑터는 `Transport` trait 객체를 소유하며, 서명된 요청을 그대로 전달받아
//! 상태 코드와 원본 본문을 돌려줍니다. 응답 해석은 `parser`가 담당합니다.

use crate::error::ExchangeError;
use crate::traits::ExchangeResult;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, warn};

/// 서명까지 끝난 요청.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// 쿼리 문자열을 포함한 요청 경로 (서명에 사용한 값과 동일)
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    /// JSON 본문 (서명에 사용한 바이트와 동일)
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// 본문 문자열 (없으면 빈 문자열).
    pub fn body_str(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// 헤더 값 조회.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// 원본 응답.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 거래소 HTTP 호출 추상화.
///
/// 연결 실패나 타임아웃은 `ExchangeError::Transport`로 반환하고,
/// 응답을 받은 경우에는 상태 코드와 무관하게 `HttpResponse`를 반환합니다.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ExchangeResult<HttpResponse>;
}

/// reqwest 기반 HTTP 전송.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// 새 HTTP 전송 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::Transport`를 반환합니다.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::Transport {
                status: None,
                message: format!("HTTP 클라이언트 생성 실패: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> ExchangeResult<HttpResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(path = %request.path, error = %e, "request failed");
            ExchangeError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
