//! 요청 서명.
//!
//! 서명 대상 문자열은 `timestamp + METHOD + requestPath + body`이며,
//! 시크릿 키로 HMAC-SHA256 후 base64 인코딩합니다.
//! 서명에 사용한 path/body 바이트가 그대로 전송되어야 합니다.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use quantbot_core::Credentials;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 인증 헤더 이름 집합. 의미는 거래소 공통이고 이름만 거래소별로 다릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHeaderNames {
    pub key: &'static str,
    pub sign: &'static str,
    pub timestamp: &'static str,
    pub passphrase: &'static str,
}

impl AuthHeaderNames {
    /// OKEX v3 계열 헤더 이름.
    pub const OK_ACCESS: AuthHeaderNames = AuthHeaderNames {
        key: "OK-ACCESS-KEY",
        sign: "OK-ACCESS-SIGN",
        timestamp: "OK-ACCESS-TIMESTAMP",
        passphrase: "OK-ACCESS-PASSPHRASE",
    };
}

/// HMAC-SHA256 서명을 base64로 반환합니다.
pub fn hmac_sha256_base64(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// 밀리초 정밀도 UTC 타임스탬프 (`2019-03-08T10:59:25.789Z`).
pub fn timestamp_iso(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 서명 대상 문자열.
pub fn prehash(timestamp: &str, method: &str, request_path: &str, body: &str) -> String {
    format!(
        "{}{}{}{}",
        timestamp,
        method.to_uppercase(),
        request_path,
        body
    )
}

/// 자격증명을 보관하고 요청마다 인증 헤더를 생성합니다.
pub struct Signer {
    credentials: Credentials,
    headers: AuthHeaderNames,
}

impl Signer {
    pub fn new(credentials: Credentials, headers: AuthHeaderNames) -> Self {
        Self {
            credentials,
            headers,
        }
    }

    /// 요청 서명.
    pub fn sign(&self, timestamp: &str, method: &str, request_path: &str, body: &str) -> String {
        hmac_sha256_base64(
            self.credentials.secret_key(),
            &prehash(timestamp, method, request_path, body),
        )
    }

    /// 현재 시각으로 인증 헤더를 생성합니다.
    pub fn auth_headers(
        &self,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Vec<(&'static str, String)> {
        self.auth_headers_at(Utc::now(), method, request_path, body)
    }

    /// 지정한 시각으로 인증 헤더를 생성합니다.
    pub fn auth_headers_at(
        &self,
        now: DateTime<Utc>,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Vec<(&'static str, String)> {
        let timestamp = timestamp_iso(now);
        let signature = self.sign(&timestamp, method, request_path, body);

        vec![
            (self.headers.key, self.credentials.access_key().to_string()),
            (self.headers.sign, signature),
            (self.headers.timestamp, timestamp),
            (
                self.headers.passphrase,
                self.credentials.passphrase().to_string(),
            ),
        ]
    }
}
