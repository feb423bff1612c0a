//! 거래소 API 자격증명.
//!
//! 시크릿 키와 패스프레이즈는 `SecretString`으로 보관하며,
//! `Debug` 출력에서 항상 마스킹됩니다.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// 거래소 API 자격증명 (access key, secret key, passphrase).
///
/// 어댑터 생성 시 한 번 만들어지고 어댑터 수명 동안 변경되지 않습니다.
pub struct Credentials {
    access_key: String,
    secret_key: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    /// 새 자격증명 생성.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: SecretString::new(secret_key.into().into()),
            passphrase: SecretString::new(passphrase.into().into()),
        }
    }

    /// API 키 반환.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// 서명용 시크릿 키 반환.
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// 패스프레이즈 반환.
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

/// 로그에 남겨도 되는 형태로 키를 마스킹합니다.
pub fn mask_key(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "***REDACTED***".to_string()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &mask_key(&self.access_key))
            .field("secret_key", &"***REDACTED***")
            .field("passphrase", &"***REDACTED***")
            .finish()
    }
}
