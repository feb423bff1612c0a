//! 설정 관리.
//!
//! 커넥터 설정은 TOML 파일에서 로드되며 `QUANTBOT__` 접두사의 환경 변수로
//! 오버라이드할 수 있습니다.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [[venues]]
//! venue = "OKEX-v3"
//! name = "okex-main"
//! access_key = "..."
//! secret_key = "..."
//! passphrase = "..."
//! max_calls_per_second = 10.0
//! ```

use crate::credentials::{mask_key, Credentials};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 커넥터 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConnectorConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 거래소별 설정
    #[serde(default)]
    pub venues: Vec<VenueConfig>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 거래소 하나에 대한 설정.
///
/// # 보안
/// - `Debug` 구현은 민감 정보(`access_key`, `secret_key`, `passphrase`)를 마스킹합니다.
#[derive(Clone, Deserialize, Serialize)]
pub struct VenueConfig {
    /// 거래소 식별자 (예: "OKEX-v3", "Xnodes")
    pub venue: String,
    /// 표시 이름
    pub name: String,
    /// API 키
    pub access_key: String,
    /// API 시크릿
    pub secret_key: String,
    /// API 패스프레이즈
    #[serde(default)]
    pub passphrase: String,
    /// 초당 최대 호출 수
    #[serde(default = "default_max_calls_per_second")]
    pub max_calls_per_second: f64,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// REST API 기본 URL 오버라이드 (미러, 테스트 서버)
    #[serde(default)]
    pub base_url: Option<String>,
    /// 이 거래소를 사용하는 트레이더 ID (로그 필드용)
    #[serde(default)]
    pub trader_id: Option<i64>,
}

fn default_max_calls_per_second() -> f64 {
    10.0
}

fn default_timeout_secs() -> u64 {
    30
}

impl fmt::Debug for VenueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueConfig")
            .field("venue", &self.venue)
            .field("name", &self.name)
            .field("access_key", &mask_key(&self.access_key))
            .field("secret_key", &"***REDACTED***")
            .field("passphrase", &"***REDACTED***")
            .field("max_calls_per_second", &self.max_calls_per_second)
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .field("trader_id", &self.trader_id)
            .finish()
    }
}

impl VenueConfig {
    /// 새 설정 생성.
    pub fn new(
        venue: impl Into<String>,
        name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            venue: venue.into(),
            name: name.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
            max_calls_per_second: default_max_calls_per_second(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
            trader_id: None,
        }
    }

    /// 초당 최대 호출 수 설정.
    pub fn with_max_calls_per_second(mut self, max_calls_per_second: f64) -> Self {
        self.max_calls_per_second = max_calls_per_second;
        self
    }

    /// 기본 URL 오버라이드.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.venue.trim().is_empty() {
            return Err(CoreError::Config("venue identifier is empty".to_string()));
        }
        if self.access_key.trim().is_empty() || self.secret_key.trim().is_empty() {
            return Err(CoreError::Config(format!(
                "venue '{}' is missing access_key or secret_key",
                self.name
            )));
        }
        if !self.max_calls_per_second.is_finite() || self.max_calls_per_second < 0.0 {
            return Err(CoreError::Config(format!(
                "venue '{}' has invalid max_calls_per_second: {}",
                self.name, self.max_calls_per_second
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config(format!(
                "venue '{}' has zero timeout_secs",
                self.name
            )));
        }
        Ok(())
    }

    /// 자격증명 생성.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.access_key.clone(),
            self.secret_key.clone(),
            self.passphrase.clone(),
        )
    }
}

impl ConnectorConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("QUANTBOT")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder.build()?)
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let built = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Self::finish(built)
    }

    fn finish(built: config::Config) -> CoreResult<Self> {
        let config: Self = built.try_deserialize()?;
        for venue in &config.venues {
            venue.validate()?;
        }
        Ok(config)
    }

    /// 이름으로 거래소 설정을 찾습니다.
    pub fn venue(&self, name: &str) -> Option<&VenueConfig> {
        self.venues.iter().find(|v| v.name == name)
    }
}
