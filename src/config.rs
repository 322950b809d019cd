//! Crash-reporter configuration.
//!
//! The browser app reads this as JSON from the page, e.g.
//!
//! ```json
//! { "dsn": "https://abc@o1.ingest.sentry.io/42", "environment": "staging" }
//! ```
//!
//! Every field is optional. Without a DSN reporting stays inactive and
//! captures only go to the log.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub enabled: bool,
    pub dsn: Option<String>,
    pub environment: String,
    pub release: Option<String>,
    pub debug: bool,
    pub sample_rate: f32,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dsn: None,
            environment: "production".to_string(),
            release: None,
            debug: false,
            sample_rate: 1.0,
        }
    }
}

impl ReporterConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(ConfigError::SampleRate(self.sample_rate));
        }
        if let Some(dsn) = self.dsn.as_deref() {
            Dsn::parse(dsn)?;
        }
        Ok(())
    }

    /// Whether captures should go to the reporting service.
    pub fn is_active(&self) -> bool {
        self.enabled && self.dsn.is_some()
    }

    /// The parsed DSN, required once reporting is enabled.
    pub fn active_dsn(&self) -> Result<Dsn, ConfigError> {
        match self.dsn.as_deref() {
            Some(raw) => Dsn::parse(raw),
            None => Err(ConfigError::MissingDsn),
        }
    }

    /// Options object for the browser SDK's `init` call.
    pub fn init_options(&self) -> Result<SdkInitOptions, ConfigError> {
        let dsn = self.active_dsn()?;
        Ok(SdkInitOptions {
            dsn: dsn.raw,
            environment: self.environment.clone(),
            release: self.release.clone(),
            debug: self.debug,
            sample_rate: self.sample_rate,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkInitOptions {
    pub dsn: String,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    pub debug: bool,
    pub sample_rate: f32,
}

/// A parsed `scheme://public_key@host[:port]/project_id` DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    raw: String,
    pub scheme: String,
    pub public_key: String,
    pub host: String,
    pub port: Option<u16>,
    pub project_id: String,
}

impl Dsn {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidDsn {
            dsn: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(invalid("scheme must be http or https"));
        }
        if url.username().is_empty() {
            return Err(invalid("missing public key"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        let project_id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("missing project id"))?;

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_string(),
            public_key: url.username().to_string(),
            host: host.to_string(),
            port: url.port(),
            project_id: project_id.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DSN: &str = "https://abc123@o1.ingest.sentry.io/42";

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = ReporterConfig::from_json("{}").unwrap();
        assert_eq!(cfg, ReporterConfig::default());
        assert!(!cfg.is_active());
        assert!(matches!(cfg.active_dsn(), Err(ConfigError::MissingDsn)));
    }

    #[test]
    fn parses_full_config() {
        let cfg = ReporterConfig::from_json(&format!(
            r#"{{"dsn":"{DSN}","environment":"staging","release":"web@1.2.0","debug":true,"sample_rate":0.5}}"#
        ))
        .unwrap();

        assert!(cfg.is_active());
        assert_eq!(cfg.environment, "staging");

        let dsn = cfg.active_dsn().unwrap();
        assert_eq!(dsn.scheme, "https");
        assert_eq!(dsn.public_key, "abc123");
        assert_eq!(dsn.host, "o1.ingest.sentry.io");
        assert_eq!(dsn.port, None);
        assert_eq!(dsn.project_id, "42");
        assert_eq!(dsn.as_str(), DSN);
    }

    #[test]
    fn disabled_config_is_inactive_even_with_dsn() {
        let cfg = ReporterConfig {
            enabled: false,
            dsn: Some(DSN.to_string()),
            ..ReporterConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert!(!cfg.is_active());
    }

    #[test]
    fn rejects_bad_dsns() {
        for bad in [
            "not a url",
            "ftp://key@host/1",
            "https://host/1",
            "https://key@host/",
        ] {
            let err = Dsn::parse(bad).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDsn { .. }), "{bad}: {err}");
        }
        assert!(Dsn::parse("http://key@localhost:9000/7").unwrap().port == Some(9000));
    }

    #[test]
    fn rejects_out_of_range_sample_rate() {
        let err = ReporterConfig::from_json(r#"{"sample_rate": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SampleRate(r) if r == 1.5));
    }

    #[test]
    fn init_options_serialize_camel_case() {
        let cfg = ReporterConfig {
            dsn: Some(DSN.to_string()),
            ..ReporterConfig::default()
        };
        let json = serde_json::to_value(cfg.init_options().unwrap()).unwrap();
        assert_eq!(json["dsn"], DSN);
        assert_eq!(json["environment"], "production");
        assert_eq!(json["sampleRate"], 1.0);
        assert!(json.get("release").is_none());
    }
}
