use crate::fields::FieldSpec;
use crate::model::FieldKey;
use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_platform")]
    pub default_platform: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub full_fields: Vec<FieldRule>,
    #[serde(default)]
    pub refresh_fields: Vec<FieldRule>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_platform: default_platform(),
            default_currency: default_currency(),
            timezone: default_timezone(),
            full_fields: Vec::new(),
            refresh_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    pub key: FieldKey,
    #[serde(default)]
    pub locators: Vec<String>,
}

impl ParserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.default_platform.trim().is_empty() {
            bail!("default_platform must not be empty");
        }
        if self.default_currency.trim().is_empty() {
            bail!("default_currency must not be empty");
        }
        self.timezone()?;

        self.full_spec().context("full_fields")?;
        self.refresh_spec().context("refresh_fields")?;

        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("unknown timezone {}: {err}", self.timezone))
    }

    pub fn full_spec(&self) -> Result<FieldSpec> {
        if self.full_fields.is_empty() {
            return Ok(FieldSpec::full()?);
        }
        Ok(spec_from_rules(&self.full_fields)?)
    }

    pub fn refresh_spec(&self) -> Result<FieldSpec> {
        if self.refresh_fields.is_empty() {
            return Ok(FieldSpec::refresh()?);
        }
        Ok(spec_from_rules(&self.refresh_fields)?)
    }
}

pub fn load_config(path: &Path) -> Result<ParserConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parser config: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid parser config {}", path.display()))
}

pub fn parse_config(text: &str) -> Result<ParserConfig> {
    let config: ParserConfig = toml::from_str(text).context("failed to parse config toml")?;
    config.validate()?;
    Ok(config)
}

fn spec_from_rules(rules: &[FieldRule]) -> Result<FieldSpec, crate::error::ExtractError> {
    FieldSpec::from_table(rules.iter().map(|rule| (rule.key, &rule.locators)))
}

fn default_platform() -> String {
    "ebay.de".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}
