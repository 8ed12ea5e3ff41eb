use std::time::Duration;
use std::{fs, path::PathBuf, sync::RwLock};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::overlay::OverlayStyle;

pub const API_URL_ENV: &str = "FACEPULSE_API_URL";
pub const CAPTURE_INTERVAL_ENV: &str = "FACEPULSE_CAPTURE_INTERVAL_MS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub api_base_url: String,
    pub capture_interval_ms: u64,
    pub capture_timeout_ms: u64,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    pub overlay_padding_px: f32,
    pub overlay_arm_px: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            capture_interval_ms: 1000,
            capture_timeout_ms: 10_000,
            jpeg_quality: 85,
            overlay_padding_px: 20.0,
            overlay_arm_px: 20.0,
        }
    }
}

impl PipelineSettings {
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            padding: self.overlay_padding_px,
            arm_length: self.overlay_arm_px,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capture_interval_ms == 0 {
            bail!("capture_interval_ms must be greater than zero");
        }
        if self.capture_timeout_ms == 0 {
            bail!("capture_timeout_ms must be greater than zero");
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("jpeg_quality must be within 1..=100, got {}", self.jpeg_quality);
        }
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url must not be empty");
        }
        // The padded box must strictly contain the face box.
        if !(self.overlay_padding_px.is_finite() && self.overlay_padding_px > 0.0) {
            bail!(
                "overlay_padding_px must be a positive number, got {}",
                self.overlay_padding_px
            );
        }
        if !(self.overlay_arm_px.is_finite() && self.overlay_arm_px > 0.0) {
            bail!("overlay_arm_px must be a positive number, got {}", self.overlay_arm_px);
        }
        Ok(())
    }

    /// Applies `FACEPULSE_*` environment overrides on top of the file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(raw) = std::env::var(CAPTURE_INTERVAL_ENV) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => self.capture_interval_ms = ms,
                _ => warn!("ignoring invalid {CAPTURE_INTERVAL_ENV}={raw}"),
            }
        }
        self
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PipelineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("settings at {} are invalid ({err}); using defaults", path.display());
                PipelineSettings::default()
            })
        } else {
            PipelineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// `<config dir>/facepulse/settings.json`, falling back to the working
    /// directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("facepulse"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("settings.json")
    }

    pub fn pipeline(&self) -> PipelineSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_pipeline(&self, settings: PipelineSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &PipelineSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
