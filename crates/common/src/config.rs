//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Automation server connection and device capabilities.
    pub driver: DriverConfig,

    /// Default recording settings.
    pub recording: RecordingDefaults,

    /// In-app download step settings.
    pub download: DownloadConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Automation server connection settings and the capability set negotiated
/// when a session is opened. The capability schema itself is opaque to
/// mobgrab; values are passed through to the server verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Base URL of the automation server.
    pub server_url: String,

    /// Target platform name.
    pub platform_name: String,

    /// Automation backend name.
    pub automation_name: String,

    /// Device serial / name.
    pub device_name: String,

    /// Device platform version.
    pub platform_version: String,

    /// Package of the application under automation.
    pub app_package: String,

    /// Launch activity of the application.
    pub app_activity: String,

    /// Keep app state between sessions.
    pub no_reset: bool,

    /// Wipe app state before the session.
    pub full_reset: bool,
}

/// Default recording parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingDefaults {
    /// Recording duration in seconds.
    pub duration_secs: u64,

    /// Extra seconds to wait for recorders after the duration budget before
    /// force-stopping them.
    pub grace_secs: u64,

    /// Seconds to let the app settle before capture begins.
    pub settle_secs: u64,

    /// Directory where captured artifacts are written.
    pub output_dir: PathBuf,

    /// Host audio input device (ffmpeg capture source).
    pub audio_device: String,

    /// Remote directory the in-app download saves media to.
    pub remote_media_dir: String,
}

/// Selectors driving the in-app "save video" flow. These are app-specific
/// and configurable; the defaults target the stock share sheet of the app
/// under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Selector for the share button on the current item.
    pub share_selector: String,

    /// Selector for the save option in the share sheet.
    pub save_selector: String,

    /// Per-element wait timeout in seconds.
    pub element_timeout_secs: u64,

    /// Seconds to wait for the share sheet to finish animating.
    pub menu_settle_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "mobgrab=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            driver: DriverConfig::default(),
            recording: RecordingDefaults::default(),
            download: DownloadConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:4723".to_string(),
            platform_name: "Android".to_string(),
            automation_name: "uiautomator2".to_string(),
            device_name: String::new(),
            platform_version: "13".to_string(),
            app_package: "com.zhiliaoapp.musically".to_string(),
            app_activity: "com.ss.android.ugc.aweme.splash.SplashActivity".to_string(),
            no_reset: true,
            full_reset: false,
        }
    }
}

impl Default for RecordingDefaults {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            grace_secs: 5,
            settle_secs: 5,
            output_dir: PathBuf::from("."),
            audio_device: "default".to_string(),
            remote_media_dir: "/storage/emulated/0/DCIM/Camera".to_string(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            share_selector:
                r#"//android.widget.ImageView[@resource-id="com.zhiliaoapp.musically:id/opb"]"#
                    .to_string(),
            save_selector: r#"//android.widget.Button[@content-desc="Guardar vídeo"]"#.to_string(),
            element_timeout_secs: 10,
            menu_settle_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl DriverConfig {
    /// The `alwaysMatch` capability payload for session creation.
    pub fn capabilities(&self) -> serde_json::Value {
        serde_json::json!({
            "platformName": self.platform_name,
            "appium:automationName": self.automation_name,
            "appium:deviceName": self.device_name,
            "appium:platformVersion": self.platform_version,
            "appium:appPackage": self.app_package,
            "appium:appActivity": self.app_activity,
            "appium:noReset": self.no_reset,
            "appium:fullReset": self.full_reset,
        })
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("mobgrab").join("config.json")
}
