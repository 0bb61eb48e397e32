//! Terminal Configuration and Theme Management
//!
//! This module handles configuration settings, terminal themes, user
//! defaults and remote endpoint settings for the terminal portfolio.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Portfolio processing API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub key: String,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/api".to_string(),
            key: String::new(),
            github_url: None,
            linkedin_url: None,
        }
    }
}

/// Values used wherever the portfolio document is silent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDefaults {
    pub name: String,
    pub title: String,
    pub email: String,
    pub bio: String,
    pub phone: String,
    pub location: String,
    pub github_url: String,
    pub linkedin_url: String,
}

impl Default for UserDefaults {
    fn default() -> Self {
        Self {
            name: "Portfolio Owner".to_string(),
            title: "Full-Stack Developer".to_string(),
            email: "hello@example.com".to_string(),
            bio: "I build applications and this terminal shows what I have been working on."
                .to_string(),
            phone: String::new(),
            location: String::new(),
            github_url: String::new(),
            linkedin_url: String::new(),
        }
    }
}

/// Configuration for the terminal portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub site_title: String,
    pub theme_name: String,
    pub animate_output: bool,
    pub reveal_interval_ms: u64,
    pub glitch_frame_ms: u64,
    pub page_size: usize,
    pub max_history_size: usize,
    pub konami_sequence: Vec<String>,
    pub quote_endpoint: Option<String>,
    /// Upper bound for any single HTTP request
    pub request_timeout_secs: u64,
    pub template_dir: String,
    pub data_file: PathBuf,
    pub cache_file: PathBuf,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub resume_url: String,
    pub api: ApiConfig,
    pub user: UserDefaults,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            site_title: "Developer Portfolio".to_string(),
            theme_name: "classic".to_string(),
            animate_output: true,
            reveal_interval_ms: 20,
            glitch_frame_ms: 150,
            page_size: 20,
            max_history_size: 1000,
            konami_sequence: ["up", "up", "down", "down", "left", "right", "left", "right", "b", "a"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            quote_endpoint: Some("https://type.fit/api/quotes".to_string()),
            request_timeout_secs: 10,
            template_dir: "src3".to_string(),
            data_file: PathBuf::from("data/portfolio.json"),
            cache_file: PathBuf::from("data/.portfolio_cache.json"),
            download_dir: PathBuf::from("downloads"),
            log_file: PathBuf::from("data/folio.log"),
            resume_url: "resume/resume.pdf".to_string(),
            api: ApiConfig::default(),
            user: UserDefaults::default(),
        }
    }
}

impl CliConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FOLIO_API_URL` / `FOLIO_API_KEY` from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("FOLIO_API_URL") {
            if !url.is_empty() {
                self.api.url = url;
            }
        }
        if let Ok(key) = env::var("FOLIO_API_KEY") {
            if !key.is_empty() {
                self.api.key = key;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(FolioError::Config("page_size must be at least 1".to_string()));
        }
        if self.reveal_interval_ms == 0 {
            return Err(FolioError::Config(
                "reveal_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(FolioError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if TerminalTheme::find(&self.theme_name).is_none() {
            return Err(FolioError::Config(format!(
                "unknown theme '{}'",
                self.theme_name
            )));
        }
        Ok(())
    }

    /// Number of reveal ticks each glitch frame stays on screen
    pub fn glitch_frame_ticks(&self) -> u32 {
        (self.glitch_frame_ms / self.reveal_interval_ms.max(1)).max(1) as u32
    }

    /// Apply a theme by key; returns false for unknown themes
    pub fn apply_theme(&mut self, theme_name: &str) -> bool {
        if TerminalTheme::find(theme_name).is_some() {
            self.theme_name = theme_name.to_string();
            true
        } else {
            false
        }
    }

    pub fn theme(&self) -> &'static TerminalTheme {
        TerminalTheme::find(&self.theme_name).unwrap_or(&THEMES[0])
    }
}

/// Colour scheme of the terminal view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalTheme {
    pub key: &'static str,
    pub name: &'static str,
    pub bg: Color,
    pub text: Color,
    pub prompt: Color,
    pub success: Color,
    pub error: Color,
}

static THEMES: [TerminalTheme; 5] = [
    TerminalTheme {
        key: "classic",
        name: "Classic Green",
        bg: Color::Rgb(0x0c, 0x0c, 0x0c),
        text: Color::Rgb(0x00, 0xff, 0x00),
        prompt: Color::Rgb(0x00, 0xff, 0x00),
        success: Color::Rgb(0x00, 0xff, 0x00),
        error: Color::Rgb(0xff, 0x00, 0x00),
    },
    TerminalTheme {
        key: "midnight",
        name: "Midnight Blue",
        bg: Color::Rgb(0x0d, 0x11, 0x17),
        text: Color::Rgb(0x58, 0xa6, 0xff),
        prompt: Color::Rgb(0x79, 0xc0, 0xff),
        success: Color::Rgb(0x56, 0xd3, 0x64),
        error: Color::Rgb(0xf8, 0x51, 0x49),
    },
    TerminalTheme {
        key: "retro",
        name: "Retro Amber",
        bg: Color::Rgb(0x15, 0x0f, 0x01),
        text: Color::Rgb(0xff, 0xb0, 0x00),
        prompt: Color::Rgb(0xff, 0xb0, 0x00),
        success: Color::Rgb(0xff, 0xc5, 0x33),
        error: Color::Rgb(0xff, 0x55, 0x55),
    },
    TerminalTheme {
        key: "monochrome",
        name: "Monochrome",
        bg: Color::Rgb(0x0a, 0x0a, 0x0a),
        text: Color::Rgb(0xff, 0xff, 0xff),
        prompt: Color::Rgb(0xff, 0xff, 0xff),
        success: Color::Rgb(0xcc, 0xcc, 0xcc),
        error: Color::Rgb(0x99, 0x99, 0x99),
    },
    TerminalTheme {
        key: "matrix",
        name: "Matrix",
        bg: Color::Rgb(0x00, 0x00, 0x00),
        text: Color::Rgb(0x03, 0xa0, 0x62),
        prompt: Color::Rgb(0x00, 0xff, 0x41),
        success: Color::Rgb(0x03, 0xa0, 0x62),
        error: Color::Rgb(0xff, 0x00, 0x00),
    },
];

/// Colours forced on while retro mode is active
pub const RETRO_TEXT: Color = Color::Rgb(0x33, 0xff, 0x00);
pub const RETRO_BG: Color = Color::Rgb(0x00, 0x00, 0x00);

impl TerminalTheme {
    pub fn all() -> &'static [TerminalTheme] {
        &THEMES
    }

    pub fn find(key: &str) -> Option<&'static TerminalTheme> {
        THEMES.iter().find(|t| t.key.eq_ignore_ascii_case(key))
    }
}
