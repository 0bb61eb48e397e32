//! Portfolio data store.
//!
//! Holds the normalized document the terminal reads from. Load order is the
//! data file, then the local cache, then configured defaults; a refresh asks
//! the processing API for a fresh document and persists it to both places.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use super::document::PortfolioDocument;
use crate::cli::config::{ApiConfig, CliConfig, UserDefaults};
use crate::error::{FolioError, Result};

pub const EXPORT_FILE_NAME: &str = "portfolio.json";
pub const RESUME_FILE_NAME: &str = "resume.pdf";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where a loaded document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    DataFile,
    Cache,
    Defaults,
}

pub struct DataStore {
    client: Client,
    api: ApiConfig,
    defaults: UserDefaults,
    data_file: Option<PathBuf>,
    cache_file: Option<PathBuf>,
    resume_path: Option<PathBuf>,
    document: Option<PortfolioDocument>,
}

impl DataStore {
    /// Create a store backed by the files named in the configuration
    pub fn from_config(config: &CliConfig) -> Self {
        let resume_path = if config.resume_url.starts_with("http") {
            None
        } else {
            Some(PathBuf::from(&config.resume_url))
        };

        Self {
            client: http_client(Duration::from_secs(config.request_timeout_secs)),
            api: config.api.clone(),
            defaults: config.user.clone(),
            data_file: Some(config.data_file.clone()),
            cache_file: Some(config.cache_file.clone()),
            resume_path,
            document: None,
        }
    }

    /// Create a store that never touches the file system
    pub fn in_memory(document: Option<PortfolioDocument>) -> Self {
        Self {
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            api: ApiConfig::default(),
            defaults: UserDefaults::default(),
            data_file: None,
            cache_file: None,
            resume_path: None,
            document,
        }
    }

    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Load the document, degrading to defaults on any failure
    pub fn load(&mut self) -> DocumentSource {
        if let Some(doc) = self.data_file.as_deref().and_then(|p| read_document(p, "data file")) {
            self.document = Some(doc.with_defaults(&self.defaults));
            return DocumentSource::DataFile;
        }

        if let Some(doc) = self.cache_file.as_deref().and_then(|p| read_document(p, "cache")) {
            self.document = Some(doc.with_defaults(&self.defaults));
            return DocumentSource::Cache;
        }

        log::info!("No stored portfolio found, using defaults");
        self.document = Some(PortfolioDocument::from_defaults(&self.defaults));
        DocumentSource::Defaults
    }

    /// Current document snapshot
    pub fn document(&self) -> Option<&PortfolioDocument> {
        self.document.as_ref()
    }

    pub fn set_document(&mut self, document: PortfolioDocument) {
        self.document = Some(document);
    }

    /// Write the current document to the local cache
    pub fn save_cache(&self) -> Result<()> {
        let Some(path) = self.cache_file.as_deref() else {
            return Ok(());
        };
        let doc = self.document.as_ref().ok_or(FolioError::NoDocument)?;
        write_json(path, doc)?;
        log::debug!("Portfolio cached at {}", path.display());
        Ok(())
    }

    fn save_data_file(&self) -> Result<()> {
        let Some(path) = self.data_file.as_deref() else {
            return Ok(());
        };
        let doc = self.document.as_ref().ok_or(FolioError::NoDocument)?;
        write_json(path, doc)
    }

    /// Fetch a fresh document from the processing API and persist it
    pub async fn refresh(&mut self) -> Result<()> {
        let doc = self.refresh_request().send().await?;
        self.install_refreshed(doc);
        Ok(())
    }

    /// Everything a refresh needs, detached from the store so it can run
    /// while the terminal keeps drawing
    pub fn refresh_request(&self) -> RefreshRequest {
        RefreshRequest {
            client: self.client.clone(),
            api: self.api.clone(),
            defaults: self.defaults.clone(),
            resume_path: self.resume_path.clone(),
        }
    }

    /// Make a fetched document current and persist it
    pub fn install_refreshed(&mut self, mut doc: PortfolioDocument) {
        doc.last_updated = Some(Utc::now());
        self.document = Some(doc);

        // The fetched document is already live; failing to persist it only
        // costs the next start-up a refetch.
        if let Err(e) = self.save_cache() {
            log::warn!("Failed to cache refreshed portfolio: {}", e);
        }
        if let Err(e) = self.save_data_file() {
            log::warn!("Failed to write refreshed portfolio file: {}", e);
        }
        log::info!("Portfolio refreshed");
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Write the current document as `portfolio.json` into `dir`
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let doc = self.document.as_ref().ok_or(FolioError::NoDocument)?;
        let path = dir.join(EXPORT_FILE_NAME);
        write_json(&path, doc)?;
        log::info!("Portfolio exported to {}", path.display());
        Ok(path)
    }

    /// Replace the current document with an edited export
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path)?;
        let doc = PortfolioDocument::from_json_str(&raw)?.with_defaults(&self.defaults);
        self.document = Some(doc);
        self.save_cache()?;
        log::info!("Portfolio imported from {}", path.display());
        Ok(())
    }

    /// Fetch (or copy) the resume into `dir`
    pub async fn download_resume(&self, source: &str, dir: &Path) -> Result<PathBuf> {
        fetch_resume(self.client.clone(), source.to_string(), dir.to_path_buf()).await
    }
}

/// Portfolio refresh call against the processing API
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    client: Client,
    api: ApiConfig,
    defaults: UserDefaults,
    resume_path: Option<PathBuf>,
}

impl RefreshRequest {
    /// POST the profile sources and return the normalized document
    pub async fn send(self) -> Result<PortfolioDocument> {
        let url = format!("{}/portfolio/", self.api.url.trim_end_matches('/'));
        log::info!("Refreshing portfolio from {}", url);

        let mut form = Form::new();
        if let Some(github) = &self.api.github_url {
            form = form.text("githubUrl", github.clone());
        }
        if let Some(linkedin) = &self.api.linkedin_url {
            form = form.text("linkedinUrl", linkedin.clone());
        }
        if let Some(resume) = self.resume_path.as_deref().filter(|p| p.is_file()) {
            let bytes = tokio::fs::read(resume).await?;
            let part = Part::bytes(bytes)
                .file_name("Resume.pdf")
                .mime_str("application/pdf")?;
            form = form.part("resume", part);
        }

        let response = self
            .client
            .post(&url)
            .header("API-Key", &self.api.key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FolioError::Api {
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let data = match body {
            Value::Object(mut map) => map.remove("data"),
            _ => None,
        }
        .filter(Value::is_object)
        .ok_or_else(|| FolioError::InvalidResponse("missing 'data' object".to_string()))?;

        Ok(PortfolioDocument::from_value(data)?.with_defaults(&self.defaults))
    }
}

/// Fetch (or copy) the resume at `source` into `dir`
pub async fn fetch_resume(client: Client, source: String, dir: PathBuf) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&dir).await?;
    let target = dir.join(RESUME_FILE_NAME);

    if source.starts_with("http://") || source.starts_with("https://") {
        let response = client.get(&source).send().await?;
        if !response.status().is_success() {
            return Err(FolioError::Api {
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        tokio::fs::write(&target, &bytes).await?;
    } else {
        let local = Path::new(&source);
        if !local.is_file() {
            return Err(FolioError::InvalidUrl(source));
        }
        tokio::fs::copy(local, &target).await?;
    }

    log::info!("Resume saved to {}", target.display());
    Ok(target)
}

/// HTTP client shared by every request the terminal makes
pub fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        log::warn!("Falling back to an HTTP client without timeout: {}", e);
        Client::new()
    })
}

fn read_document(path: &Path, label: &str) -> Option<PortfolioDocument> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Portfolio {} {} not readable: {}", label, path.display(), e);
            return None;
        }
    };
    match PortfolioDocument::from_json_str(&raw) {
        Ok(doc) => {
            log::info!("Loaded portfolio from {} {}", label, path.display());
            Some(doc)
        }
        Err(e) => {
            log::warn!("Ignoring malformed portfolio {} {}: {}", label, path.display(), e);
            None
        }
    }
}

fn write_json(path: &Path, doc: &PortfolioDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_pretty_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> CliConfig {
        CliConfig {
            data_file: dir.path().join("data/portfolio.json"),
            cache_file: dir.path().join("data/.cache.json"),
            resume_url: dir.path().join("resume.pdf").display().to_string(),
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_load_prefers_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(&config.data_file, r#"{"personalInfo": {"name": "From File"}}"#).unwrap();
        fs::write(&config.cache_file, r#"{"personalInfo": {"name": "From Cache"}}"#).unwrap();

        let mut store = DataStore::from_config(&config);
        assert_eq!(store.load(), DocumentSource::DataFile);
        let doc = store.document().unwrap();
        assert_eq!(doc.personal_info.name.as_deref(), Some("From File"));
    }

    #[test]
    fn test_load_falls_back_to_cache_then_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(&config.data_file, "{ not json").unwrap();
        fs::write(&config.cache_file, r#"{"personalInfo": {"name": "From Cache"}}"#).unwrap();

        let mut store = DataStore::from_config(&config);
        assert_eq!(store.load(), DocumentSource::Cache);

        fs::remove_file(&config.cache_file).unwrap();
        assert_eq!(store.load(), DocumentSource::Defaults);
        let doc = store.document().unwrap();
        assert_eq!(doc.personal_info.name, Some(config.user.name.clone()));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut store = DataStore::from_config(&config);
        store.load();

        let exported = store.export_to(&dir.path().join("downloads")).unwrap();
        let edited = fs::read_to_string(&exported)
            .unwrap()
            .replace(&config.user.name, "Edited Name");
        fs::write(&exported, edited).unwrap();

        store.import_from(&exported).unwrap();
        assert_eq!(
            store.document().unwrap().personal_info.name.as_deref(),
            Some("Edited Name")
        );
        // The import is cached so the next start picks it up.
        assert!(config.cache_file.exists());
    }

    #[test]
    fn test_export_without_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::in_memory(None);
        assert!(matches!(
            store.export_to(dir.path()),
            Err(FolioError::NoDocument)
        ));
    }

    #[tokio::test]
    async fn test_download_resume_copies_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("cv.pdf");
        fs::write(&source, b"%PDF-1.4").unwrap();

        let store = DataStore::in_memory(None);
        let target = store
            .download_resume(&source.display().to_string(), &dir.path().join("out"))
            .await
            .unwrap();
        assert_eq!(fs::read(target).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_document() {
        let original = PortfolioDocument::from_json_str(r#"{"personalInfo": {"name": "Kept"}}"#)
            .unwrap();
        let mut store = DataStore::in_memory(Some(original.clone())).with_api(ApiConfig {
            url: "http://127.0.0.1:1/api".to_string(),
            ..ApiConfig::default()
        });

        assert!(store.refresh().await.is_err());
        assert_eq!(store.document(), Some(&original));
    }
}
