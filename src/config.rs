// src/config.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Run configuration, loaded once and immutable for the duration of a run.
/// Unknown YAML keys are ignored; missing keys take the documented defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_regions")]
    pub regions: HashMap<String, bool>,
    #[serde(default)]
    pub entity_types: EntityTypesConfig,
    #[serde(default = "default_sources")]
    pub sources: HashMap<String, bool>,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntityTypesConfig {
    #[serde(default = "default_true")]
    pub hoa: bool,
    #[serde(default = "default_true")]
    pub property_management: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScrapingConfig {
    /// Base delay between requests; actual pauses are jittered around this.
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Number of pooled fetch sessions processing sources concurrently.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Page bound for the paginated-list strategy.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Checkpoint after this many processed sources.
    #[serde(default = "default_save_progress_every")]
    pub save_progress_every: usize,
    // Content-blocking toggles carried for session setup; an HTTP fetcher
    // has no subresource loading, so these are passed through untouched.
    #[serde(default = "default_true")]
    pub disable_images: bool,
    #[serde(default = "default_true")]
    pub disable_css: bool,
    #[serde(default)]
    pub disable_javascript: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub json_path: String,
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    #[serde(default = "default_summary_path")]
    pub summary_path: String,
    #[serde(default = "default_temp_data_dir")]
    pub temp_data_dir: String,
    #[serde(default = "default_true")]
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_error_log_path")]
    pub error_log_path: String,
}

fn default_true() -> bool {
    true
}

fn default_regions() -> HashMap<String, bool> {
    HashMap::from([
        ("broward".to_string(), true),
        ("dade".to_string(), true),
        ("miami".to_string(), true),
    ])
}

fn default_sources() -> HashMap<String, bool> {
    HashMap::from([
        ("propertyAppraisers".to_string(), false),
        ("dbpr".to_string(), false),
        ("directories".to_string(), true),
        ("sunbiz".to_string(), false),
        ("googleMaps".to_string(), true),
        ("yelpPages".to_string(), true),
        ("thirdParty".to_string(), true),
        ("realEstateBoards".to_string(), false),
        ("chamberOfCommerce".to_string(), false),
    ])
}

fn default_request_delay() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5000
}

fn default_worker_count() -> usize {
    2
}

fn default_max_pages() -> u32 {
    30
}

fn default_save_progress_every() -> usize {
    5
}

fn default_output_path() -> String {
    "results/data.json".to_string()
}

fn default_csv_path() -> String {
    "results/data.csv".to_string()
}

fn default_summary_path() -> String {
    "results/summary.json".to_string()
}

fn default_temp_data_dir() -> String {
    "temp_data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "logs/scraper_log.txt".to_string()
}

fn default_error_log_path() -> String {
    "logs/error_log.txt".to_string()
}

impl Default for EntityTypesConfig {
    fn default() -> Self {
        Self {
            hoa: true,
            property_management: true,
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            worker_count: default_worker_count(),
            max_pages: default_max_pages(),
            save_progress_every: default_save_progress_every(),
            disable_images: true,
            disable_css: true,
            disable_javascript: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: default_output_path(),
            csv_path: default_csv_path(),
            summary_path: default_summary_path(),
            temp_data_dir: default_temp_data_dir(),
            pretty_json: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_path: default_log_path(),
            error_log_path: default_error_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            entity_types: EntityTypesConfig::default(),
            sources: default_sources(),
            scraping: ScrapingConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.scraping.request_delay_ms, 2000);
        assert_eq!(config.scraping.max_retries, 3);
        assert_eq!(config.scraping.worker_count, 2);
        assert_eq!(config.scraping.save_progress_every, 5);
        assert!(config.entity_types.hoa);
        assert!(config.entity_types.property_management);
        assert_eq!(config.regions.get("broward"), Some(&true));
        assert_eq!(config.sources.get("googleMaps"), Some(&true));
        assert_eq!(config.sources.get("dbpr"), Some(&false));
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_keys() {
        let yaml = "scraping:\n  request_delay_ms: 100\n  worker_count: 4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scraping.request_delay_ms, 100);
        assert_eq!(config.scraping.worker_count, 4);
        // untouched keys fall back
        assert_eq!(config.scraping.max_retries, 3);
        assert_eq!(config.output.json_path, "results/data.json");
        assert_eq!(config.regions.get("miami"), Some(&true));
    }

    #[test]
    fn unknown_yaml_keys_are_ignored() {
        let yaml = "proxies: []\nuse_proxies: false\nlogging:\n  level: debug\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_path, "logs/scraper_log.txt");
    }
}
