use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudioError};
use directories::ProjectDirs;

/// Session defaults loaded from config.toml. Every section falls back to
/// the built-in placeholders, so a missing file is not an error.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub company: CompanyDefaults,
    pub invoice: InvoiceDefaults,
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CompanyDefaults {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for CompanyDefaults {
    fn default() -> Self {
        Self {
            name: "Your Company Name".to_string(),
            address: "123 Business Street\nCity, State 12345".to_string(),
            phone: "(555) 123-4567".to_string(),
            email: "contact@company.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct InvoiceDefaults {
    pub number: String,
    pub due_days: i64,
    pub tax_rate_percent: f64,
    pub notes: String,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            number: "INV-001".to_string(),
            due_days: 30,
            tax_rate_percent: 10.0,
            notes: "Thank you for your business!".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfSettings {
    pub output_dir: String,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}

/// Get the config directory path (~/.invoice-studio/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-studio") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.invoice-studio/
    let home = dirs_home().ok_or_else(|| {
        StudioError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-studio"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, failing if it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(StudioError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| StudioError::ConfigParse { path, source: e })
}

/// Load config.toml if present, otherwise fall back to the built-in
/// placeholder defaults. A malformed file is still an error.
pub fn load_config_or_default(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(config_dir)
}

/// Initialize the config directory with a commented template
pub fn init_config(config_dir: &Path) -> Result<()> {
    if config_dir.join("config.toml").exists() {
        return Err(StudioError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    fs::write(config_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Company Name"
address = """123 Business Street
City, State 12345"""
phone = "(555) 123-4567"
email = "contact@company.com"

[invoice]
number = "INV-001"   # starting invoice number shown in a fresh session
due_days = 30        # due date = invoice date + due_days
tax_rate_percent = 10.0
notes = "Thank you for your business!"

[pdf]
output_dir = "."     # where 'pdf' saves invoice-<number>.pdf
"#;
