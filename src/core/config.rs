//! # Configuration
//!
//! Four layers, later ones winning: built-in defaults, `~/.cinema/config.toml`,
//! environment variables, CLI flags. [`load_config`] reads the file layer
//! (seeding a commented template on first run) and [`resolve`] collapses all
//! four into a [`ResolvedConfig`] with no optional fields left.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Platform;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CinemaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub platform: Option<Platform>,
    pub grid_item_width: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OmdbConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    pub default_query: Option<String>,
    pub loading_hold_ms: Option<u64>,
    pub toast_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DownloadConfig {
    pub directory: Option<String>,
    pub fallback_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_QUERY: &str = "king";
pub const DEFAULT_LOADING_HOLD_MS: u64 = 800;
pub const DEFAULT_TOAST_MS: u64 = 3000;
pub const DEFAULT_GRID_ITEM_WIDTH: u16 = 24;
/// Smallest cell that still fits a border and a couple of title characters.
pub const MIN_GRID_ITEM_WIDTH: u16 = 8;
pub const DEFAULT_FALLBACK_DOWNLOAD_URL: &str =
    "https://www.simplilearn.com/ice9/free_resources_article_thumb/what_is_image_Processing.jpg";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub platform: Platform,
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub default_query: String,
    pub loading_hold: Duration,
    pub toast_duration: Duration,
    pub grid_item_width: u16,
    pub download_dir: PathBuf,
    pub fallback_download_url: String,
}

// ============================================================================
// Loading
// ============================================================================

/// Written on first run so every option is discoverable.
const CONFIG_TEMPLATE: &str = r#"# Cinema Configuration
# Every setting is optional. Anything left commented out uses the built-in default.
# Precedence, lowest first: built-in defaults, this file, env vars, CLI flags.

# [general]
# platform = "unrestricted"          # "unrestricted" or "permissioned"
# grid_item_width = 24               # Target cell width in columns

# [omdb]
# api_key = "..."                    # Or set OMDB_API_KEY env var
# base_url = "https://www.omdbapi.com/"

# [search]
# default_query = "king"
# loading_hold_ms = 800              # Loading view stays up this long after a search completes
# toast_ms = 3000

# [download]
# directory = "~/Downloads"          # Or set CINEMA_DOWNLOAD_DIR env var
# fallback_url = "https://www.simplilearn.com/ice9/free_resources_article_thumb/what_is_image_Processing.jpg"
"#;

/// Where the file layer of the config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from an existing file.
    File(PathBuf),
    /// No file existed; the template was written here and defaults apply.
    Seeded(PathBuf),
    /// No usable location; defaults apply.
    Defaults,
}

/// A config file that exists but cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    Unreadable { path: PathBuf, source: io::Error },
    Malformed { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Malformed { path, source } => {
                write!(f, "{} is not a valid cinema config: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Malformed { source, .. } => Some(source),
        }
    }
}

/// Returns the path to `~/.cinema/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cinema").join("config.toml"))
}

/// Reads the file layer from `~/.cinema/config.toml`.
pub fn load_config() -> Result<(CinemaConfig, ConfigSource), ConfigError> {
    match config_path() {
        Some(path) => load_or_seed(&path),
        None => Ok((CinemaConfig::default(), ConfigSource::Defaults)),
    }
}

/// Parses the file at `path`. A missing file is seeded from the template
/// and yields the defaults; any other read failure is an error.
pub fn load_or_seed(path: &Path) -> Result<(CinemaConfig, ConfigSource), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let source = match seed(path) {
                Ok(()) => ConfigSource::Seeded(path.to_path_buf()),
                Err(e) => {
                    warn!("Could not write config template to {}: {}", path.display(), e);
                    ConfigSource::Defaults
                }
            };
            return Ok((CinemaConfig::default(), source));
        }
        Err(source) => {
            return Err(ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: CinemaConfig = toml::from_str(&text).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Config file layer: {:?}", config);
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

fn seed(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_platform` and `cli_download_dir` are from CLI flags (None = not specified).
pub fn resolve(
    config: &CinemaConfig,
    cli_platform: Option<Platform>,
    cli_download_dir: Option<&Path>,
) -> ResolvedConfig {
    // Platform: CLI → env → config → default
    let platform = cli_platform
        .or_else(|| {
            std::env::var("CINEMA_PLATFORM")
                .ok()
                .and_then(|s| Platform::parse(&s))
        })
        .or(config.general.platform)
        .unwrap_or_default();

    // OMDb API key: env → config
    let omdb_api_key = std::env::var("OMDB_API_KEY")
        .ok()
        .or_else(|| config.omdb.api_key.clone());

    // OMDb base URL: env → config → default
    let omdb_base_url = std::env::var("OMDB_BASE_URL")
        .ok()
        .or_else(|| config.omdb.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string());

    // Download directory: CLI → env → config → platform default
    let download_dir = cli_download_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::var("CINEMA_DOWNLOAD_DIR").ok().map(|s| expand_home(&s)))
        .or_else(|| config.download.directory.as_deref().map(expand_home))
        .unwrap_or_else(default_download_dir);

    let default_query = config
        .search
        .default_query
        .clone()
        .filter(|q| !q.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());

    ResolvedConfig {
        platform,
        omdb_api_key,
        omdb_base_url,
        default_query,
        loading_hold: Duration::from_millis(
            config
                .search
                .loading_hold_ms
                .unwrap_or(DEFAULT_LOADING_HOLD_MS),
        ),
        toast_duration: Duration::from_millis(config.search.toast_ms.unwrap_or(DEFAULT_TOAST_MS)),
        grid_item_width: config
            .general
            .grid_item_width
            .unwrap_or(DEFAULT_GRID_ITEM_WIDTH)
            .max(MIN_GRID_ITEM_WIDTH),
        download_dir,
        fallback_download_url: config
            .download
            .fallback_url
            .clone()
            .unwrap_or_else(|| DEFAULT_FALLBACK_DOWNLOAD_URL.to_string()),
    }
}

/// The user's downloads directory, falling back to `~/Downloads`.
fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Expands a leading `~/` against the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = CinemaConfig::default();
        assert!(config.omdb.api_key.is_none());
        assert!(config.general.platform.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = CinemaConfig::default();
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.default_query, DEFAULT_QUERY);
        assert_eq!(resolved.loading_hold, Duration::from_millis(800));
        assert_eq!(resolved.toast_duration, Duration::from_millis(DEFAULT_TOAST_MS));
        assert_eq!(resolved.grid_item_width, DEFAULT_GRID_ITEM_WIDTH);
        assert_eq!(resolved.fallback_download_url, DEFAULT_FALLBACK_DOWNLOAD_URL);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = CinemaConfig {
            search: SearchConfig {
                default_query: Some("star".to_string()),
                loading_hold_ms: Some(250),
                toast_ms: Some(1000),
            },
            general: GeneralConfig {
                platform: None,
                grid_item_width: Some(30),
            },
            download: DownloadConfig {
                directory: None,
                fallback_url: Some("https://example.com/a.png".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None, None);
        assert_eq!(resolved.default_query, "star");
        assert_eq!(resolved.loading_hold, Duration::from_millis(250));
        assert_eq!(resolved.toast_duration, Duration::from_millis(1000));
        assert_eq!(resolved.grid_item_width, 30);
        assert_eq!(resolved.fallback_download_url, "https://example.com/a.png");
    }

    #[test]
    fn test_resolve_blank_default_query_falls_back() {
        let config = CinemaConfig {
            search: SearchConfig {
                default_query: Some("   ".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve(&config, None, None).default_query, DEFAULT_QUERY);
    }

    #[test]
    fn test_resolve_clamps_grid_item_width() {
        let config = CinemaConfig {
            general: GeneralConfig {
                grid_item_width: Some(2),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve(&config, None, None).grid_item_width, MIN_GRID_ITEM_WIDTH);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = CinemaConfig {
            general: GeneralConfig {
                platform: Some(Platform::Unrestricted),
                ..Default::default()
            },
            download: DownloadConfig {
                directory: Some("/from/config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(
            &config,
            Some(Platform::Permissioned),
            Some(Path::new("/from/cli")),
        );
        assert_eq!(resolved.platform, Platform::Permissioned);
        assert_eq!(resolved.download_dir, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
platform = "permissioned"
grid_item_width = 20

[omdb]
api_key = "abc123"
base_url = "http://localhost:8080/"

[search]
default_query = "batman"
loading_hold_ms = 500

[download]
directory = "/tmp/posters"
"#;
        let config: CinemaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.platform, Some(Platform::Permissioned));
        assert_eq!(config.general.grid_item_width, Some(20));
        assert_eq!(config.omdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.search.default_query.as_deref(), Some("batman"));
        assert_eq!(config.search.loading_hold_ms, Some(500));
        assert!(config.search.toast_ms.is_none());
        assert_eq!(config.download.directory.as_deref(), Some("/tmp/posters"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[search]
default_query = "alien"
"#;
        let config: CinemaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.default_query.as_deref(), Some("alien"));
        assert!(config.general.platform.is_none());
        assert!(config.omdb.base_url.is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search\ndefault_query = 1").unwrap();
        let err = load_or_seed(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_missing_file_is_seeded_with_a_valid_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let (config, source) = load_or_seed(&path).unwrap();
        assert_eq!(source, ConfigSource::Seeded(path.clone()));
        assert!(config.omdb.api_key.is_none());

        // Second run reads the template back
        let (config, source) = load_or_seed(&path).unwrap();
        assert_eq!(source, ConfigSource::File(path.clone()));
        assert!(config.search.default_query.is_none());
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let err = load_or_seed(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/tmp"), PathBuf::from("/var/tmp"));
    }
}
