use crate::error::{GoupError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_DOWNLOAD_PAGE: &str = "https://go.dev/dl/";
pub const DEFAULT_INSTALL_ROOT: &str = "/usr/local";
pub const DEFAULT_PLATFORM: &str = "linux";
pub const DEFAULT_SELECTOR_CLASS: &str = "downloadBox";
pub const DEFAULT_ELEVATE: &str = "sudo";

/// Immutable run configuration, built once in `main` and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub download_page: Url,
    pub install_root: PathBuf,
    pub archive_path: PathBuf,
    /// Substring the download link's `href` must contain.
    pub platform: String,
    /// CSS class of the download boxes on the listing page.
    pub selector_class: String,
    /// Program used to run install commands with elevated privileges.
    pub elevate: Option<String>,
    pub check_version: bool,
    pub assume_yes: bool,
    pub show_progress: bool,
}

/// Optional settings read from `~/.goup/config.json`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub download_page: Option<String>,
    pub install_root: Option<PathBuf>,
    pub archive_path: Option<PathBuf>,
    pub platform: Option<String>,
    pub selector_class: Option<String>,
    /// `""` disables privilege escalation.
    pub elevate: Option<String>,
    pub check_version: Option<bool>,
}

/// Values given on the command line. They win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub download_page: Option<String>,
    pub install_root: Option<PathBuf>,
    pub archive_path: Option<PathBuf>,
    pub platform: Option<String>,
    pub no_elevate: bool,
    pub force: bool,
    pub assume_yes: bool,
    pub quiet: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(|e| GoupError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Some(config))
    }
}

impl Config {
    /// Loads the config file (if any) from `config_path` or the default
    /// location and applies `overrides` on top.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?.ok_or_else(|| {
                GoupError::config_error(format!("config file {} does not exist", path.display()))
            })?,
            None => FileConfig::load(&get_config_path()?)?.unwrap_or_default(),
        };

        Self::resolve(file, overrides, &get_default_archive_path()?)
    }

    pub fn resolve(file: FileConfig, overrides: Overrides, default_archive: &Path) -> Result<Self> {
        let page = overrides
            .download_page
            .or(file.download_page)
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_PAGE.to_string());
        let download_page = Url::parse(&page).map_err(|e| {
            GoupError::config_error(format!("invalid download page URL '{page}': {e}"))
        })?;

        let platform = overrides
            .platform
            .or(file.platform)
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
        if platform.is_empty() {
            return Err(GoupError::config_error("platform filter must not be empty"));
        }

        let elevate = if overrides.no_elevate {
            None
        } else {
            match file.elevate {
                Some(program) if program.is_empty() => None,
                Some(program) => Some(program),
                None => Some(DEFAULT_ELEVATE.to_string()),
            }
        };

        Ok(Config {
            download_page,
            install_root: overrides
                .install_root
                .or(file.install_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INSTALL_ROOT)),
            archive_path: overrides
                .archive_path
                .or(file.archive_path)
                .unwrap_or_else(|| default_archive.to_path_buf()),
            platform,
            selector_class: file
                .selector_class
                .unwrap_or_else(|| DEFAULT_SELECTOR_CLASS.to_string()),
            elevate,
            check_version: !overrides.force && file.check_version.unwrap_or(true),
            assume_yes: overrides.assume_yes,
            show_progress: !overrides.quiet,
        })
    }

    /// Directory the distribution is unpacked into, `<root>/go`.
    pub fn go_dir(&self) -> PathBuf {
        self.install_root.join("go")
    }

    pub fn go_binary(&self) -> PathBuf {
        let binary_name = if cfg!(windows) { "go.exe" } else { "go" };
        self.go_dir().join("bin").join(binary_name)
    }
}

fn get_goup_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".goup"))
        .ok_or(GoupError::HomeDirectoryNotFound)
}

fn get_config_path() -> Result<PathBuf> {
    Ok(get_goup_dir()?.join("config.json"))
}

fn get_default_archive_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Downloads").join("golang.tar.gz"))
        .ok_or(GoupError::HomeDirectoryNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn archive() -> PathBuf {
        PathBuf::from("/home/gopher/Downloads/golang.tar.gz")
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::resolve(FileConfig::default(), Overrides::default(), &archive()).unwrap();

        assert_eq!(config.download_page.as_str(), DEFAULT_DOWNLOAD_PAGE);
        assert_eq!(config.install_root, PathBuf::from("/usr/local"));
        assert_eq!(config.archive_path, archive());
        assert_eq!(config.platform, "linux");
        assert_eq!(config.selector_class, "downloadBox");
        assert_eq!(config.elevate.as_deref(), Some("sudo"));
        assert!(config.check_version);
        assert!(!config.assume_yes);
        assert!(config.show_progress);
        assert_eq!(config.go_dir(), PathBuf::from("/usr/local/go"));
    }

    #[test]
    fn test_file_overrides_defaults_and_cli_overrides_file() {
        let file = FileConfig {
            install_root: Some(PathBuf::from("/opt")),
            platform: Some("linux-arm64".to_string()),
            elevate: Some(String::new()),
            check_version: Some(false),
            ..Default::default()
        };
        let overrides = Overrides {
            install_root: Some(PathBuf::from("/srv/tools")),
            ..Default::default()
        };

        let config = Config::resolve(file, overrides, &archive()).unwrap();
        assert_eq!(config.install_root, PathBuf::from("/srv/tools"));
        assert_eq!(config.platform, "linux-arm64");
        assert_eq!(config.elevate, None);
        assert!(!config.check_version);
    }

    #[test]
    fn test_cli_flags() {
        let overrides = Overrides {
            no_elevate: true,
            force: true,
            assume_yes: true,
            quiet: true,
            ..Default::default()
        };

        let config = Config::resolve(FileConfig::default(), overrides, &archive()).unwrap();
        assert_eq!(config.elevate, None);
        assert!(!config.check_version);
        assert!(config.assume_yes);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_invalid_download_page() {
        let overrides = Overrides {
            download_page: Some("not a url".to_string()),
            ..Default::default()
        };

        let err = Config::resolve(FileConfig::default(), overrides, &archive()).unwrap_err();
        assert!(matches!(err, GoupError::ConfigError { .. }));
    }

    #[test]
    fn test_load_file_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "download_page": "https://mirror.example.com/dl/", "elevate": "doas" }"#,
        )
        .unwrap();

        let file = FileConfig::load(&path).unwrap().unwrap();
        assert_eq!(
            file.download_page.as_deref(),
            Some("https://mirror.example.com/dl/")
        );
        assert_eq!(file.elevate.as_deref(), Some("doas"));
        assert_eq!(file.install_root, None);
    }

    #[test]
    fn test_load_missing_and_invalid_file_config() {
        let temp = tempfile::tempdir().unwrap();
        assert_eq!(FileConfig::load(&temp.path().join("none.json")).unwrap(), None);

        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ \"platform\": 3 }").unwrap();
        let err = FileConfig::load(&path).unwrap_err();
        assert!(matches!(err, GoupError::ConfigFile { .. }));
    }

    #[test]
    fn test_explicit_missing_config_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.json");
        let err = Config::load(Some(&missing), Overrides::default()).unwrap_err();
        assert!(matches!(err, GoupError::ConfigError { .. }));
    }
}
