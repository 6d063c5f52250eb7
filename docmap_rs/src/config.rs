//! Configuration file support for docmap.
//!
//! Loads optional `.docmap/config.toml` from the project root. Every section
//! has defaults, so an empty file (or none at all) is valid input; the CLI
//! layers its flags on top before calling [`DocmapConfig::validate`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_DIR: &str = ".docmap";
pub const CONFIG_FILE: &str = "config.toml";

/// Exclusions merged into every configuration.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".git",
    ".svn",
    "coverage",
    "tmp",
    "temp",
];

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocmapConfig {
    pub project: ProjectConfig,
    /// Include patterns; empty means include everything.
    pub include: Vec<String>,
    /// Exclude patterns; merged with [`DEFAULT_EXCLUDES`].
    pub exclude: Vec<String>,
    pub general: GeneralConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub root_path: PathBuf,
    /// Display name; falls back to the root directory name.
    pub name: Option<String>,
    pub languages: Vec<String>,
    pub framework: Option<String>,
    /// ISO-639-1 style code used when asking for generated text.
    pub natural_language: String,
    pub description: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root_path: PathBuf::new(),
            name: None,
            languages: Vec::new(),
            framework: None,
            natural_language: "en".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub use_gitignore: bool,
    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,
    pub follow_symlinks: bool,
    pub ignore_hidden: bool,
    pub max_depth: usize,
    /// Ceiling on concurrent content reads in the enrichment pass.
    pub concurrency: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            follow_symlinks: false,
            ignore_hidden: true,
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Settings for the optional text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
            model: "llama3".to_string(),
            api_key_env: "DOCMAP_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: 256,
            batch_size: 5,
            batch_delay_ms: 1000,
        }
    }
}

impl DocmapConfig {
    /// Config for `root` with every default applied.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.project.root_path = root.into();
        config
    }

    /// Load `.docmap/config.toml` under `root`. A missing file yields the
    /// defaults; a malformed one is an error.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Self::default()
        };
        if config.project.root_path.as_os_str().is_empty() {
            config.project.root_path = root.to_path_buf();
        } else if config.project.root_path.is_relative() {
            config.project.root_path = root.join(&config.project.root_path);
        }
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// User excludes plus the defaults, de-duplicated, user order first.
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for pattern in self
            .exclude
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_EXCLUDES.iter().copied())
        {
            let pattern = pattern.trim();
            if !pattern.is_empty() && !merged.iter().any(|p| p == pattern) {
                merged.push(pattern.to_string());
            }
        }
        merged
    }

    pub fn project_name(&self) -> String {
        self.project.name.clone().unwrap_or_else(|| {
            let root = self
                .project
                .root_path
                .canonicalize()
                .unwrap_or_else(|_| self.project.root_path.clone());
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        })
    }

    /// Reject configurations that cannot drive an indexing run. Nothing is
    /// read or walked before this passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.root_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("project.root_path"));
        }
        if !self.project.root_path.exists() {
            return Err(ConfigError::RootNotFound(self.project.root_path.clone()));
        }
        if self.project.languages.is_empty() {
            return Err(ConfigError::MissingField("project.languages"));
        }
        if self.project.natural_language.trim().is_empty() {
            return Err(ConfigError::MissingField("project.natural_language"));
        }
        if self.general.max_file_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "general.max_file_size",
                value: "0".to_string(),
                range: "> 0",
            });
        }
        if self.general.concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                field: "general.concurrency",
                value: "0".to_string(),
                range: ">= 1",
            });
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::OutOfRange {
                field: "ai.temperature",
                value: self.ai.temperature.to_string(),
                range: "[0, 2]",
            });
        }
        if self.ai.batch_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "ai.batch_size",
                value: "0".to_string(),
                range: ">= 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn valid(root: &Path) -> DocmapConfig {
        let mut config = DocmapConfig::for_root(root);
        config.project.languages = vec!["javascript".into()];
        config
    }

    #[test]
    fn test_default_config() {
        let config = DocmapConfig::default();
        assert!(config.include.is_empty());
        assert!(config.general.use_gitignore);
        assert!(config.general.ignore_hidden);
        assert!(!config.general.follow_symlinks);
        assert_eq!(config.project.natural_language, "en");
        assert!(!config.ai.enabled);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let config = DocmapConfig::load(temp.path()).expect("defaults");
        assert_eq!(config.project.root_path, temp.path());
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).expect("create .docmap");
        let mut file = std::fs::File::create(dir.join(CONFIG_FILE)).expect("create config");
        writeln!(
            file,
            r#"
include = ["src"]
exclude = ["generated", "node_modules"]

[project]
languages = ["typescript"]
framework = "React"
natural_language = "de"

[general]
max_file_size = 2048
ignore_hidden = false

[ai]
temperature = 1.5
"#
        )
        .expect("write config");

        let config = DocmapConfig::load(temp.path()).expect("parse");
        assert_eq!(config.include, vec!["src".to_string()]);
        assert_eq!(config.project.languages, vec!["typescript".to_string()]);
        assert_eq!(config.project.framework.as_deref(), Some("React"));
        assert_eq!(config.project.natural_language, "de");
        assert_eq!(config.general.max_file_size, 2048);
        assert!(!config.general.ignore_hidden);
        assert!(config.general.use_gitignore);
        assert!((config.ai.temperature - 1.5).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).expect("create .docmap");
        std::fs::write(dir.join(CONFIG_FILE), "include = [unterminated").expect("write");
        assert!(matches!(
            DocmapConfig::load(temp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn effective_excludes_merge_defaults_once() {
        let mut config = DocmapConfig::default();
        config.exclude = vec!["generated".into(), "node_modules".into()];
        let merged = config.effective_excludes();
        assert_eq!(merged[0], "generated");
        assert_eq!(merged.iter().filter(|p| *p == "node_modules").count(), 1);
        for default in DEFAULT_EXCLUDES {
            assert!(merged.iter().any(|p| p == default));
        }
    }

    #[test]
    fn validate_rejects_bad_values() {
        let temp = TempDir::new().expect("temp dir");

        let mut config = valid(temp.path());
        config.ai.temperature = 2.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "ai.temperature",
                ..
            })
        ));

        let mut config = valid(temp.path());
        config.project.languages.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("project.languages"))
        ));

        let config = valid(&temp.path().join("missing"));
        assert!(matches!(config.validate(), Err(ConfigError::RootNotFound(_))));

        let config = DocmapConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField("project.root_path"))
        ));

        assert!(valid(temp.path()).validate().is_ok());
    }
}
