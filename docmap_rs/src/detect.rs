//! Stack detection for configs that do not declare their languages.
//!
//! Looks for marker files at the project root:
//! - Cargo.toml → Rust
//! - tsconfig.json / package.json → TypeScript / JavaScript
//! - pyproject.toml / requirements.txt / setup.py → Python
//! - go.mod → Go
//! - pom.xml / build.gradle → Java
//! - Gemfile → Ruby, composer.json → PHP, pubspec.yaml → Dart
//!
//! With no markers, the extensions of files directly under the root and
//! `src/` decide.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::analyzer::Classifier;
use crate::config::DocmapConfig;

struct Marker {
    files: &'static [&'static str],
    language: &'static str,
    ignores: &'static [&'static str],
}

const MARKERS: &[Marker] = &[
    Marker {
        files: &["Cargo.toml"],
        language: "rust",
        ignores: &["target"],
    },
    Marker {
        files: &["tsconfig.json"],
        language: "typescript",
        ignores: &["node_modules", "dist"],
    },
    Marker {
        files: &["package.json"],
        language: "javascript",
        ignores: &["node_modules", "dist"],
    },
    Marker {
        files: &["pyproject.toml", "requirements.txt", "setup.py"],
        language: "python",
        ignores: &[".venv", "venv", "__pycache__", "*.egg-info"],
    },
    Marker {
        files: &["go.mod"],
        language: "go",
        ignores: &["vendor"],
    },
    Marker {
        files: &["pom.xml", "build.gradle", "build.gradle.kts"],
        language: "java",
        ignores: &["target", ".gradle"],
    },
    Marker {
        files: &["Gemfile"],
        language: "ruby",
        ignores: &[],
    },
    Marker {
        files: &["composer.json"],
        language: "php",
        ignores: &["vendor"],
    },
    Marker {
        files: &["pubspec.yaml"],
        language: "dart",
        ignores: &[".dart_tool"],
    },
];

/// Result of stack detection
#[derive(Clone, Debug, Default)]
pub struct DetectedStack {
    /// Language names, marker-detected first.
    pub languages: Vec<String>,
    /// Build-output folders that the detected stacks produce.
    pub ignores: Vec<String>,
    /// Human-readable description of detected stack
    pub description: String,
}

impl DetectedStack {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Detect project stack from root directory
pub fn detect_stack(root: &Path) -> DetectedStack {
    let mut result = DetectedStack::default();

    for marker in MARKERS {
        if marker.files.iter().any(|f| root.join(f).exists()) {
            push_unique(&mut result.languages, marker.language);
            for ignore in marker.ignores {
                push_unique(&mut result.ignores, ignore);
            }
        }
    }

    if result.languages.is_empty() {
        result.languages = languages_by_extension(root);
    }

    if !result.languages.is_empty() {
        result.description = format!("Detected: {}", result.languages.join(" + "));
    }
    result
}

/// Programming languages of the files directly under `root` and `root/src`,
/// most frequent first.
fn languages_by_extension(root: &Path) -> Vec<String> {
    let classifier = Classifier::default();
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for dir in [root.to_path_buf(), root.join("src")] {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(language) = classifier.language_for_name(&name)
                && language.is_programming()
            {
                *counts.entry(language.name()).or_default() += 1;
            }
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    ranked.into_iter().map(|(name, _)| name.to_string()).collect()
}

/// Fill `project.languages` when the config leaves it empty. Detected
/// ignores are merged into `exclude` only when the user gave none.
pub fn apply_detected_stack(config: &mut DocmapConfig) {
    if !config.project.languages.is_empty() {
        return;
    }
    let detected = detect_stack(&config.project.root_path);
    if detected.is_empty() {
        return;
    }
    debug!("{}", detected.description);
    config.project.languages = detected.languages;
    if config.exclude.is_empty() {
        config.exclude = detected.ignores;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_rust_project() {
        let tmp = TempDir::new().expect("create temp dir");
        std::fs::write(tmp.path().join("Cargo.toml"), "[package]\nname = \"test\"")
            .expect("write Cargo.toml");

        let detected = detect_stack(tmp.path());

        assert_eq!(detected.languages, vec!["rust".to_string()]);
        assert!(detected.ignores.contains(&"target".to_string()));
        assert_eq!(detected.description, "Detected: rust");
    }

    #[test]
    fn test_detect_mixed_project() {
        let tmp = TempDir::new().expect("create temp dir");
        std::fs::write(tmp.path().join("tsconfig.json"), "{}").expect("write tsconfig.json");
        std::fs::write(tmp.path().join("package.json"), "{}").expect("write package.json");
        std::fs::write(tmp.path().join("requirements.txt"), "flask\n").expect("write reqs");

        let detected = detect_stack(tmp.path());

        assert_eq!(
            detected.languages,
            vec!["typescript", "javascript", "python"]
        );
        assert_eq!(
            detected
                .ignores
                .iter()
                .filter(|i| *i == "node_modules")
                .count(),
            1
        );
    }

    #[test]
    fn test_detect_by_extension_without_markers() {
        let tmp = TempDir::new().expect("create temp dir");
        std::fs::create_dir(tmp.path().join("src")).expect("create src");
        std::fs::write(tmp.path().join("src/a.py"), "").expect("write");
        std::fs::write(tmp.path().join("src/b.py"), "").expect("write");
        std::fs::write(tmp.path().join("run.sh"), "").expect("write");
        std::fs::write(tmp.path().join("notes.md"), "").expect("write");

        let detected = detect_stack(tmp.path());

        assert_eq!(detected.languages, vec!["python", "shell"]);
        assert!(detected.ignores.is_empty());
    }

    #[test]
    fn test_detect_empty_project() {
        let tmp = TempDir::new().expect("create temp dir");
        assert!(detect_stack(tmp.path()).is_empty());
    }

    #[test]
    fn test_apply_keeps_declared_languages() {
        let tmp = TempDir::new().expect("create temp dir");
        std::fs::write(tmp.path().join("go.mod"), "module x\n").expect("write go.mod");

        let mut config = DocmapConfig::for_root(tmp.path());
        config.project.languages = vec!["rust".into()];
        apply_detected_stack(&mut config);
        assert_eq!(config.project.languages, vec!["rust".to_string()]);

        let mut config = DocmapConfig::for_root(tmp.path());
        apply_detected_stack(&mut config);
        assert_eq!(config.project.languages, vec!["go".to_string()]);
        assert_eq!(config.exclude, vec!["vendor".to_string()]);

        let mut config = DocmapConfig::for_root(tmp.path());
        config.exclude = vec!["generated".into()];
        apply_detected_stack(&mut config);
        assert_eq!(config.exclude, vec!["generated".to_string()]);
    }
}
