//! Directory walker (the cheap pass).
//!
//! Builds the owned folder/file tree without reading file content. Children
//! keep the order the directory listing returned them in. A single
//! unreadable entry becomes a warning; only a missing or unreadable root
//! fails the walk.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::analyzer::Classifier;
use crate::config::DocmapConfig;
use crate::error::{IndexError, ScanWarning, WarningKind};
use crate::fs_utils::{PathFilter, Verdict};
use crate::types::{FileNode, FolderNode, MIN_COMPLEXITY};

#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Folders at this depth are recorded but not expanded. The root is 0.
    pub max_depth: usize,
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&DocmapConfig::default())
    }
}

impl ScanOptions {
    /// Walk options for `config`, with the default excludes merged in.
    pub fn from_config(config: &DocmapConfig) -> Self {
        Self {
            max_depth: config.general.max_depth,
            include_hidden: !config.general.ignore_hidden,
            follow_symlinks: config.general.follow_symlinks,
            include: config.include.clone(),
            exclude: config.effective_excludes(),
            max_file_size: config.general.max_file_size,
        }
    }

    pub fn filter(&self) -> PathFilter {
        PathFilter::new(&self.include, &self.exclude, self.include_hidden)
    }
}

#[derive(Debug)]
pub struct ScanResult {
    pub root: FolderNode,
    pub warnings: Vec<ScanWarning>,
}

/// Walk `root` with the built-in classifier tables.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanResult, IndexError> {
    scan_with(root, options, &Classifier::default())
}

pub fn scan_with(
    root: &Path,
    options: &ScanOptions,
    classifier: &Classifier,
) -> Result<ScanResult, IndexError> {
    let metadata = fs::metadata(root).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => IndexError::RootMissing(root.to_path_buf()),
        _ => IndexError::RootUnreadable {
            path: root.to_path_buf(),
            source: err,
        },
    })?;
    if !metadata.is_dir() {
        return Err(IndexError::RootUnreadable {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
        });
    }
    let root_canon = root
        .canonicalize()
        .map_err(|source| IndexError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
    // Listing the root is the one read that is allowed to be fatal.
    let entries = read_entries(&root_canon).map_err(|source| IndexError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut walker = Walker {
        options,
        filter: options.filter(),
        classifier,
        visited: HashSet::from([root_canon.clone()]),
        warnings: Vec::new(),
    };
    let mut root_node = FolderNode::new(root_canon, String::new(), 0, true);
    if options.max_depth > 0 {
        walker.fill(&mut root_node, entries);
    }

    debug!(
        files = root_node.all_files().len(),
        folders = root_node.all_folders().len() - 1,
        warnings = walker.warnings.len(),
        "walk complete"
    );
    Ok(ScanResult {
        root: root_node,
        warnings: walker.warnings,
    })
}

fn read_entries(dir: &Path) -> io::Result<Vec<io::Result<fs::DirEntry>>> {
    Ok(fs::read_dir(dir)?.collect())
}

fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

struct Walker<'a> {
    options: &'a ScanOptions,
    filter: PathFilter,
    classifier: &'a Classifier,
    visited: HashSet<PathBuf>,
    warnings: Vec<ScanWarning>,
}

impl Walker<'_> {
    fn warn(&mut self, path: &str, kind: WarningKind, message: impl Into<String>) {
        let warning = ScanWarning::new(path, kind, message);
        warn!(path = %warning.path, kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    fn fill(&mut self, folder: &mut FolderNode, entries: Vec<io::Result<fs::DirEntry>>) {
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let parent = folder.relative_path.clone();
                    self.warn(&parent, WarningKind::Unreadable, err.to_string());
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = join_relative(&folder.relative_path, &name);
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    self.warn(&relative, WarningKind::Unreadable, err.to_string());
                    continue;
                }
            };

            let metadata = if file_type.is_symlink() {
                if !self.options.follow_symlinks {
                    debug!(path = %relative, "symlink skipped");
                    continue;
                }
                match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(err) => {
                        self.warn(&relative, WarningKind::Symlink, format!("broken symlink: {err}"));
                        continue;
                    }
                }
            } else {
                match entry.metadata() {
                    Ok(metadata) => metadata,
                    Err(err) => {
                        self.warn(&relative, WarningKind::Unreadable, err.to_string());
                        continue;
                    }
                }
            };

            if metadata.is_dir() {
                self.visit_dir(folder, path, relative);
            } else if metadata.is_file() {
                self.visit_file(folder, path, relative, name, &metadata);
            }
        }
    }

    fn visit_dir(&mut self, parent: &mut FolderNode, path: PathBuf, relative: String) {
        let verdict = self.filter.decide(&relative, true);
        if verdict.prunes() {
            debug!(path = %relative, ?verdict, "directory pruned");
            return;
        }

        let canonical = match path.canonicalize() {
            Ok(canonical) => canonical,
            Err(err) => {
                self.warn(&relative, WarningKind::Unreadable, err.to_string());
                return;
            }
        };
        if !self.visited.insert(canonical) {
            self.warn(&relative, WarningKind::Symlink, "directory already visited (symlink cycle)");
            return;
        }

        let mut child = FolderNode::new(
            path,
            relative,
            parent.depth + 1,
            verdict == Verdict::Included,
        );
        if child.depth < self.options.max_depth {
            match read_entries(&child.path) {
                Ok(entries) => self.fill(&mut child, entries),
                Err(err) => {
                    let rel = child.relative_path.clone();
                    self.warn(&rel, WarningKind::Unreadable, err.to_string());
                }
            }
        }
        parent.folders.push(child);
    }

    fn visit_file(
        &mut self,
        parent: &mut FolderNode,
        path: PathBuf,
        relative: String,
        name: String,
        metadata: &fs::Metadata,
    ) {
        if !self.filter.decide(&relative, false).is_included() {
            return;
        }
        if metadata.len() > self.options.max_file_size {
            self.warn(
                &relative,
                WarningKind::TooLarge,
                format!(
                    "{} bytes exceeds the {} byte limit",
                    metadata.len(),
                    self.options.max_file_size
                ),
            );
            return;
        }
        let Some(classification) = self.classifier.classify(&relative, None) else {
            debug!(path = %relative, "unsupported file type dropped");
            return;
        };
        debug!(
            path = %relative,
            rule = self.classifier.matching_rule(&relative).unwrap_or("none"),
            semantic_type = classification.semantic_type.name(),
            "classified"
        );

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        parent.files.push(FileNode {
            path,
            relative_path: relative,
            name,
            extension,
            language: classification.language,
            semantic_type: classification.semantic_type,
            size_bytes: metadata.len(),
            line_count: 0,
            complexity: MIN_COMPLEXITY,
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            extracted_metadata: None,
            doc_comment: None,
            description: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SemanticType;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    fn file_set(result: &ScanResult) -> BTreeSet<String> {
        result
            .root
            .all_files()
            .iter()
            .map(|f| f.relative_path.clone())
            .collect()
    }

    fn folder_set(result: &ScanResult) -> BTreeSet<String> {
        result
            .root
            .all_folders()
            .iter()
            .map(|f| f.relative_path.clone())
            .collect()
    }

    #[test]
    fn walks_and_classifies() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "src/models/User.js", "class User {}\n");
        write(tmp.path(), "src/controllers/UserController.js", "if (a) {}\n");
        write(tmp.path(), "tests/user.test.js", "test('x')\n");
        write(tmp.path(), "logo.png", "\u{0}PNG");

        let result = scan(tmp.path(), &ScanOptions::default()).expect("scan");
        assert_eq!(
            file_set(&result),
            BTreeSet::from([
                "src/controllers/UserController.js".to_string(),
                "src/models/User.js".to_string(),
                "tests/user.test.js".to_string(),
            ])
        );
        let controller = result
            .root
            .all_files()
            .into_iter()
            .find(|f| f.name == "UserController.js")
            .expect("controller");
        assert_eq!(controller.semantic_type, SemanticType::Controller);
        assert_eq!(controller.complexity, MIN_COMPLEXITY);
        assert_eq!(controller.line_count, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn excluded_and_hidden_directories_are_pruned() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "node_modules/lib/index.js", "x");
        write(tmp.path(), ".cache/a.js", "x");
        write(tmp.path(), "src/index.js", "x");

        let result = scan(tmp.path(), &ScanOptions::default()).expect("scan");
        assert_eq!(file_set(&result), BTreeSet::from(["src/index.js".to_string()]));
        assert_eq!(
            folder_set(&result),
            BTreeSet::from([String::new(), "src".to_string()])
        );
    }

    #[test]
    fn oversized_files_are_skipped_with_a_warning() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "big.js", &"x".repeat(100));
        write(tmp.path(), "small.js", "x");
        let options = ScanOptions {
            max_file_size: 10,
            ..ScanOptions::default()
        };
        let result = scan(tmp.path(), &options).expect("scan");
        assert_eq!(file_set(&result), BTreeSet::from(["small.js".to_string()]));
        assert_eq!(result.root.total_size(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::TooLarge);
    }

    #[test]
    fn depth_limit_records_but_does_not_expand() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "a/b/c/deep.js", "x");
        write(tmp.path(), "a/top.js", "x");
        let options = ScanOptions {
            max_depth: 2,
            ..ScanOptions::default()
        };
        let result = scan(tmp.path(), &options).expect("scan");
        assert_eq!(
            folder_set(&result),
            BTreeSet::from([String::new(), "a".to_string(), "a/b".to_string()])
        );
        assert_eq!(file_set(&result), BTreeSet::from(["a/top.js".to_string()]));

        for folder in result.root.all_folders() {
            for child in &folder.folders {
                assert_eq!(child.depth, folder.depth + 1);
            }
        }
    }

    #[test]
    fn include_patterns_gate_files_only() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "src/app.js", "x");
        write(tmp.path(), "docs/guide.md", "x");
        let options = ScanOptions {
            include: vec!["*.js".into()],
            ..ScanOptions::default()
        };
        let result = scan(tmp.path(), &options).expect("scan");
        assert_eq!(file_set(&result), BTreeSet::from(["src/app.js".to_string()]));
        let docs = result
            .root
            .folders
            .iter()
            .find(|f| f.name == "docs")
            .expect("docs recorded");
        assert!(!docs.included);
        assert!(docs.files.is_empty());
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = TempDir::new().expect("tmp");
        let err = scan(&tmp.path().join("nope"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, IndexError::RootMissing(_)));

        write(tmp.path(), "file.js", "x");
        let err = scan(&tmp.path().join("file.js"), &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, IndexError::RootUnreadable { .. }));
    }

    #[test]
    fn walking_twice_is_stable() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "src/a.js", "x");
        write(tmp.path(), "src/b/c.py", "x");
        let first = scan(tmp.path(), &ScanOptions::default()).expect("scan");
        let second = scan(tmp.path(), &ScanOptions::default()).expect("scan");
        assert_eq!(file_set(&first), file_set(&second));
        assert_eq!(folder_set(&first), folder_set(&second));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped_unless_followed() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "real/a.js", "x");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link"))
            .expect("symlink");
        // A loop back to the root.
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("real/up")).expect("symlink");

        let result = scan(tmp.path(), &ScanOptions::default()).expect("scan");
        assert_eq!(file_set(&result), BTreeSet::from(["real/a.js".to_string()]));

        let options = ScanOptions {
            follow_symlinks: true,
            ..ScanOptions::default()
        };
        let followed = scan(tmp.path(), &options).expect("scan");
        // `real` and `link` resolve to the same directory; only one is walked,
        // and the loop back to the root is cut.
        assert_eq!(followed.root.all_files().len(), 1);
        assert!(
            followed
                .warnings
                .iter()
                .all(|w| w.kind == WarningKind::Symlink)
        );
        assert!(!followed.warnings.is_empty());
    }
}
