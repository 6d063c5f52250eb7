//! Project-wide structural analysis.
//!
//! Everything here is derived from the file and folder lists alone and is
//! recomputed in full on each run.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::analyzer::coverage::{documentation_stats, test_coverage};
use crate::analyzer::frameworks::{SignalTables, detect_design_patterns, detect_frameworks};
use crate::analyzer::metadata::is_internal_import;
use crate::types::{DependencySets, FileNode, FolderNode, StructuralAnalysis};

pub const UNKNOWN_ARCHITECTURE: &str = "Unknown";

const ENTRY_STEMS: &[&str] = &["main", "index", "app", "server"];
const ENTRY_NAMES: &[&str] = &["lib.rs", "__main__.py"];
const MAX_ENTRY_DEPTH: usize = 2;

/// An architecture label and the folder names that must all be present.
struct FolderSetRule {
    label: &'static str,
    required: &'static [&'static str],
}

const FOLDER_SET_RULES: &[FolderSetRule] = &[
    FolderSetRule {
        label: "MVC",
        required: &["models", "views", "controllers"],
    },
    FolderSetRule {
        label: "Layered",
        required: &["services", "repositories"],
    },
    FolderSetRule {
        label: "Clean Architecture",
        required: &["entities", "usecases"],
    },
    FolderSetRule {
        label: "Hexagonal",
        required: &["ports", "adapters"],
    },
];

/// Architecture labels implied by folder names. Several may apply; an
/// empty match yields `"Unknown"`.
pub fn detect_architecture(folders: &[&FolderNode]) -> BTreeSet<String> {
    // The root's own name says nothing about its layout.
    let discovered: Vec<&FolderNode> = folders.iter().copied().filter(|f| f.depth > 0).collect();
    let names: HashSet<String> = discovered
        .iter()
        .map(|f| f.name.to_ascii_lowercase())
        .collect();

    let mut patterns = BTreeSet::new();
    for rule in FOLDER_SET_RULES {
        if rule.required.iter().all(|r| names.contains(*r)) {
            patterns.insert(rule.label.to_string());
        }
    }

    let service_folders = discovered
        .iter()
        .filter(|f| f.name.to_ascii_lowercase().contains("service"))
        .count();
    if service_folders > 2 {
        patterns.insert("Microservices".to_string());
    }

    let feature_based = discovered.iter().any(|f| {
        matches!(f.name.to_ascii_lowercase().as_str(), "features" | "modules") && f.folders.len() >= 2
    });
    if feature_based {
        patterns.insert("Feature-based".to_string());
    }

    if patterns.is_empty() {
        patterns.insert(UNKNOWN_ARCHITECTURE.to_string());
    }
    patterns
}

/// Conventional entry files (`main.*`, `index.*`, `app.*`, `server.*`,
/// `lib.rs`, `__main__.py`) no deeper than two folders below the root.
pub fn detect_entry_points(files: &[&FileNode]) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.relative_path.matches('/').count() <= MAX_ENTRY_DEPTH)
        .filter(|f| {
            let name = f.name.to_ascii_lowercase();
            ENTRY_NAMES.contains(&name.as_str())
                || (f.language.is_programming()
                    && ENTRY_STEMS.contains(&f.stem().to_ascii_lowercase().as_str()))
        })
        .map(|f| f.relative_path.clone())
        .collect()
}

/// Project-wide dependency sets. Imports starting with `.` or `/` are
/// internal, everything else external; both keep the specifier verbatim.
/// Manifest dependencies join the external set.
pub fn collect_dependencies(files: &[&FileNode]) -> DependencySets {
    let mut sets = DependencySets::default();
    for file in files {
        let Some(meta) = file.extracted_metadata.as_ref() else {
            continue;
        };
        for import in &meta.imports {
            if is_internal_import(import) {
                sets.internal.insert(import.clone());
            } else {
                sets.external.insert(import.clone());
            }
        }
        sets.external.extend(meta.dependencies.iter().cloned());
    }
    sets
}

/// One-line summary used until (or unless) generated text replaces it.
pub fn architecture_summary(analysis: &StructuralAnalysis, file_count: usize) -> String {
    let patterns: Vec<&str> = analysis
        .architecture_patterns
        .iter()
        .map(String::as_str)
        .collect();
    let mut summary = if patterns == [UNKNOWN_ARCHITECTURE] {
        format!("{file_count} files with no recognised architecture pattern")
    } else {
        format!("{} layout across {file_count} files", patterns.join(" + "))
    };
    if !analysis.frameworks.is_empty() {
        let frameworks: Vec<&str> = analysis.frameworks.iter().map(String::as_str).collect();
        summary.push_str(&format!(", built with {}", frameworks.join(", ")));
    }
    summary.push('.');
    summary
}

/// Structural analyzer with injectable signal tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct Analyzer {
    tables: SignalTables,
}

impl Analyzer {
    pub fn new(tables: SignalTables) -> Self {
        Self { tables }
    }

    pub fn analyze(&self, files: &[&FileNode], folders: &[&FolderNode]) -> StructuralAnalysis {
        let mut analysis = StructuralAnalysis {
            architecture_patterns: detect_architecture(folders),
            frameworks: detect_frameworks(files, self.tables.frameworks),
            design_patterns: detect_design_patterns(files, self.tables.patterns),
            entry_points: detect_entry_points(files),
            test_coverage: test_coverage(files),
            documentation: documentation_stats(files),
            dependencies: collect_dependencies(files),
            architecture_summary: None,
        };
        analysis.architecture_summary = Some(architecture_summary(&analysis, files.len()));
        debug!(
            architecture = ?analysis.architecture_patterns,
            frameworks = analysis.frameworks.len(),
            external_deps = analysis.dependencies.external.len(),
            "structural analysis complete"
        );
        analysis
    }
}

/// Analyze with the built-in signal tables.
pub fn analyze(files: &[&FileNode], folders: &[&FolderNode]) -> StructuralAnalysis {
    Analyzer::default().analyze(files, folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractedMetadata, Language, SemanticType};
    use std::path::PathBuf;

    fn folder(rel: &str) -> FolderNode {
        FolderNode::new(
            PathBuf::from("/p").join(rel),
            rel.to_string(),
            rel.split('/').count(),
            true,
        )
    }

    fn file(rel: &str, semantic_type: SemanticType) -> FileNode {
        FileNode {
            path: PathBuf::from("/p").join(rel),
            relative_path: rel.to_string(),
            name: rel.rsplit('/').next().unwrap_or(rel).to_string(),
            extension: "js".into(),
            language: Language::JavaScript,
            semantic_type,
            size_bytes: 1,
            line_count: 1,
            complexity: 1,
            last_modified: None,
            extracted_metadata: None,
            doc_comment: None,
            description: None,
        }
    }

    fn labels(folders: &[FolderNode]) -> Vec<String> {
        let refs: Vec<&FolderNode> = folders.iter().collect();
        detect_architecture(&refs).into_iter().collect()
    }

    #[test]
    fn mvc_needs_all_three_folders() {
        let mut folders = vec![folder("src"), folder("src/models"), folder("src/controllers")];
        assert_eq!(labels(&folders), vec!["Unknown"]);
        folders.push(folder("src/views"));
        assert_eq!(labels(&folders), vec!["MVC"]);
    }

    #[test]
    fn several_patterns_can_co_occur() {
        let folders = vec![
            folder("services"),
            folder("repositories"),
            folder("entities"),
            folder("usecases"),
            folder("ports"),
            folder("adapters"),
        ];
        assert_eq!(
            labels(&folders),
            vec!["Clean Architecture", "Hexagonal", "Layered"]
        );
    }

    #[test]
    fn microservices_needs_more_than_two_service_folders() {
        let mut folders = vec![folder("auth-service"), folder("billing-service")];
        assert_eq!(labels(&folders), vec!["Unknown"]);
        folders.push(folder("user-service"));
        assert_eq!(labels(&folders), vec!["Microservices"]);
    }

    #[test]
    fn feature_folders_need_two_children() {
        let mut features = folder("src/features");
        features.folders.push(folder("src/features/auth"));
        assert_eq!(labels(std::slice::from_ref(&features)), vec!["Unknown"]);
        features.folders.push(folder("src/features/cart"));
        assert_eq!(labels(&[features]), vec!["Feature-based"]);
    }

    #[test]
    fn root_name_is_ignored() {
        let root = FolderNode::new(PathBuf::from("/work/models"), String::new(), 0, true);
        let folders = vec![root, folder("views"), folder("controllers")];
        assert_eq!(labels(&folders), vec!["Unknown"]);
    }

    #[test]
    fn entry_points_by_name_and_depth() {
        let files = [
            file("index.js", SemanticType::Module),
            file("src/main.rs", SemanticType::Module),
            file("src/lib.rs", SemanticType::Module),
            file("a/b/c/main.js", SemanticType::Module),
            file("src/app.js", SemanticType::Module),
            file("src/util.js", SemanticType::Utility),
        ];
        let refs: Vec<&FileNode> = files.iter().collect();
        assert_eq!(
            detect_entry_points(&refs),
            vec!["index.js", "src/main.rs", "src/lib.rs", "src/app.js"]
        );
    }

    #[test]
    fn dependencies_partition_on_leading_dot_or_slash() {
        let mut a = file("src/a.js", SemanticType::Module);
        a.extracted_metadata = Some(ExtractedMetadata {
            imports: vec![
                "react".into(),
                "./b".into(),
                "/abs/c".into(),
                "lodash/fp".into(),
            ],
            ..Default::default()
        });
        let mut b = file("src/b.js", SemanticType::Module);
        b.extracted_metadata = Some(ExtractedMetadata {
            imports: vec!["react".into(), "../shared".into()],
            ..Default::default()
        });
        let deps = collect_dependencies(&[&a, &b]);
        assert_eq!(
            deps.external.into_iter().collect::<Vec<_>>(),
            vec!["lodash/fp", "react"]
        );
        assert_eq!(
            deps.internal.into_iter().collect::<Vec<_>>(),
            vec!["../shared", "./b", "/abs/c"]
        );
    }

    #[test]
    fn crate_paths_are_external_and_kept_whole() {
        let mut a = file("src/lib.rs", SemanticType::Module);
        a.extracted_metadata = Some(ExtractedMetadata {
            imports: vec!["crate::config".into(), "lodash/fp".into()],
            dependencies: vec!["serde".into()],
            ..Default::default()
        });
        let deps = collect_dependencies(&[&a]);
        assert_eq!(
            deps.external.into_iter().collect::<Vec<_>>(),
            vec!["crate::config", "lodash/fp", "serde"]
        );
        assert!(deps.internal.is_empty());
    }

    #[test]
    fn analyze_assembles_everything() {
        let files = [
            file("src/controllers/UserController.js", SemanticType::Controller),
            file("tests/user.test.js", SemanticType::Test),
        ];
        let folders = [
            FolderNode::new(PathBuf::from("/p"), String::new(), 0, true),
            folder("src"),
            folder("src/controllers"),
            folder("tests"),
        ];
        let file_refs: Vec<&FileNode> = files.iter().collect();
        let folder_refs: Vec<&FolderNode> = folders.iter().collect();
        let analysis = analyze(&file_refs, &folder_refs);
        assert!(analysis.test_coverage.has_tests);
        assert!(analysis.architecture_patterns.contains(UNKNOWN_ARCHITECTURE));
        assert_eq!(
            analysis.architecture_summary.as_deref(),
            Some("2 files with no recognised architecture pattern.")
        );
    }
}
