//! In-memory model of one indexing run.
//!
//! The folder tree is owned top-down: every [`FolderNode`] owns its child
//! files and folders, and nothing points back up. Flattened views are
//! preorder traversals over that tree, so each node has exactly one owner.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;

pub const MIN_COMPLEXITY: u8 = 1;
pub const MAX_COMPLEXITY: u8 = 10;

/// Programming or markup language, resolved from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Go,
    Java,
    Kotlin,
    Swift,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Scala,
    Dart,
    Shell,
    Sql,
    Html,
    Css,
    Scss,
    Vue,
    Svelte,
    Json,
    Yaml,
    Toml,
    Xml,
    Markdown,
    Text,
    Unknown,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Swift => "swift",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Scala => "scala",
            Language::Dart => "dart",
            Language::Shell => "shell",
            Language::Sql => "sql",
            Language::Html => "html",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Vue => "vue",
            Language::Svelte => "svelte",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Xml => "xml",
            Language::Markdown => "markdown",
            Language::Text => "text",
            Language::Unknown => "unknown",
        }
    }

    /// True for languages that carry executable logic (as opposed to markup,
    /// styles or data).
    pub fn is_programming(&self) -> bool {
        matches!(
            self,
            Language::JavaScript
                | Language::TypeScript
                | Language::Python
                | Language::Rust
                | Language::Go
                | Language::Java
                | Language::Kotlin
                | Language::Swift
                | Language::C
                | Language::Cpp
                | Language::CSharp
                | Language::Ruby
                | Language::Php
                | Language::Scala
                | Language::Dart
                | Language::Shell
                | Language::Vue
                | Language::Svelte
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Heuristic role of a file inside the project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Class,
    Module,
    Component,
    Service,
    Controller,
    Model,
    Utility,
    Test,
    Config,
    Readme,
    Documentation,
    Script,
    Style,
    Template,
    Data,
    Other,
}

impl SemanticType {
    pub const ALL: [SemanticType; 16] = [
        SemanticType::Class,
        SemanticType::Module,
        SemanticType::Component,
        SemanticType::Service,
        SemanticType::Controller,
        SemanticType::Model,
        SemanticType::Utility,
        SemanticType::Test,
        SemanticType::Config,
        SemanticType::Readme,
        SemanticType::Documentation,
        SemanticType::Script,
        SemanticType::Style,
        SemanticType::Template,
        SemanticType::Data,
        SemanticType::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SemanticType::Class => "class",
            SemanticType::Module => "module",
            SemanticType::Component => "component",
            SemanticType::Service => "service",
            SemanticType::Controller => "controller",
            SemanticType::Model => "model",
            SemanticType::Utility => "utility",
            SemanticType::Test => "test",
            SemanticType::Config => "config",
            SemanticType::Readme => "readme",
            SemanticType::Documentation => "documentation",
            SemanticType::Script => "script",
            SemanticType::Style => "style",
            SemanticType::Template => "template",
            SemanticType::Data => "data",
            SemanticType::Other => "other",
        }
    }

    /// Plural heading used by grouped renderers.
    pub fn title(&self) -> &'static str {
        match self {
            SemanticType::Class => "Classes",
            SemanticType::Module => "Modules",
            SemanticType::Component => "Components",
            SemanticType::Service => "Services",
            SemanticType::Controller => "Controllers",
            SemanticType::Model => "Models",
            SemanticType::Utility => "Utilities",
            SemanticType::Test => "Tests",
            SemanticType::Config => "Configuration",
            SemanticType::Readme => "Readmes",
            SemanticType::Documentation => "Documentation",
            SemanticType::Script => "Scripts",
            SemanticType::Style => "Styles",
            SemanticType::Template => "Templates",
            SemanticType::Data => "Data",
            SemanticType::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SemanticType::Class => "🧱",
            SemanticType::Module => "📦",
            SemanticType::Component => "🧩",
            SemanticType::Service => "⚙️",
            SemanticType::Controller => "🎮",
            SemanticType::Model => "🗃️",
            SemanticType::Utility => "🔧",
            SemanticType::Test => "🧪",
            SemanticType::Config => "🛠️",
            SemanticType::Readme => "📖",
            SemanticType::Documentation => "📝",
            SemanticType::Script => "📜",
            SemanticType::Style => "🎨",
            SemanticType::Template => "🖼️",
            SemanticType::Data => "📊",
            SemanticType::Other => "📄",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.name() == lower)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Regex-derived facts about a file's source. Best effort: the extractors
/// are line patterns, not a parser, so they may miss or over-match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub dependencies: Vec<String>,
}

impl ExtractedMetadata {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.exports.is_empty()
            && self.classes.is_empty()
            && self.functions.is_empty()
            && self.dependencies.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub path: PathBuf,
    pub relative_path: String,
    pub name: String,
    pub extension: String,
    pub language: Language,
    pub semantic_type: SemanticType,
    pub size_bytes: u64,
    pub line_count: usize,
    pub complexity: u8,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_metadata: Option<ExtractedMetadata>,
    /// Leading doc comment, when the enrichment pass found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileNode {
    pub fn stem(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn imports(&self) -> &[String] {
        self.extracted_metadata
            .as_ref()
            .map(|m| m.imports.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub path: PathBuf,
    pub relative_path: String,
    pub name: String,
    pub depth: usize,
    pub included: bool,
    pub files: Vec<FileNode>,
    pub folders: Vec<FolderNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FolderNode {
    pub fn new(path: PathBuf, relative_path: String, depth: usize, included: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            relative_path,
            name,
            depth,
            included,
            files: Vec::new(),
            folders: Vec::new(),
            description: None,
        }
    }

    /// Preorder list of every file in this subtree.
    pub fn all_files(&self) -> Vec<&FileNode> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileNode>) {
        out.extend(self.files.iter());
        for folder in &self.folders {
            folder.collect_files(out);
        }
    }

    /// Preorder list of this folder and every folder beneath it.
    pub fn all_folders(&self) -> Vec<&FolderNode> {
        let mut out = Vec::new();
        self.collect_folders(&mut out);
        out
    }

    fn collect_folders<'a>(&'a self, out: &mut Vec<&'a FolderNode>) {
        out.push(self);
        for folder in &self.folders {
            folder.collect_folders(out);
        }
    }

    /// Mutable handles to every file in the subtree. Handles are disjoint,
    /// so they can be enriched concurrently.
    pub fn files_mut(&mut self) -> Vec<&mut FileNode> {
        let mut out = Vec::new();
        Self::collect_files_mut(self, &mut out);
        out
    }

    fn collect_files_mut<'a>(folder: &'a mut FolderNode, out: &mut Vec<&'a mut FileNode>) {
        let FolderNode { files, folders, .. } = folder;
        out.extend(files.iter_mut());
        for child in folders.iter_mut() {
            Self::collect_files_mut(child, out);
        }
    }

    /// Visits this folder, then every descendant, in preorder.
    pub fn visit_folders_mut(&mut self, visit: &mut dyn FnMut(&mut FolderNode)) {
        visit(self);
        for child in &mut self.folders {
            child.visit_folders_mut(visit);
        }
    }

    pub fn total_size(&self) -> u64 {
        self.all_files().iter().map(|f| f.size_bytes).sum()
    }
}

/// Project identity carried into every renderer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub root_path: PathBuf,
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    pub natural_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCoverage {
    pub test_file_count: usize,
    pub source_file_count: usize,
    pub estimated_percentage: f64,
    pub has_tests: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationStats {
    pub doc_file_count: usize,
    pub files_with_inline_docs_count: usize,
    pub ratio: f64,
    pub has_readme: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySets {
    pub external: BTreeSet<String>,
    pub internal: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralAnalysis {
    pub architecture_patterns: BTreeSet<String>,
    pub frameworks: BTreeSet<String>,
    pub design_patterns: BTreeSet<String>,
    pub entry_points: Vec<String>,
    pub test_coverage: TestCoverage,
    pub documentation: DocumentationStats,
    pub dependencies: DependencySets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_summary: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingMetadata {
    pub total_files: usize,
    pub total_folders: usize,
    pub total_size_bytes: u64,
    pub indexed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub languages: BTreeMap<String, usize>,
    /// Index `i` holds the number of files scored `i + 1`.
    pub complexity_distribution: [usize; MAX_COMPLEXITY as usize],
    pub warnings: Vec<ScanWarning>,
}

impl IndexingMetadata {
    pub fn from_tree(root: &FolderNode, warnings: Vec<ScanWarning>) -> Self {
        let files = root.all_files();
        let mut languages: BTreeMap<String, usize> = BTreeMap::new();
        let mut complexity_distribution = [0usize; MAX_COMPLEXITY as usize];
        for file in &files {
            *languages.entry(file.language.name().to_string()).or_default() += 1;
            let bucket = file.complexity.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY) as usize - 1;
            complexity_distribution[bucket] += 1;
        }
        Self {
            total_files: files.len(),
            // The root is a container, not a discovered folder.
            total_folders: root.all_folders().len().saturating_sub(1),
            total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
            indexed_at: Utc::now(),
            duration_ms: 0,
            languages,
            complexity_distribution,
            warnings,
        }
    }
}

/// Aggregate result of one indexing run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIndex {
    pub project: ProjectInfo,
    pub root: FolderNode,
    pub analysis: StructuralAnalysis,
    pub metadata: IndexingMetadata,
}

impl ProjectIndex {
    /// Flattened file list (preorder over the tree).
    pub fn files(&self) -> Vec<&FileNode> {
        self.root.all_files()
    }

    /// Flattened folder list (preorder, root first).
    pub fn folders(&self) -> Vec<&FolderNode> {
        self.root.all_folders()
    }
}
