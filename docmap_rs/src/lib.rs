//! # docmap
//!
//! **Project indexer and documentation renderer.** docmap walks a source
//! tree, classifies every file by language and role, scores its structural
//! complexity, derives project-wide facts (architecture, frameworks, test and
//! documentation coverage, dependencies) and renders the result as markdown
//! documentation, a mind map, Mermaid or DOT diagrams, a YAML API outline,
//! JSON or PDF.
//!
//! ## Features
//!
//! - **Filtered walk** - include/exclude globs, `.gitignore`, hidden files, depth and size limits
//! - **Heuristic classification** - an ordered rule table decides each file's semantic type
//! - **Complexity scoring** - a bounded 1-10 score from length, branching and nesting
//! - **Structural analysis** - architecture patterns, frameworks and design patterns
//! - **Optional text generation** - descriptions from an OpenAI-compatible endpoint
//! - **Renderers** - markdown (with splitting), mind map, Mermaid, DOT, YAML, JSON, PDF
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use docmap::config::DocmapConfig;
//! use docmap::indexer::{IndexOptions, build_index};
//! use docmap::render::{OutputFormat, RenderOptions, render};
//! use docmap::textgen::Generator;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut config = DocmapConfig::load(std::path::Path::new("."))?;
//! docmap::detect::apply_detected_stack(&mut config);
//!
//! let index = build_index(&config, &Generator::Disabled, &IndexOptions::default()).await?;
//! let doc = render(&index, OutputFormat::Markdown, &RenderOptions::default())?;
//! println!("{}", doc.joined());
//! # Ok(())
//! # }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! docmap scan                                   # summary of the current project
//! docmap scan --json > index.json               # full index
//! docmap generate --format mermaid              # diagram on stdout
//! docmap generate -o docs/PROJECT.md --split-size 200000
//! ```

// ============================================================================
// Model
// ============================================================================

/// Index data model: [`FileNode`](types::FileNode), [`FolderNode`](types::FolderNode),
/// [`ProjectIndex`](types::ProjectIndex) and the analysis records.
pub mod types;

/// Error taxonomy and non-fatal [`ScanWarning`](error::ScanWarning)s.
pub mod error;

/// `.docmap/config.toml` loading, defaults and validation.
pub mod config;

// ============================================================================
// Indexing
// ============================================================================

/// Classifier, complexity scorer, metadata extraction and structural analysis.
///
/// # Submodules
///
/// - [`analyzer::classify`] - language table and semantic rule chain
/// - [`analyzer::complexity`] - 1-10 complexity score
/// - [`analyzer::metadata`] - regex extraction of imports, exports, classes, functions
/// - [`analyzer::frameworks`] - framework and design-pattern signals
/// - [`analyzer::coverage`] - test and documentation ratios
/// - [`analyzer::structure`] - architecture detection and the analyzer entry point
pub mod analyzer;

/// Path filter and ignore-file helpers.
pub mod fs_utils;

/// Directory walker (cheap pass, no file content).
pub mod tree;

/// Marker-file stack detection for configs without languages.
pub mod detect;

/// Concurrent content pass and batched text generation.
pub mod enrich;

/// Text-generation collaborator.
pub mod textgen;

/// One indexing run from config to [`ProjectIndex`](types::ProjectIndex).
pub mod indexer;

// ============================================================================
// Output
// ============================================================================

/// Document renderers.
pub mod render;

/// Spinners and status lines for the CLI.
pub mod progress;

/// Command-line interface.
pub mod cli;

pub use config::DocmapConfig;
pub use error::{ConfigError, IndexError, RenderError, ScanWarning, TextGenError};
pub use indexer::{IndexOptions, build_index};
pub use render::{OutputFormat, RenderOptions, Rendered, render};
pub use types::{FileNode, FolderNode, ProjectIndex, SemanticType, StructuralAnalysis};
