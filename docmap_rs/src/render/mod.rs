//! Document renderers.
//!
//! Every renderer is a pure function of a [`ProjectIndex`] and
//! [`RenderOptions`]; none of them mutates the index. Writing results to
//! disk (and the PDF hand-off) is left to the caller.

use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;
use crate::types::{FileNode, FolderNode, ProjectIndex, SemanticType};

pub mod api_spec;
pub mod dot;
pub mod json;
pub mod markdown;
pub mod mermaid;
pub mod mindmap;
pub mod pdf;

pub use markdown::split_at_sections;
pub use pdf::{PandocRenderer, PdfOutcome, PdfRenderer, write_pdf};

/// Depth of the textual tree in the architecture section when no
/// `max_depth` is given.
pub const DEFAULT_TREE_DEPTH: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    MindMap,
    Mermaid,
    Dot,
    Markdown,
    ApiSpec,
    Json,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::MindMap,
        OutputFormat::Mermaid,
        OutputFormat::Dot,
        OutputFormat::Markdown,
        OutputFormat::ApiSpec,
        OutputFormat::Json,
        OutputFormat::Pdf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::MindMap => "mindmap",
            OutputFormat::Mermaid => "mermaid",
            OutputFormat::Dot => "dot",
            OutputFormat::Markdown => "markdown",
            OutputFormat::ApiSpec => "api-spec",
            OutputFormat::Json => "json",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// File extension for the default output path.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::MindMap | OutputFormat::Mermaid | OutputFormat::Markdown => "md",
            OutputFormat::Dot => "dot",
            OutputFormat::ApiSpec => "yaml",
            OutputFormat::Json => "json",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    /// An empty string means full markdown documentation.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "markdown" | "md" | "docs" => Ok(OutputFormat::Markdown),
            "mindmap" | "mind-map" => Ok(OutputFormat::MindMap),
            "mermaid" => Ok(OutputFormat::Mermaid),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "api-spec" | "api" | "yaml" => Ok(OutputFormat::ApiSpec),
            "json" => Ok(OutputFormat::Json),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(RenderError::UnknownFormat(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Deepest folder level expanded by tree-shaped outputs.
    pub max_depth: Option<usize>,
    /// Keep only files of these semantic types.
    pub types_only: Option<Vec<SemanticType>>,
    /// Byte budget for one markdown part; larger documents are split.
    pub max_file_size_bytes: Option<usize>,
}

impl RenderOptions {
    pub fn keeps(&self, file: &FileNode) -> bool {
        self.types_only
            .as_ref()
            .is_none_or(|types| types.contains(&file.semantic_type))
    }

    /// Whether children of `folder` are shown.
    pub fn expands(&self, folder: &FolderNode) -> bool {
        self.max_depth.is_none_or(|max| folder.depth < max)
    }

    /// Folders are hidden under a type filter when nothing below them
    /// survives it.
    pub fn shows_folder(&self, folder: &FolderNode) -> bool {
        self.types_only.is_none() || folder.all_files().iter().any(|f| self.keeps(f))
    }

    pub fn selected_files<'a>(&self, index: &'a ProjectIndex) -> Vec<&'a FileNode> {
        index.files().into_iter().filter(|f| self.keeps(f)).collect()
    }
}

/// Output of one render call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    /// Markdown split at section boundaries, in order.
    Parts(Vec<String>),
}

impl Rendered {
    /// The parts joined back into one document.
    pub fn joined(&self) -> String {
        match self {
            Rendered::Text(text) => text.clone(),
            Rendered::Parts(parts) => parts.concat(),
        }
    }
}

/// Render `index` as `format`.
///
/// `Pdf` yields the unsplit markdown that the PDF renderer consumes; the
/// conversion itself happens in [`write_pdf`].
pub fn render(
    index: &ProjectIndex,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<Rendered, RenderError> {
    let rendered = match format {
        OutputFormat::MindMap => Rendered::Text(mindmap::render(index, options)),
        OutputFormat::Mermaid => Rendered::Text(mermaid::render(index, options)),
        OutputFormat::Dot => Rendered::Text(dot::render(index, options)),
        OutputFormat::Markdown => {
            let document = markdown::render(index, options);
            match options.max_file_size_bytes {
                Some(budget) if document.len() > budget => {
                    Rendered::Parts(split_at_sections(&document, budget))
                }
                _ => Rendered::Text(document),
            }
        }
        OutputFormat::ApiSpec => Rendered::Text(api_spec::render(index, options)?),
        OutputFormat::Json => Rendered::Text(json::render(index)?),
        OutputFormat::Pdf => Rendered::Text(markdown::render(index, options)),
    };
    Ok(rendered)
}

/// Files grouped by semantic type, in [`SemanticType::ALL`] order, empty
/// groups dropped. Within a group files keep preorder.
pub(crate) fn group_by_type<'a>(
    files: &[&'a FileNode],
) -> Vec<(SemanticType, Vec<&'a FileNode>)> {
    SemanticType::ALL
        .into_iter()
        .filter_map(|ty| {
            let group: Vec<&FileNode> = files
                .iter()
                .copied()
                .filter(|f| f.semantic_type == ty)
                .collect();
            (!group.is_empty()).then_some((ty, group))
        })
        .collect()
}

/// Highest-complexity files first; ties keep their original order.
pub(crate) fn sample<'a>(files: &[&'a FileNode], limit: usize) -> Vec<&'a FileNode> {
    let mut sorted = files.to_vec();
    sorted.sort_by(|a, b| b.complexity.cmp(&a.complexity));
    sorted.truncate(limit);
    sorted
}
