//! Command-line definitions. The [`Cli`] struct is the source of truth for
//! flags, subcommands and help output.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "docmap")]
#[command(about = "Index a source tree and render documentation, mind maps and diagrams")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Walk and output options accepted by every subcommand. Values given here
/// override `.docmap/config.toml`.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Only index files matching this pattern (repeatable)
    #[arg(long, global = true, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip paths matching this pattern (repeatable)
    #[arg(long, global = true, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Do not read .gitignore
    #[arg(long, global = true)]
    pub no_gitignore: bool,

    /// Index hidden files and folders
    #[arg(long, global = true)]
    pub hidden: bool,

    /// Follow symbolic links
    #[arg(long, global = true)]
    pub follow_symlinks: bool,

    /// Skip files larger than this many bytes
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Skip the content pass (no line counts, complexity or metadata)
    #[arg(long, global = true)]
    pub no_content: bool,

    /// Ask the configured text-generation endpoint for descriptions
    #[arg(long, global = true)]
    pub ai: bool,

    /// Config file to use instead of <ROOT>/.docmap/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Suppress spinners and status lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a project and print a summary
    Scan(ScanArgs),

    /// Index a project and render a document
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Project root
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Print the full index as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Project root
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// mindmap, mermaid, dot, markdown, api-spec, json or pdf
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Output file; stdout when omitted (required for pdf and split output)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Split markdown into parts of at most this many bytes
    #[arg(long, value_name = "BYTES")]
    pub split_size: Option<usize>,

    /// Deepest folder level shown in tree-shaped output
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Only render files of these types (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "TYPES")]
    pub types: Vec<String>,
}
