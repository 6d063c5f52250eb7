//! Command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::config::DocmapConfig;
use crate::detect::apply_detected_stack;
use crate::indexer::{IndexOptions, build_index};
use crate::progress::{Status, format_bytes, format_count, format_duration};
use crate::render::{
    self, OutputFormat, PandocRenderer, PdfOutcome, RenderOptions, Rendered, write_pdf,
};
use crate::textgen::Generator;
use crate::types::{ProjectIndex, SemanticType};

use super::command::{Command, GenerateArgs, GlobalOptions, ScanArgs};

pub async fn dispatch(command: Command, global: &GlobalOptions) -> Result<()> {
    match command {
        Command::Scan(args) => run_scan(&args, global).await,
        Command::Generate(args) => run_generate(&args, global).await,
    }
}

/// Config for `root`: file values, then CLI overrides, then stack detection
/// for an empty language list. The positional root always wins over
/// `project.root_path`.
pub fn load_config(root: &Path, global: &GlobalOptions) -> Result<DocmapConfig> {
    let mut config = match &global.config {
        Some(path) => DocmapConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DocmapConfig::load(root)
            .with_context(|| format!("loading config under {}", root.display()))?,
    };
    config.project.root_path = root.to_path_buf();

    config.include.extend(global.include.iter().cloned());
    config.exclude.extend(global.exclude.iter().cloned());
    if global.no_gitignore {
        config.general.use_gitignore = false;
    }
    if global.hidden {
        config.general.ignore_hidden = false;
    }
    if global.follow_symlinks {
        config.general.follow_symlinks = true;
    }
    if let Some(max) = global.max_file_size {
        config.general.max_file_size = max;
    }
    if global.ai {
        config.ai.enabled = true;
    }
    apply_detected_stack(&mut config);
    Ok(config)
}

async fn index_project(root: &Path, global: &GlobalOptions, status: Status) -> Result<ProjectIndex> {
    let config = load_config(root, global)?;
    let generator = Generator::from_config(&config.ai).context("creating text-generation client")?;
    let options = IndexOptions {
        read_content: !global.no_content,
        ..IndexOptions::default()
    };

    let spinner = status.spinner(&format!("Indexing {}", root.display()));
    let index = build_index(&config, &generator, &options)
        .await
        .with_context(|| format!("indexing {}", root.display()))?;
    spinner.finish_clear();

    status.success(&format!(
        "Indexed {} and {} in {}",
        format_count(index.metadata.total_files, "file", "files"),
        format_count(index.metadata.total_folders, "folder", "folders"),
        format_duration(std::time::Duration::from_millis(index.metadata.duration_ms))
    ));
    if !index.metadata.warnings.is_empty() {
        status.warning(&format!(
            "{} while indexing",
            format_count(index.metadata.warnings.len(), "warning", "warnings")
        ));
    }
    Ok(index)
}

async fn run_scan(args: &ScanArgs, global: &GlobalOptions) -> Result<()> {
    // Keep stderr quiet when stdout carries JSON.
    let status = Status::new(global.quiet || args.json);
    let index = index_project(&args.root, global, status).await?;
    if args.json {
        println!("{}", render::json::render(&index)?);
    } else {
        print!("{}", summary(&index));
    }
    Ok(())
}

/// Plain-text scan summary.
pub fn summary(index: &ProjectIndex) -> String {
    let meta = &index.metadata;
    let analysis = &index.analysis;
    let mut out = format!("{}\n", index.project.name);
    out.push_str(&format!(
        "  files:        {} ({})\n",
        meta.total_files,
        format_bytes(meta.total_size_bytes)
    ));
    out.push_str(&format!("  folders:      {}\n", meta.total_folders));
    let languages: Vec<String> = meta
        .languages
        .iter()
        .map(|(lang, n)| format!("{lang} {n}"))
        .collect();
    out.push_str(&format!("  languages:    {}\n", list_or_dash(&languages)));
    let patterns: Vec<String> = analysis.architecture_patterns.iter().cloned().collect();
    out.push_str(&format!("  architecture: {}\n", list_or_dash(&patterns)));
    let frameworks: Vec<String> = analysis.frameworks.iter().cloned().collect();
    out.push_str(&format!("  frameworks:   {}\n", list_or_dash(&frameworks)));
    out.push_str(&format!(
        "  tests:        {} files, {:.1}% estimated coverage\n",
        analysis.test_coverage.test_file_count, analysis.test_coverage.estimated_percentage
    ));
    out.push_str(&format!(
        "  docs:         {} files, {:.0}% of sources documented\n",
        analysis.documentation.doc_file_count,
        analysis.documentation.ratio * 100.0
    ));
    out.push_str(&format!("  warnings:     {}\n", meta.warnings.len()));
    out
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn parse_types(raw: &[String]) -> Result<Option<Vec<SemanticType>>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut types = Vec::new();
    for name in raw {
        match SemanticType::parse(name) {
            Some(ty) => types.push(ty),
            None => bail!("unknown file type `{name}`"),
        }
    }
    Ok(Some(types))
}

/// `docs.md` → `docs-1.md`, `docs-2.md`, …
pub fn part_paths(output: &Path, count: usize) -> Vec<PathBuf> {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "docs".to_string());
    (1..=count)
        .map(|n| output.with_file_name(format!("{stem}-{n}.md")))
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

async fn run_generate(args: &GenerateArgs, global: &GlobalOptions) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;
    let options = RenderOptions {
        max_depth: args.max_depth,
        types_only: parse_types(&args.types)?,
        max_file_size_bytes: args.split_size,
    };
    let status = Status::new(global.quiet || args.output.is_none());
    let index = index_project(&args.root, global, status).await?;
    let rendered = render::render(&index, format, &options)?;
    debug!(%format, "rendered");

    if format == OutputFormat::Pdf {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.pdf", index.project.name)));
        let status = Status::new(global.quiet);
        match write_pdf(&rendered.joined(), &output, &PandocRenderer::default())? {
            PdfOutcome::Pdf(path) => status.success(&format!("Wrote {}", path.display())),
            PdfOutcome::MarkdownFallback { path, reason } => {
                status.warning(&format!(
                    "PDF rendering failed ({reason}); wrote markdown to {}",
                    path.display()
                ));
            }
        }
        return Ok(());
    }

    match (rendered, &args.output) {
        (Rendered::Text(text), Some(path)) => {
            write_file(path, &text)?;
            status.success(&format!("Wrote {}", path.display()));
        }
        (Rendered::Text(text), None) => print!("{text}"),
        (Rendered::Parts(parts), output) => {
            let base = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{}.md", index.project.name)));
            let paths = part_paths(&base, parts.len());
            for (path, part) in paths.iter().zip(&parts) {
                write_file(path, part)?;
            }
            Status::new(global.quiet).success(&format!(
                "Wrote {} ({})",
                format_count(parts.len(), "part", "parts"),
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn part_names_are_numbered() {
        let paths = part_paths(Path::new("out/docs.md"), 3);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("out/docs-1.md"),
                PathBuf::from("out/docs-2.md"),
                PathBuf::from("out/docs-3.md"),
            ]
        );
    }

    #[test]
    fn type_names_are_validated() {
        assert!(parse_types(&[]).expect("empty").is_none());
        assert_eq!(
            parse_types(&["Controller".into(), "test".into()]).expect("types"),
            Some(vec![SemanticType::Controller, SemanticType::Test])
        );
        assert!(parse_types(&["widget".into()]).is_err());
    }

    #[test]
    fn cli_flags_override_config_file() {
        let tmp = TempDir::new().expect("tmp");
        std::fs::create_dir(tmp.path().join(".docmap")).expect("mkdir");
        std::fs::write(
            tmp.path().join(".docmap/config.toml"),
            "exclude = [\"generated\"]\n[project]\nlanguages = [\"python\"]\n[general]\nmax_file_size = 2048\n",
        )
        .expect("write");

        let global = GlobalOptions {
            exclude: vec!["fixtures".into()],
            no_gitignore: true,
            hidden: true,
            max_file_size: Some(64),
            ..GlobalOptions::default()
        };
        let config = load_config(tmp.path(), &global).expect("config");
        assert_eq!(config.project.root_path, tmp.path());
        assert_eq!(config.exclude, vec!["generated", "fixtures"]);
        assert_eq!(config.project.languages, vec!["python"]);
        assert_eq!(config.general.max_file_size, 64);
        assert!(!config.general.use_gitignore);
        assert!(!config.general.ignore_hidden);
        assert!(!config.ai.enabled);
    }

    #[test]
    fn languages_are_detected_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        std::fs::write(tmp.path().join("Cargo.toml"), "[package]\n").expect("write");
        let config = load_config(tmp.path(), &GlobalOptions::default()).expect("config");
        assert_eq!(config.project.languages, vec!["rust"]);
        assert_eq!(config.exclude, vec!["target"]);
    }

    #[tokio::test]
    async fn summary_lists_totals() {
        let tmp = TempDir::new().expect("tmp");
        std::fs::create_dir_all(tmp.path().join("src")).expect("mkdir");
        std::fs::write(tmp.path().join("package.json"), "{}").expect("write");
        std::fs::write(tmp.path().join("src/index.js"), "export const a = 1;\n").expect("write");
        let global = GlobalOptions {
            quiet: true,
            ..GlobalOptions::default()
        };
        let index = index_project(tmp.path(), &global, Status::new(true))
            .await
            .expect("index");
        let text = summary(&index);
        assert!(text.contains("  files:        2 ("));
        assert!(text.contains("  folders:      1\n"));
        assert!(text.contains("javascript 1"));
        assert!(text.contains("  warnings:     0\n"));
    }
}
