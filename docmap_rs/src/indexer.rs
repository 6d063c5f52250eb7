//! One indexing run: validate, walk, enrich, analyse, assemble.
//!
//! The orchestrator is the single writer of the [`ProjectIndex`]. If the
//! walk fails fatally no index is produced at all.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::analyzer::frameworks::SignalTables;
use crate::analyzer::{Analyzer, Classifier};
use crate::config::DocmapConfig;
use crate::enrich::{apply_heuristic_descriptions, enrich_content, generate_text};
use crate::error::IndexError;
use crate::fs_utils::read_ignore_file;
use crate::textgen::TextGenerator;
use crate::tree::{ScanOptions, scan_with};
use crate::types::{IndexingMetadata, ProjectIndex, ProjectInfo};

pub const GITIGNORE_FILE: &str = ".gitignore";

/// Knobs that are not part of the persisted configuration.
#[derive(Clone, Copy)]
pub struct IndexOptions {
    /// Run the content pass (line counts, complexity, metadata).
    pub read_content: bool,
    pub classifier: Classifier,
    pub signals: SignalTables,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            read_content: true,
            classifier: Classifier::default(),
            signals: SignalTables::default(),
        }
    }
}

/// Walk options for `config`, with ignore-file patterns appended to the
/// excludes when `general.use_gitignore` is set.
pub fn scan_options(config: &DocmapConfig) -> ScanOptions {
    let mut options = ScanOptions::from_config(config);
    if config.general.use_gitignore {
        let ignored = read_ignore_file(&config.project.root_path.join(GITIGNORE_FILE));
        debug!(patterns = ignored.len(), "ignore-file patterns merged");
        for pattern in ignored {
            if !options.exclude.contains(&pattern) {
                options.exclude.push(pattern);
            }
        }
    }
    options
}

fn project_info(config: &DocmapConfig, root: &Path) -> ProjectInfo {
    ProjectInfo {
        name: config.project_name(),
        root_path: root.to_path_buf(),
        languages: config.project.languages.clone(),
        framework: config.project.framework.clone(),
        natural_language: config.project.natural_language.clone(),
        description: config.project.description.clone(),
    }
}

/// Build the index for `config`. Configuration and root errors are fatal;
/// everything else is collected as warnings on the index metadata.
#[instrument(skip_all, fields(root = %config.project.root_path.display()))]
pub async fn build_index<G: TextGenerator>(
    config: &DocmapConfig,
    generator: &G,
    options: &IndexOptions,
) -> Result<ProjectIndex, IndexError> {
    config.validate()?;
    let started = Instant::now();

    let scan_opts = scan_options(config);
    let root_path = config.project.root_path.clone();
    let classifier = options.classifier;
    let walked = tokio::task::spawn_blocking(move || scan_with(&root_path, &scan_opts, &classifier))
        .await
        .map_err(|err| IndexError::Runtime(err.to_string()))??;

    let mut root = walked.root;
    let mut warnings = walked.warnings;

    if options.read_content {
        warnings.extend(
            enrich_content(&mut root, &options.classifier, config.general.concurrency).await,
        );
    }
    apply_heuristic_descriptions(&mut root);

    let analysis = {
        let files = root.all_files();
        let folders = root.all_folders();
        Analyzer::new(options.signals).analyze(&files, &folders)
    };

    let project = project_info(config, &root.path);
    let mut index = ProjectIndex {
        project,
        metadata: IndexingMetadata::from_tree(&root, warnings),
        root,
        analysis,
    };

    if generator.is_enabled() {
        let generated = generate_text(&mut index, generator, &config.ai).await;
        index.metadata.warnings.extend(generated);
    }

    index.metadata.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        files = index.metadata.total_files,
        folders = index.metadata.total_folders,
        warnings = index.metadata.warnings.len(),
        duration_ms = index.metadata.duration_ms,
        "index built"
    );
    Ok(index)
}
