//! Content enrichment and generated text.
//!
//! The content pass reads every file once, in batches no larger than the
//! configured concurrency, and fills line counts, complexity scores,
//! extracted metadata and doc comments. Each batch holds disjoint `&mut`
//! handles, so no locking is involved. A failed read leaves the file with
//! its cheap-pass values and records a warning.
//!
//! Text generation runs after analysis, in batches of `ai.batch_size` with a
//! pause between batches. Failed requests keep the heuristic text.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::analyzer::Classifier;
use crate::analyzer::complexity;
use crate::analyzer::metadata::{extract_doc_comment, extract_metadata, heuristic_description};
use crate::config::AiConfig;
use crate::error::{ScanWarning, WarningKind};
use crate::textgen::{SubjectKind, TextGenerator, TextRequest};
use crate::types::{FileNode, FolderNode, ProjectIndex, SemanticType};

const PROJECT_KEY: &str = "@project";
const ARCHITECTURE_KEY: &str = "@architecture";
const CONTEXT_LIST_LIMIT: usize = 10;

/// Read and analyse every file under `root`, at most `concurrency` at a
/// time. Returns one warning per file that could not be read.
pub async fn enrich_content(
    root: &mut FolderNode,
    classifier: &Classifier,
    concurrency: usize,
) -> Vec<ScanWarning> {
    let mut files = root.files_mut();
    let mut warnings = Vec::new();
    for batch in files.chunks_mut(concurrency.max(1)) {
        let results = join_all(
            batch
                .iter_mut()
                .map(|file| enrich_file(&mut **file, classifier)),
        )
        .await;
        warnings.extend(results.into_iter().flatten());
    }
    debug!(warnings = warnings.len(), "content pass complete");
    warnings
}

async fn enrich_file(file: &mut FileNode, classifier: &Classifier) -> Option<ScanWarning> {
    let bytes = match tokio::fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %file.relative_path, error = %err, "content read failed");
            return Some(ScanWarning::new(
                file.relative_path.clone(),
                WarningKind::ContentRead,
                err.to_string(),
            ));
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    apply_content(file, &content, classifier);
    None
}

/// Fill the content-derived fields of `file` from `content`.
pub fn apply_content(file: &mut FileNode, content: &str, classifier: &Classifier) {
    file.line_count = content.lines().count();
    file.complexity = complexity::score(content, file.language);

    let metadata = extract_metadata(content, file.language, &file.name);
    file.extracted_metadata = (!metadata.is_empty()).then_some(metadata);
    file.doc_comment = extract_doc_comment(content, file.language);

    if file.semantic_type == SemanticType::Module
        && let Some(found) = classifier.classify(&file.relative_path, Some(content))
    {
        file.semantic_type = found.semantic_type;
    }
}

/// Heuristic one-liner for a folder, from the semantic types beneath it.
pub fn describe_folder(folder: &FolderNode) -> String {
    let files = folder.all_files();
    let subfolders = folder.all_folders().len() - 1;
    if files.is_empty() {
        return match subfolders {
            0 => "Empty folder".to_string(),
            1 => "Groups 1 subfolder".to_string(),
            n => format!("Groups {n} subfolders"),
        };
    }

    let mut counts: HashMap<SemanticType, usize> = HashMap::new();
    for file in &files {
        *counts.entry(file.semantic_type).or_default() += 1;
    }
    // Ties resolve in `SemanticType::ALL` order so the text is stable.
    let dominant = SemanticType::ALL
        .iter()
        .copied()
        .max_by(|a, b| {
            let ca = counts.get(a).copied().unwrap_or(0);
            let cb = counts.get(b).copied().unwrap_or(0);
            ca.cmp(&cb).then_with(|| b.cmp(a))
        })
        .unwrap_or(SemanticType::Other);

    let noun = if files.len() == 1 { "file" } else { "files" };
    format!(
        "{} ({} {noun}) under {}",
        dominant.title(),
        files.len(),
        if folder.relative_path.is_empty() {
            "the project root"
        } else {
            folder.relative_path.as_str()
        }
    )
}

/// Give every file and folder without a description its heuristic text.
pub fn apply_heuristic_descriptions(root: &mut FolderNode) {
    for file in root.files_mut() {
        if file.description.is_none() {
            file.description = Some(heuristic_description(file));
        }
    }
    root.visit_folders_mut(&mut |folder| {
        if folder.description.is_none() {
            folder.description = Some(describe_folder(folder));
        }
    });
}

fn joined(items: &[String]) -> String {
    items
        .iter()
        .take(CONTEXT_LIST_LIMIT)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

fn file_request(file: &FileNode, natural_language: &str) -> TextRequest {
    let mut request = TextRequest::new(SubjectKind::File, &file.relative_path, natural_language)
        .with("type", file.semantic_type.name())
        .with("language", file.language.name())
        .with("lines", file.line_count.to_string())
        .with("complexity", file.complexity.to_string())
        .with("doc", file.doc_comment.clone().unwrap_or_default())
        .with("heuristic", file.description.clone().unwrap_or_default());
    if let Some(meta) = &file.extracted_metadata {
        request = request
            .with("classes", joined(&meta.classes))
            .with("functions", joined(&meta.functions))
            .with("exports", joined(&meta.exports))
            .with("imports", joined(&meta.imports));
    }
    request
}

fn folder_request(folder: &FolderNode, natural_language: &str) -> TextRequest {
    let files: Vec<String> = folder.files.iter().map(|f| f.name.clone()).collect();
    let folders: Vec<String> = folder.folders.iter().map(|f| f.name.clone()).collect();
    TextRequest::new(SubjectKind::Folder, &folder.relative_path, natural_language)
        .with("files", joined(&files))
        .with("subfolders", joined(&folders))
        .with("heuristic", folder.description.clone().unwrap_or_default())
}

fn project_requests(index: &ProjectIndex) -> Vec<(String, TextRequest)> {
    let lang = &index.project.natural_language;
    let set = |s: &std::collections::BTreeSet<String>| s.iter().cloned().collect::<Vec<_>>().join(", ");
    let analysis = &index.analysis;
    let project = TextRequest::new(SubjectKind::Project, &index.project.name, lang)
        .with("languages", index.project.languages.join(", "))
        .with("framework", index.project.framework.clone().unwrap_or_default())
        .with("files", index.metadata.total_files.to_string())
        .with("frameworks", set(&analysis.frameworks))
        .with("entry points", joined(&analysis.entry_points));
    let architecture = TextRequest::new(SubjectKind::Architecture, &index.project.name, lang)
        .with("patterns", set(&analysis.architecture_patterns))
        .with("design patterns", set(&analysis.design_patterns))
        .with("frameworks", set(&analysis.frameworks))
        .with(
            "top folders",
            joined(
                &index
                    .root
                    .folders
                    .iter()
                    .map(|f| f.name.clone())
                    .collect::<Vec<_>>(),
            ),
        )
        .with("heuristic", analysis.architecture_summary.clone().unwrap_or_default());
    vec![
        (PROJECT_KEY.to_string(), project),
        (ARCHITECTURE_KEY.to_string(), architecture),
    ]
}

/// Run `requests` in batches of `batch_size`, sleeping `delay` between
/// batches. Successful replies are returned keyed like the input.
pub async fn run_batches<G: TextGenerator>(
    generator: &G,
    requests: Vec<(String, TextRequest)>,
    batch_size: usize,
    delay: Duration,
) -> (HashMap<String, String>, Vec<ScanWarning>) {
    let mut replies = HashMap::new();
    let mut warnings = Vec::new();
    let batches: Vec<&[(String, TextRequest)]> = requests.chunks(batch_size.max(1)).collect();
    let last = batches.len().saturating_sub(1);

    for (i, batch) in batches.into_iter().enumerate() {
        let results = join_all(batch.iter().map(|(_, request)| generator.generate(request))).await;
        for ((key, _), result) in batch.iter().zip(results) {
            match result {
                Ok(text) => {
                    replies.insert(key.clone(), text);
                }
                Err(err) => {
                    debug!(key = %key, error = %err, "text generation failed, keeping heuristic");
                    warnings.push(ScanWarning::new(
                        key.clone(),
                        WarningKind::TextGeneration,
                        err.to_string(),
                    ));
                }
            }
        }
        if i < last && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    (replies, warnings)
}

/// Replace heuristic descriptions with generated ones where the generator
/// answers. Never fails: every error becomes a warning.
pub async fn generate_text<G: TextGenerator>(
    index: &mut ProjectIndex,
    generator: &G,
    ai: &AiConfig,
) -> Vec<ScanWarning> {
    let lang = index.project.natural_language.clone();
    let delay = Duration::from_millis(ai.batch_delay_ms);

    let mut requests: Vec<(String, TextRequest)> = index
        .files()
        .into_iter()
        .map(|f| (f.relative_path.clone(), file_request(f, &lang)))
        .collect();
    requests.extend(
        index
            .folders()
            .into_iter()
            .filter(|f| f.depth > 0)
            .map(|f| (format!("{}/", f.relative_path), folder_request(f, &lang))),
    );
    requests.extend(project_requests(index));

    let total = requests.len();
    let (mut replies, warnings) = run_batches(generator, requests, ai.batch_size, delay).await;
    if !warnings.is_empty() {
        warn!(
            failed = warnings.len(),
            total, "some descriptions fall back to heuristic text"
        );
    }

    for file in index.root.files_mut() {
        if let Some(text) = replies.remove(&file.relative_path) {
            file.description = Some(text);
        }
    }
    index.root.visit_folders_mut(&mut |folder| {
        if let Some(text) = replies.remove(&format!("{}/", folder.relative_path)) {
            folder.description = Some(text);
        }
    });
    if let Some(text) = replies.remove(PROJECT_KEY) {
        index.project.description = Some(text);
    }
    if let Some(text) = replies.remove(ARCHITECTURE_KEY) {
        index.analysis.architecture_summary = Some(text);
    }
    warnings
}
