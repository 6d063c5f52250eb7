//! Full markdown documentation, with optional splitting at `## ` sections.

use crate::types::{FileNode, FolderNode, MAX_COMPLEXITY, ProjectIndex};

use super::mindmap::complexity_badge;
use super::{DEFAULT_TREE_DEPTH, RenderOptions, group_by_type};

const SECTIONS: [&str; 5] = [
    "Overview",
    "Architecture",
    "Files",
    "Appendix A: Dependencies",
    "Appendix B: Complexity Distribution",
];
const HISTOGRAM_WIDTH: usize = 30;
const LIST_LIMIT: usize = 8;

/// GitHub-style heading anchor.
pub fn anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

fn joined_or(items: impl IntoIterator<Item = impl AsRef<str>>, empty: &str) -> String {
    let items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn code_list(items: &[String]) -> String {
    let mut shown: Vec<String> = items.iter().take(LIST_LIMIT).map(|i| format!("`{i}`")).collect();
    if items.len() > LIST_LIMIT {
        shown.push(format!("+{} more", items.len() - LIST_LIMIT));
    }
    shown.join(", ")
}

/// Free text as a blockquote. Descriptions come from doc comments or
/// generated text, so no line of theirs may open a heading or a fence.
fn quote(text: &str) -> String {
    let mut out = String::new();
    for line in text.trim_end().lines() {
        if line.trim().is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str(&format!("> {line}\n"));
        }
    }
    out.push('\n');
    out
}

pub fn render(index: &ProjectIndex, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_title(&mut out, index);
    write_contents(&mut out);
    write_overview(&mut out, index);
    write_architecture(&mut out, index, options);
    write_files(&mut out, index, options);
    write_dependencies(&mut out, index);
    write_histogram(&mut out, index);
    out
}

fn write_title(out: &mut String, index: &ProjectIndex) {
    out.push_str(&format!("# {} Documentation\n\n", index.project.name));
    if let Some(description) = &index.project.description {
        out.push_str(&quote(description));
    }
    out.push_str(&format!(
        "_Generated {} from {} files in {} folders._\n\n",
        index.metadata.indexed_at.format("%Y-%m-%d %H:%M UTC"),
        index.metadata.total_files,
        index.metadata.total_folders
    ));
}

fn write_contents(out: &mut String) {
    out.push_str("## Table of Contents\n\n");
    for (i, section) in SECTIONS.iter().enumerate() {
        out.push_str(&format!("{}. [{section}](#{})\n", i + 1, anchor(section)));
    }
    out.push('\n');
}

fn write_overview(out: &mut String, index: &ProjectIndex) {
    let meta = &index.metadata;
    let analysis = &index.analysis;
    out.push_str(&format!("## {}\n\n", SECTIONS[0]));
    out.push_str("| Metric | Value |\n|---|---|\n");
    out.push_str(&format!("| Files | {} |\n", meta.total_files));
    out.push_str(&format!("| Folders | {} |\n", meta.total_folders));
    out.push_str(&format!("| Total size | {} bytes |\n", meta.total_size_bytes));
    out.push_str(&format!(
        "| Languages | {} |\n",
        joined_or(
            meta.languages.iter().map(|(lang, n)| format!("{lang} ({n})")),
            "none"
        )
    ));
    out.push_str(&format!(
        "| Tests | {} test files, {:.1}% estimated coverage |\n",
        analysis.test_coverage.test_file_count, analysis.test_coverage.estimated_percentage
    ));
    out.push_str(&format!(
        "| Documentation | {} doc files, {:.0}% of sources documented inline |\n",
        analysis.documentation.doc_file_count,
        analysis.documentation.ratio * 100.0
    ));
    out.push('\n');
    if !analysis.entry_points.is_empty() {
        out.push_str(&format!(
            "**Entry points:** {}\n\n",
            code_list(&analysis.entry_points)
        ));
    }
}

fn write_architecture(out: &mut String, index: &ProjectIndex, options: &RenderOptions) {
    let analysis = &index.analysis;
    out.push_str(&format!("## {}\n\n", SECTIONS[1]));
    out.push_str(&format!(
        "- **Patterns:** {}\n",
        joined_or(&analysis.architecture_patterns, "Unknown")
    ));
    out.push_str(&format!(
        "- **Frameworks:** {}\n",
        joined_or(&analysis.frameworks, "none detected")
    ));
    out.push_str(&format!(
        "- **Design patterns:** {}\n\n",
        joined_or(&analysis.design_patterns, "none detected")
    ));
    if let Some(summary) = &analysis.architecture_summary {
        out.push_str(&quote(summary));
    }

    let bounded = RenderOptions {
        max_depth: Some(options.max_depth.unwrap_or(DEFAULT_TREE_DEPTH)),
        ..options.clone()
    };
    out.push_str("```text\n");
    out.push_str(&format!("{}/\n", index.project.name));
    write_tree(out, &index.root, "", &bounded);
    out.push_str("```\n\n");
}

fn write_tree(out: &mut String, folder: &FolderNode, prefix: &str, options: &RenderOptions) {
    if !options.expands(folder) {
        return;
    }
    let files: Vec<&FileNode> = folder.files.iter().filter(|f| options.keeps(f)).collect();
    let folders: Vec<&FolderNode> = folder
        .folders
        .iter()
        .filter(|f| options.shows_folder(f))
        .collect();
    let total = files.len() + folders.len();

    for (i, file) in files.iter().enumerate() {
        let branch = if i + 1 == total { "└── " } else { "├── " };
        out.push_str(&format!("{prefix}{branch}{}\n", file.name));
    }
    for (i, child) in folders.iter().enumerate() {
        let last = files.len() + i + 1 == total;
        let (branch, next) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!("{prefix}{branch}{}/\n", child.name));
        write_tree(out, child, &format!("{prefix}{next}"), options);
    }
}

fn write_files(out: &mut String, index: &ProjectIndex, options: &RenderOptions) {
    out.push_str(&format!("## {}\n\n", SECTIONS[2]));
    let files = options.selected_files(index);
    if files.is_empty() {
        out.push_str("No files matched.\n\n");
        return;
    }
    for (ty, mut group) in group_by_type(&files) {
        group.sort_by(|a, b| b.complexity.cmp(&a.complexity));
        out.push_str(&format!("### {} ({})\n\n", ty.title(), group.len()));
        for file in group {
            write_file_entry(out, file);
        }
    }
}

fn write_file_entry(out: &mut String, file: &FileNode) {
    out.push_str(&format!("#### `{}`\n\n", file.relative_path));
    if let Some(description) = &file.description {
        out.push_str(&quote(description));
    }
    out.push_str(&format!("- **Language:** {}\n", file.language));
    out.push_str(&format!("- **Lines:** {}\n", file.line_count));
    match complexity_badge(file.complexity) {
        Some(badge) => out.push_str(&format!(
            "- **Complexity:** {}/{MAX_COMPLEXITY} {badge}\n",
            file.complexity
        )),
        None => out.push_str(&format!(
            "- **Complexity:** {}/{MAX_COMPLEXITY}\n",
            file.complexity
        )),
    }
    if let Some(meta) = &file.extracted_metadata {
        for (label, items) in [
            ("Classes", &meta.classes),
            ("Functions", &meta.functions),
            ("Exports", &meta.exports),
            ("Imports", &meta.imports),
        ] {
            if !items.is_empty() {
                out.push_str(&format!("- **{label}:** {}\n", code_list(items)));
            }
        }
    }
    out.push('\n');
}

fn write_dependencies(out: &mut String, index: &ProjectIndex) {
    let deps = &index.analysis.dependencies;
    out.push_str(&format!("## {}\n\n", SECTIONS[3]));
    for (title, set) in [("External", &deps.external), ("Internal", &deps.internal)] {
        out.push_str(&format!("### {title} ({})\n\n", set.len()));
        if set.is_empty() {
            out.push_str("_None._\n\n");
            continue;
        }
        for dep in set {
            out.push_str(&format!("- `{dep}`\n"));
        }
        out.push('\n');
    }
}

fn write_histogram(out: &mut String, index: &ProjectIndex) {
    let distribution = &index.metadata.complexity_distribution;
    let peak = distribution.iter().copied().max().unwrap_or(0).max(1);
    out.push_str(&format!("## {}\n\n", SECTIONS[4]));
    out.push_str("| Score | Files | |\n|---|---|---|\n");
    for (i, count) in distribution.iter().enumerate() {
        let width = count * HISTOGRAM_WIDTH / peak;
        out.push_str(&format!("| {} | {count} | {} |\n", i + 1, "█".repeat(width)));
    }
}

/// Byte offsets where `## ` sections start. Headings inside fenced code
/// blocks are ignored.
fn section_starts(document: &str) -> Vec<usize> {
    let mut starts = vec![0];
    let mut offset = 0;
    let mut in_fence = false;
    for line in document.split_inclusive('\n') {
        if line.starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence && offset > 0 && line.starts_with("## ") {
            starts.push(offset);
        }
        offset += line.len();
    }
    starts
}

/// Split `document` into parts of at most `budget` bytes, cutting only at
/// `## ` section boundaries. A section larger than the budget becomes a part
/// of its own. Concatenating the parts gives back `document`.
pub fn split_at_sections(document: &str, budget: usize) -> Vec<String> {
    let mut bounds = section_starts(document);
    bounds.push(document.len());

    let mut parts = Vec::new();
    let mut current = String::new();
    for window in bounds.windows(2) {
        let section = &document[window[0]..window[1]];
        if !current.is_empty() && current.len() + section.len() > budget {
            parts.push(std::mem::take(&mut current));
        }
        current.push_str(section);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
