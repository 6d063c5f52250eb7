//! Markdown mind map: a bullet tree of folders and files.

use crate::types::{FileNode, FolderNode, ProjectIndex};

use super::RenderOptions;

const HIGH_COMPLEXITY: u8 = 7;
const MEDIUM_COMPLEXITY: u8 = 4;

/// Badge for files above the complexity thresholds.
pub fn complexity_badge(complexity: u8) -> Option<&'static str> {
    if complexity > HIGH_COMPLEXITY {
        Some("🔴 high")
    } else if complexity > MEDIUM_COMPLEXITY {
        Some("🟡 medium")
    } else {
        None
    }
}

pub fn render(index: &ProjectIndex, options: &RenderOptions) -> String {
    let mut out = format!("# {} Mind Map\n\n", index.project.name);
    write_folder(&mut out, &index.root, &index.project.name, 0, options);
    out
}

fn write_folder(
    out: &mut String,
    folder: &FolderNode,
    label: &str,
    indent: usize,
    options: &RenderOptions,
) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!("{pad}- 📁 **{label}/**"));
    if let Some(description) = &folder.description {
        out.push_str(&format!(" _{description}_"));
    }
    out.push('\n');

    if !options.expands(folder) {
        return;
    }
    for file in folder.files.iter().filter(|f| options.keeps(f)) {
        write_file(out, file, indent + 1);
    }
    for child in folder.folders.iter().filter(|f| options.shows_folder(f)) {
        write_folder(out, child, &child.name, indent + 1, options);
    }
}

fn write_file(out: &mut String, file: &FileNode, indent: usize) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!(
        "{pad}- {} `{}` ({})",
        file.semantic_type.icon(),
        file.name,
        file.semantic_type
    ));
    if let Some(description) = &file.description {
        out.push_str(&format!(": {description}"));
    }
    if let Some(badge) = complexity_badge(file.complexity) {
        out.push_str(&format!(" {badge}"));
    }
    out.push('\n');
}
