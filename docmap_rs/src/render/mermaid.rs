//! Mermaid flowchart: project root → semantic categories → sample files.

use crate::types::ProjectIndex;

use super::{RenderOptions, group_by_type, sample};

pub const SAMPLE_PER_CATEGORY: usize = 5;

fn label(text: &str) -> String {
    text.replace('"', "#quot;")
}

pub fn render(index: &ProjectIndex, options: &RenderOptions) -> String {
    let files = options.selected_files(index);
    let mut out = String::from("```mermaid\ngraph TD\n");
    out.push_str(&format!("    root[\"📁 {}\"]\n", label(&index.project.name)));

    for (ty, group) in group_by_type(&files) {
        let category = format!("cat_{}", ty.name());
        out.push_str(&format!(
            "    root --> {category}[\"{} {} ({})\"]\n",
            ty.icon(),
            ty.title(),
            group.len()
        ));
        let picked = sample(&group, SAMPLE_PER_CATEGORY);
        for (i, file) in picked.iter().enumerate() {
            out.push_str(&format!(
                "    {category} --> {category}_{i}[\"{}\"]\n",
                label(&file.name)
            ));
        }
        if group.len() > picked.len() {
            out.push_str(&format!(
                "    {category} --> {category}_more[\"+{} more\"]\n",
                group.len() - picked.len()
            ));
        }
    }
    out.push_str("```\n");
    out
}
