//! Graphviz DOT graph with the same category grouping as the Mermaid output.

use crate::types::{ProjectIndex, SemanticType};

use super::{RenderOptions, group_by_type, sample};

pub const SAMPLE_PER_CATEGORY: usize = 3;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn fill_color(ty: SemanticType) -> &'static str {
    match ty {
        SemanticType::Controller => "#ffb703",
        SemanticType::Service => "#8ecae6",
        SemanticType::Model => "#219ebc",
        SemanticType::Component => "#90be6d",
        SemanticType::Test => "#f28482",
        SemanticType::Config => "#adb5bd",
        _ => "#e9ecef",
    }
}

pub fn render(index: &ProjectIndex, options: &RenderOptions) -> String {
    let files = options.selected_files(index);
    let mut out = String::from("digraph project {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [fontname=\"Helvetica\"];\n");
    out.push_str(&format!(
        "  \"root\" [shape=folder, label={}];\n",
        quote(&index.project.name)
    ));

    for (ty, group) in group_by_type(&files) {
        let category = quote(&format!("type:{}", ty.name()));
        out.push_str(&format!(
            "  {category} [shape=box, style=filled, fillcolor=\"{}\", label={}];\n",
            fill_color(ty),
            quote(&format!("{} ({})", ty.title(), group.len()))
        ));
        out.push_str(&format!("  \"root\" -> {category};\n"));
        for file in sample(&group, SAMPLE_PER_CATEGORY) {
            let id = quote(&format!("file:{}", file.relative_path));
            out.push_str(&format!("  {id} [shape=note, label={}];\n", quote(&file.name)));
            out.push_str(&format!("  {category} -> {id};\n"));
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn graph_has_root_categories_and_files() {
        let out = render(&fixtures::index(), &RenderOptions::default());
        assert!(out.starts_with("digraph project {\n"));
        assert!(out.contains("\"root\" [shape=folder, label=\"shop\"];"));
        assert!(out.contains("\"root\" -> \"type:model\";"));
        assert!(out.contains(
            "\"type:model\" -> \"file:src/models/User.js\";"
        ));
        assert!(out.trim_end().ends_with('}'));
    }

    #[test]
    fn at_most_three_files_per_category() {
        let mut index = fixtures::index();
        for i in 0..5 {
            index.root.folders[1].files.push(fixtures::file(
                &format!("tests/t{i}.test.js"),
                SemanticType::Test,
                1,
            ));
        }
        let out = render(&index, &RenderOptions::default());
        let edges = out.matches("\"type:test\" -> ").count();
        assert_eq!(edges, 3);
        assert!(out.contains("label=\"Tests (6)\""));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(quote("a \"b\" \\c"), "\"a \\\"b\\\" \\\\c\"");
    }
}
