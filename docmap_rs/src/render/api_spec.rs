//! YAML "API specification": one entry per component, keyed by name.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::RenderError;
use crate::types::{FileNode, ProjectIndex, SemanticType};

use super::RenderOptions;

#[derive(Debug, Serialize)]
pub struct ApiSpec<'a> {
    pub project: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub generated_at: String,
    pub components: BTreeMap<String, ComponentSpec<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ComponentSpec<'a> {
    pub path: &'a str,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty")]
    pub exports: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    pub classes: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    pub functions: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<&'a str>,
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

/// Source files with something to publish: not tests, and at least one
/// export, class or function found.
fn is_component(file: &FileNode) -> bool {
    if file.semantic_type == SemanticType::Test || !file.language.is_programming() {
        return false;
    }
    file.extracted_metadata
        .as_ref()
        .is_some_and(|m| !(m.exports.is_empty() && m.classes.is_empty() && m.functions.is_empty()))
}

fn component<'a>(file: &'a FileNode) -> Option<ComponentSpec<'a>> {
    let meta = file.extracted_metadata.as_ref()?;
    let mut dependencies: Vec<&str> = Vec::new();
    for dep in meta.imports.iter().chain(meta.dependencies.iter()) {
        if !dependencies.contains(&dep.as_str()) {
            dependencies.push(dep);
        }
    }
    Some(ComponentSpec {
        path: &file.relative_path,
        semantic_type: file.semantic_type,
        language: file.language.name(),
        description: file.description.as_deref(),
        exports: &meta.exports,
        classes: &meta.classes,
        functions: &meta.functions,
        dependencies,
    })
}

/// Build the spec. Components are keyed by file stem; a stem seen twice is
/// keyed by its relative path instead.
pub fn build<'a>(index: &'a ProjectIndex, options: &RenderOptions) -> ApiSpec<'a> {
    let mut components = BTreeMap::new();
    for file in options.selected_files(index) {
        if !is_component(file) {
            continue;
        }
        let Some(spec) = component(file) else {
            continue;
        };
        let key = if components.contains_key(file.stem()) {
            file.relative_path.clone()
        } else {
            file.stem().to_string()
        };
        components.insert(key, spec);
    }
    ApiSpec {
        project: &index.project.name,
        description: index.project.description.as_deref(),
        generated_at: index.metadata.indexed_at.to_rfc3339(),
        components,
    }
}

pub fn render(index: &ProjectIndex, options: &RenderOptions) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(&build(index, options))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use crate::types::ExtractedMetadata;

    #[test]
    fn components_are_keyed_by_name() {
        let index = fixtures::index();
        let spec = build(&index, &RenderOptions::default());
        let keys: Vec<&str> = spec.components.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["User", "UserController"]);

        let controller = &spec.components["UserController"];
        assert_eq!(controller.path, "src/controllers/UserController.js");
        assert_eq!(controller.functions, ["list".to_string(), "show".to_string()]);
        assert_eq!(controller.dependencies, vec!["express", "../models/User"]);
    }

    #[test]
    fn duplicate_stems_fall_back_to_paths() {
        let mut index = fixtures::index();
        let mut other = fixtures::file("src/views/User.js", SemanticType::Component, 3);
        other.extracted_metadata = Some(ExtractedMetadata {
            exports: vec!["UserView".into()],
            ..ExtractedMetadata::default()
        });
        index.root.folders[0].folders[2].files.push(other);

        let spec = build(&index, &RenderOptions::default());
        assert!(spec.components.contains_key("User"));
        assert!(spec.components.contains_key("src/views/User.js"));
    }

    #[test]
    fn yaml_output_lists_components() {
        let yaml = render(&fixtures::index(), &RenderOptions::default()).expect("yaml");
        assert!(yaml.contains("project: shop\n"));
        assert!(yaml.contains("components:\n"));
        assert!(yaml.contains("  UserController:\n"));
        assert!(yaml.contains("    type: controller\n"));
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).expect("parse back");
        assert_eq!(value["components"]["User"]["classes"][0], "User");
        assert!(value["components"].get("user.test").is_none());
    }
}
