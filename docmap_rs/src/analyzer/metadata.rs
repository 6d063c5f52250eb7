//! Regex-based metadata extraction.
//!
//! Imports, exports, classes and functions are pulled out with line
//! patterns from [`super::regexes`]. This is deliberately approximate: no
//! AST is built, so unusual formatting can hide declarations and strings or
//! comments can produce false hits.

use crate::analyzer::regexes::*;
use crate::types::{ExtractedMetadata, FileNode, Language, SemanticType};

/// Rust path roots that name the current crate, never a package.
const LOCAL_PATH_ROOTS: &[&str] = &["crate", "self", "super"];

const NOT_FUNCTIONS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "else", "new", "sizeof", "do", "try",
];

fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    let trimmed = value.trim();
    if !trimmed.is_empty() && !list.iter().any(|v| v == trimmed) {
        list.push(trimmed.to_string());
    }
}

fn captures(re: &regex::Regex, content: &str, group: usize) -> Vec<String> {
    re.captures_iter(content)
        .filter_map(|c| c.get(group).map(|m| m.as_str().to_string()))
        .collect()
}

/// True when an import specifier is a relative or absolute path. Anything
/// else, including Rust's `crate::` paths, counts as external.
pub fn is_internal_import(spec: &str) -> bool {
    spec.starts_with('.') || spec.starts_with('/')
}

/// Extract imports, exports, classes and functions from `content`.
/// `file_name` is used to recognise manifests whose entries become
/// `dependencies`.
pub fn extract_metadata(content: &str, language: Language, file_name: &str) -> ExtractedMetadata {
    let mut meta = ExtractedMetadata::default();

    for import in extract_imports(content, language) {
        push_unique(&mut meta.imports, import);
    }

    for class in captures(regex_class_decl(), content, 1) {
        push_unique(&mut meta.classes, class);
    }
    if language == Language::Go {
        for ty in captures(regex_go_type_decl(), content, 1) {
            push_unique(&mut meta.classes, ty);
        }
    }

    for function in extract_functions(content, language) {
        if !NOT_FUNCTIONS.contains(&function.as_str()) {
            push_unique(&mut meta.functions, function);
        }
    }

    for export in extract_exports(content, language) {
        push_unique(&mut meta.exports, export);
    }

    for dep in manifest_dependencies(file_name, content) {
        push_unique(&mut meta.dependencies, dep);
    }
    if meta.dependencies.is_empty() {
        // Source files list their external imports as dependencies.
        for import in &meta.imports {
            let root = package_root(import);
            if !is_internal_import(import) && !LOCAL_PATH_ROOTS.contains(&root.as_str()) {
                push_unique(&mut meta.dependencies, root);
            }
        }
    }

    meta
}

/// Package portion of an import specifier: `@scope/pkg` for scoped npm
/// names, the first segment otherwise.
pub fn package_root(spec: &str) -> String {
    if spec.starts_with('@') {
        return spec.splitn(3, '/').take(2).collect::<Vec<_>>().join("/");
    }
    spec.split(['/', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(spec)
        .to_string()
}

fn extract_imports(content: &str, language: Language) -> Vec<String> {
    let mut out = Vec::new();
    match language {
        Language::JavaScript | Language::TypeScript | Language::Vue | Language::Svelte => {
            out.extend(captures(regex_es_import(), content, 1));
            out.extend(captures(regex_es_reexport(), content, 1));
            out.extend(captures(regex_require(), content, 1));
            out.extend(captures(regex_dynamic_import(), content, 1));
        }
        Language::Python => {
            out.extend(captures(regex_py_from_import(), content, 1));
            for list in captures(regex_dotted_import(), content, 1) {
                out.extend(list.split(',').map(|s| s.trim().to_string()));
            }
        }
        Language::Java | Language::Kotlin | Language::Scala => {
            out.extend(captures(regex_dotted_import(), content, 1));
        }
        Language::Rust => {
            out.extend(captures(regex_rust_use(), content, 1));
            out.extend(
                captures(regex_rust_mod(), content, 1)
                    .into_iter()
                    .map(|m| format!("./{m}")),
            );
        }
        Language::Go => {
            out.extend(captures(regex_go_import_line(), content, 1));
            for block in captures(regex_go_import_block(), content, 1) {
                out.extend(captures(regex_quoted(), &block, 1));
            }
        }
        Language::Ruby => {
            for cap in regex_ruby_require().captures_iter(content) {
                let target = cap[2].to_string();
                if cap.get(1).is_some() && !target.starts_with('.') {
                    out.push(format!("./{target}"));
                } else {
                    out.push(target);
                }
            }
        }
        Language::C | Language::Cpp => {
            for cap in regex_c_include().captures_iter(content) {
                if &cap[1] == "\"" {
                    out.push(format!("./{}", &cap[2]));
                } else {
                    out.push(cap[2].to_string());
                }
            }
        }
        _ => {}
    }
    out
}

fn extract_functions(content: &str, language: Language) -> Vec<String> {
    match language {
        Language::JavaScript | Language::TypeScript | Language::Vue | Language::Svelte => {
            let mut out = captures(regex_js_function(), content, 1);
            out.extend(captures(regex_js_arrow(), content, 1));
            out
        }
        Language::Python | Language::Ruby => captures(regex_def(), content, 2),
        Language::Rust => captures(regex_rust_fn(), content, 2),
        Language::Go => captures(regex_go_func(), content, 1),
        Language::Kotlin | Language::Swift | Language::Php => {
            captures(regex_keyword_func(), content, 1)
        }
        Language::Java | Language::CSharp | Language::C | Language::Cpp | Language::Scala => {
            captures(regex_c_like_method(), content, 1)
        }
        Language::Shell => captures(regex_keyword_func(), content, 1),
        _ => Vec::new(),
    }
}

fn extract_exports(content: &str, language: Language) -> Vec<String> {
    let mut out = Vec::new();
    match language {
        Language::JavaScript | Language::TypeScript | Language::Vue | Language::Svelte => {
            out.extend(captures(regex_es_export_decl(), content, 1));
            for list in captures(regex_es_export_brace(), content, 1) {
                out.extend(brace_list_to_names(&list));
            }
            out.extend(captures(regex_commonjs_export(), content, 1));
            for list in captures(regex_module_exports(), content, 1) {
                out.extend(list.split(',').map(|s| s.trim().to_string()));
            }
        }
        Language::Python => {
            for cap in regex_def().captures_iter(content) {
                if cap[1].is_empty() && !cap[2].starts_with('_') {
                    out.push(cap[2].to_string());
                }
            }
            for class in captures(regex_class_decl(), content, 1) {
                if !class.starts_with('_') {
                    out.push(class);
                }
            }
        }
        Language::Rust => out.extend(captures(regex_rust_pub_item(), content, 1)),
        Language::Go => {
            let exported = |name: &String| name.chars().next().is_some_and(char::is_uppercase);
            out.extend(captures(regex_go_func(), content, 1).into_iter().filter(exported));
            out.extend(
                captures(regex_go_type_decl(), content, 1)
                    .into_iter()
                    .filter(exported),
            );
        }
        Language::Java | Language::CSharp | Language::Kotlin | Language::Scala => {
            out.extend(captures(regex_public_type(), content, 1));
        }
        _ => {}
    }
    out
}

/// `a, b as c, type D` → `["a", "c", "D"]`
fn brace_list_to_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|item| {
            let trimmed = item.trim().trim_start_matches("type ").trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Some((_, alias)) = trimmed.split_once(" as ") {
                Some(alias.trim().to_string())
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Dependency names declared by a package manifest. Non-manifests and
/// unparsable manifests yield nothing.
pub fn manifest_dependencies(file_name: &str, content: &str) -> Vec<String> {
    match file_name.to_ascii_lowercase().as_str() {
        "package.json" => {
            let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
                return Vec::new();
            };
            ["dependencies", "devDependencies", "peerDependencies"]
                .iter()
                .filter_map(|key| value.get(key).and_then(|v| v.as_object()))
                .flat_map(|deps| deps.keys().cloned())
                .collect()
        }
        "cargo.toml" => {
            let Ok(value) = toml::from_str::<toml::Table>(content) else {
                return Vec::new();
            };
            ["dependencies", "dev-dependencies", "build-dependencies"]
                .iter()
                .filter_map(|key| value.get(*key).and_then(|v| v.as_table()))
                .flat_map(|deps| deps.keys().cloned())
                .collect()
        }
        "requirements.txt" => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
            .filter_map(|line| {
                line.split(|c: char| "=<>!~;[ ".contains(c))
                    .next()
                    .map(str::to_string)
            })
            .collect(),
        "go.mod" => {
            let mut deps = Vec::new();
            let mut in_block = false;
            for line in content.lines().map(str::trim) {
                if line.starts_with("require (") {
                    in_block = true;
                } else if in_block && line == ")" {
                    in_block = false;
                } else if in_block {
                    if let Some(name) = line.split_whitespace().next() {
                        deps.push(name.to_string());
                    }
                } else if let Some(rest) = line.strip_prefix("require ")
                    && let Some(name) = rest.split_whitespace().next()
                {
                    deps.push(name.to_string());
                }
            }
            deps
        }
        _ => Vec::new(),
    }
}

/// Leading documentation of a file: the first `/** */` block, run of
/// `///`/`//!` lines, or docstring, depending on language.
pub fn extract_doc_comment(content: &str, language: Language) -> Option<String> {
    let raw = match language {
        Language::Python => regex_docstring()
            .captures(content)
            .map(|c| c[1].to_string()),
        Language::Rust => first_line_run(content, regex_triple_slash_doc())
            .or_else(|| block_doc(content)),
        Language::Ruby | Language::Shell => leading_hash_comment(content),
        Language::Go => leading_slash_comment(content).or_else(|| block_doc(content)),
        lang if lang.is_programming() => block_doc(content),
        _ => None,
    }?;
    let cleaned = raw
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty() && !line.starts_with('@'))
        .collect::<Vec<_>>()
        .join(" ");
    (!cleaned.is_empty()).then_some(cleaned)
}

fn block_doc(content: &str) -> Option<String> {
    regex_block_doc().captures(content).map(|c| c[1].to_string())
}

fn first_line_run(content: &str, re: &regex::Regex) -> Option<String> {
    let mut lines = Vec::new();
    let mut started = false;
    for line in content.lines() {
        match re.captures(line) {
            Some(cap) => {
                started = true;
                lines.push(cap[1].to_string());
            }
            None if started => break,
            None => {}
        }
    }
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn leading_hash_comment(content: &str) -> Option<String> {
    let lines: Vec<&str> = content
        .lines()
        .skip_while(|l| l.starts_with("#!") || l.trim().is_empty())
        .take_while(|l| l.trim_start().starts_with('#'))
        .map(|l| l.trim_start().trim_start_matches('#').trim())
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn leading_slash_comment(content: &str) -> Option<String> {
    let lines: Vec<&str> = content
        .lines()
        .skip_while(|l| l.trim().is_empty())
        .take_while(|l| l.trim_start().starts_with("//"))
        .map(|l| l.trim_start().trim_start_matches('/').trim())
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// First sentence of a doc comment, capped for one-line display.
pub fn first_sentence(text: &str) -> String {
    let end = text
        .char_indices()
        .find(|(i, c)| *c == '.' && text[i + 1..].starts_with(|n: char| n.is_whitespace()))
        .map(|(i, _)| i + 1)
        .unwrap_or(text.len());
    let sentence = text[..end].trim();
    if sentence.chars().count() > 160 {
        let cut: String = sentence.chars().take(157).collect();
        format!("{cut}...")
    } else {
        sentence.to_string()
    }
}

/// `user_profile-card` → `user profile card`; `UserController` → `user controller`
pub fn humanize(stem: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in stem.chars() {
        if c == '_' || c == '-' || c == '.' {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.extend(c.to_lowercase());
    }
    out.trim().to_string()
}

/// Description used when no generated text is available: the first
/// sentence of the doc comment, or a sentence built from type and name.
pub fn heuristic_description(file: &FileNode) -> String {
    if let Some(doc) = file.doc_comment.as_deref() {
        let sentence = first_sentence(doc);
        if !sentence.is_empty() {
            return sentence;
        }
    }
    let subject = humanize(file.stem());
    match file.semantic_type {
        SemanticType::Class => format!("Class definition for {subject}"),
        SemanticType::Module => format!("{} module for {subject}", capitalize(file.language.name())),
        SemanticType::Component => format!("UI component rendering {subject}"),
        SemanticType::Service => format!("Service layer for {subject}"),
        SemanticType::Controller => format!("Controller handling {subject} requests"),
        SemanticType::Model => format!("Data model for {subject}"),
        SemanticType::Utility => format!("Helper utilities for {subject}"),
        SemanticType::Test => format!("Tests for {subject}"),
        SemanticType::Config => format!("Configuration file {}", file.name),
        SemanticType::Readme => "Project readme".to_string(),
        SemanticType::Documentation => format!("Documentation: {subject}"),
        SemanticType::Script => format!("Script {}", file.name),
        SemanticType::Style => format!("Stylesheet for {subject}"),
        SemanticType::Template => format!("Template for {subject}"),
        SemanticType::Data => format!("Data file {}", file.name),
        SemanticType::Other => format!("File {}", file.name),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
