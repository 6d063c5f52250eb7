//! Framework and design-pattern signals.
//!
//! Both detectors search the text the index already holds (file names,
//! extracted imports and dependencies, declared class and function names,
//! doc comments) for fixed trigger strings. A label is reported once if any
//! trigger fires anywhere in the project. These are hints, not verified
//! facts: a file named `factory.js` does not prove a factory exists.

use std::collections::BTreeSet;

use crate::analyzer::metadata::package_root;
use crate::types::FileNode;

/// Triggers for one framework.
#[derive(Clone, Copy, Debug)]
pub struct FrameworkSignal {
    pub name: &'static str,
    /// Package names matched against imports and manifest dependencies.
    pub packages: &'static [&'static str],
    /// Exact file names (lower-case) that only this framework uses.
    pub files: &'static [&'static str],
    /// Case-insensitive substrings searched in doc comments.
    pub tokens: &'static [&'static str],
}

pub static FRAMEWORK_SIGNALS: &[FrameworkSignal] = &[
    FrameworkSignal {
        name: "React",
        packages: &["react", "react-dom"],
        files: &[],
        tokens: &["react component", "react hook"],
    },
    FrameworkSignal {
        name: "Next.js",
        packages: &["next"],
        files: &["next.config.js", "next.config.mjs", "next.config.ts"],
        tokens: &["next.js"],
    },
    FrameworkSignal {
        name: "Vue",
        packages: &["vue"],
        files: &["vue.config.js"],
        tokens: &["vue component"],
    },
    FrameworkSignal {
        name: "Nuxt",
        packages: &["nuxt"],
        files: &["nuxt.config.js", "nuxt.config.ts"],
        tokens: &["nuxt"],
    },
    FrameworkSignal {
        name: "Angular",
        packages: &["@angular/core"],
        files: &["angular.json"],
        tokens: &["@ngmodule", "@component("],
    },
    FrameworkSignal {
        name: "Svelte",
        packages: &["svelte", "@sveltejs/kit"],
        files: &["svelte.config.js", "svelte.config.ts"],
        tokens: &["sveltekit"],
    },
    FrameworkSignal {
        name: "Express",
        packages: &["express"],
        files: &[],
        tokens: &["express app", "express router"],
    },
    FrameworkSignal {
        name: "NestJS",
        packages: &["@nestjs/core", "@nestjs/common"],
        files: &["nest-cli.json"],
        tokens: &["nestjs"],
    },
    FrameworkSignal {
        name: "Django",
        packages: &["django"],
        files: &["manage.py"],
        tokens: &["django"],
    },
    FrameworkSignal {
        name: "Flask",
        packages: &["flask"],
        files: &[],
        tokens: &["flask"],
    },
    FrameworkSignal {
        name: "FastAPI",
        packages: &["fastapi"],
        files: &[],
        tokens: &["fastapi"],
    },
    FrameworkSignal {
        name: "Rails",
        packages: &["rails"],
        files: &["gemfile.lock", "routes.rb"],
        tokens: &["rails"],
    },
    FrameworkSignal {
        name: "Spring",
        packages: &["org.springframework"],
        files: &["application.properties"],
        tokens: &["@springbootapplication", "spring boot"],
    },
    FrameworkSignal {
        name: "Laravel",
        packages: &["laravel"],
        files: &["artisan"],
        tokens: &["laravel"],
    },
    FrameworkSignal {
        name: "Gin",
        packages: &["github.com/gin-gonic/gin"],
        files: &[],
        tokens: &["gin-gonic"],
    },
    FrameworkSignal {
        name: "Axum",
        packages: &["axum"],
        files: &[],
        tokens: &["axum"],
    },
    FrameworkSignal {
        name: "Actix",
        packages: &["actix-web", "actix_web"],
        files: &[],
        tokens: &["actix"],
    },
    FrameworkSignal {
        name: "Tokio",
        packages: &["tokio"],
        files: &[],
        tokens: &[],
    },
];

/// Triggers for one design pattern.
#[derive(Clone, Copy, Debug)]
pub struct PatternSignal {
    pub name: &'static str,
    /// Case-insensitive substrings of file stems, class and function names.
    pub names: &'static [&'static str],
    /// Case-insensitive substrings searched in doc comments.
    pub tokens: &'static [&'static str],
}

pub static DESIGN_PATTERN_SIGNALS: &[PatternSignal] = &[
    PatternSignal {
        name: "Singleton",
        names: &["singleton", "getinstance", "get_instance", "shared_instance"],
        tokens: &["singleton"],
    },
    PatternSignal {
        name: "Factory",
        names: &["factory"],
        tokens: &["factory"],
    },
    PatternSignal {
        name: "Observer",
        names: &["observer", "subscriber", "eventemitter", "event_bus", "eventbus"],
        tokens: &["observer", "publish/subscribe", "pub/sub"],
    },
    PatternSignal {
        name: "Repository",
        names: &["repository"],
        tokens: &["repository"],
    },
    PatternSignal {
        name: "Strategy",
        names: &["strategy"],
        tokens: &["strategy pattern"],
    },
    PatternSignal {
        name: "Adapter",
        names: &["adapter"],
        tokens: &["adapter"],
    },
    PatternSignal {
        name: "Decorator",
        names: &["decorator"],
        tokens: &["decorator"],
    },
    PatternSignal {
        name: "Middleware",
        names: &["middleware"],
        tokens: &["middleware"],
    },
    PatternSignal {
        name: "Builder",
        names: &["builder"],
        tokens: &["builder pattern"],
    },
    PatternSignal {
        name: "Dependency Injection",
        names: &["injector", "injectable", "container", "provider"],
        tokens: &["dependency injection", "@injectable"],
    },
];

/// Signal tables used by the analyzer. Swappable for fixture tables in tests.
#[derive(Clone, Copy, Debug)]
pub struct SignalTables {
    pub frameworks: &'static [FrameworkSignal],
    pub patterns: &'static [PatternSignal],
}

impl Default for SignalTables {
    fn default() -> Self {
        Self {
            frameworks: FRAMEWORK_SIGNALS,
            patterns: DESIGN_PATTERN_SIGNALS,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Package names a file refers to: import roots plus manifest entries.
fn referenced_packages(file: &FileNode) -> Vec<String> {
    let Some(meta) = file.extracted_metadata.as_ref() else {
        return Vec::new();
    };
    meta.imports
        .iter()
        .map(|i| package_root(i))
        .chain(meta.imports.iter().cloned())
        .chain(meta.dependencies.iter().cloned())
        .map(|p| p.to_ascii_lowercase())
        .collect()
}

pub fn detect_frameworks(files: &[&FileNode], signals: &[FrameworkSignal]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for file in files {
        let name = file.name.to_ascii_lowercase();
        let packages = referenced_packages(file);
        let doc = file
            .doc_comment
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        for signal in signals {
            if found.contains(signal.name) {
                continue;
            }
            let hit = signal.files.contains(&name.as_str())
                || packages.iter().any(|p| signal.packages.contains(&p.as_str()))
                || (!doc.is_empty() && contains_any(&doc, signal.tokens));
            if hit {
                found.insert(signal.name.to_string());
            }
        }
    }
    found
}

pub fn detect_design_patterns(files: &[&FileNode], signals: &[PatternSignal]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for file in files {
        let mut names = vec![file.stem().to_ascii_lowercase()];
        if let Some(meta) = file.extracted_metadata.as_ref() {
            names.extend(meta.classes.iter().map(|c| c.to_ascii_lowercase()));
            names.extend(meta.functions.iter().map(|f| f.to_ascii_lowercase()));
        }
        let doc = file
            .doc_comment
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        for signal in signals {
            if found.contains(signal.name) {
                continue;
            }
            let hit = names.iter().any(|n| contains_any(n, signal.names))
                || (!doc.is_empty() && contains_any(&doc, signal.tokens));
            if hit {
                found.insert(signal.name.to_string());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractedMetadata, Language, SemanticType};
    use std::path::PathBuf;

    fn file(rel: &str) -> FileNode {
        let name = rel.rsplit('/').next().unwrap_or(rel).to_string();
        FileNode {
            path: PathBuf::from("/p").join(rel),
            relative_path: rel.to_string(),
            extension: name.rsplit_once('.').map(|(_, e)| e.to_string()).unwrap_or_default(),
            name,
            language: Language::JavaScript,
            semantic_type: SemanticType::Module,
            size_bytes: 1,
            line_count: 1,
            complexity: 1,
            last_modified: None,
            extracted_metadata: None,
            doc_comment: None,
            description: None,
        }
    }

    fn with_imports(mut f: FileNode, imports: &[&str]) -> FileNode {
        f.extracted_metadata = Some(ExtractedMetadata {
            imports: imports.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        });
        f
    }

    #[test]
    fn frameworks_from_imports_files_and_docs() {
        let app = with_imports(file("src/App.jsx"), &["react", "./styles.css"]);
        let next = file("next.config.js");
        let mut doc = file("server.py");
        doc.doc_comment = Some("FastAPI application entry".into());
        let files = vec![&app, &next, &doc];

        let found = detect_frameworks(&files, FRAMEWORK_SIGNALS);
        assert!(found.contains("React"));
        assert!(found.contains("Next.js"));
        assert!(found.contains("FastAPI"));
        assert!(!found.contains("Django"));
    }

    #[test]
    fn scoped_packages_match_by_root() {
        let f = with_imports(file("app.module.ts"), &["@angular/core/testing"]);
        let found = detect_frameworks(&[&f], FRAMEWORK_SIGNALS);
        assert!(found.contains("Angular"));
    }

    #[test]
    fn design_patterns_from_names_and_docs() {
        let factory = file("src/userFactory.js");
        let mut repo = file("src/store.js");
        repo.extracted_metadata = Some(ExtractedMetadata {
            classes: vec!["UserRepository".into()],
            ..Default::default()
        });
        let mut mw = file("src/auth.js");
        mw.doc_comment = Some("Express middleware that checks tokens.".into());
        let files = vec![&factory, &repo, &mw];

        let found = detect_design_patterns(&files, DESIGN_PATTERN_SIGNALS);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["Factory", "Middleware", "Repository"]
        );
    }

    #[test]
    fn fixture_tables_replace_builtins() {
        static ONLY: &[PatternSignal] = &[PatternSignal {
            name: "Widget",
            names: &["widget"],
            tokens: &[],
        }];
        let w = file("src/widgetFactory.js");
        let found = detect_design_patterns(&[&w], ONLY);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["Widget"]);
    }

    #[test]
    fn nothing_found_in_plain_files() {
        let a = file("src/a.js");
        assert!(detect_frameworks(&[&a], FRAMEWORK_SIGNALS).is_empty());
        assert!(detect_design_patterns(&[&a], DESIGN_PATTERN_SIGNALS).is_empty());
    }
}
