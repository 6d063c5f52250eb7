
use crate::analyzer::regexes::regex_class_decl;
use crate::types::{Language, SemanticType};

/// Extension → language table. Lookup is on the lower-cased extension.
pub static LANGUAGE_TABLE: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("mts", Language::TypeScript),
    ("cts", Language::TypeScript),
    ("py", Language::Python),
    ("pyi", Language::Python),
    ("rs", Language::Rust),
    ("go", Language::Go),
    ("java", Language::Java),
    ("kt", Language::Kotlin),
    ("kts", Language::Kotlin),
    ("swift", Language::Swift),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("hpp", Language::Cpp),
    ("hh", Language::Cpp),
    ("cs", Language::CSharp),
    ("rb", Language::Ruby),
    ("php", Language::Php),
    ("scala", Language::Scala),
    ("dart", Language::Dart),
    ("sh", Language::Shell),
    ("bash", Language::Shell),
    ("zsh", Language::Shell),
    ("fish", Language::Shell),
    ("ps1", Language::Shell),
    ("bat", Language::Shell),
    ("sql", Language::Sql),
    ("html", Language::Html),
    ("htm", Language::Html),
    ("hbs", Language::Html),
    ("ejs", Language::Html),
    ("pug", Language::Html),
    ("twig", Language::Html),
    ("jinja", Language::Html),
    ("j2", Language::Html),
    ("css", Language::Css),
    ("less", Language::Css),
    ("styl", Language::Css),
    ("scss", Language::Scss),
    ("sass", Language::Scss),
    ("vue", Language::Vue),
    ("svelte", Language::Svelte),
    ("json", Language::Json),
    ("jsonc", Language::Json),
    ("yaml", Language::Yaml),
    ("yml", Language::Yaml),
    ("toml", Language::Toml),
    ("xml", Language::Xml),
    ("md", Language::Markdown),
    ("mdx", Language::Markdown),
    ("rst", Language::Markdown),
    ("adoc", Language::Markdown),
    ("txt", Language::Text),
    ("csv", Language::Text),
    ("ini", Language::Text),
    ("cfg", Language::Text),
    ("conf", Language::Text),
    ("env", Language::Text),
    ("properties", Language::Text),
];

/// Whole-name lookups for files without a meaningful extension.
pub static FILENAME_TABLE: &[(&str, Language)] = &[
    ("makefile", Language::Shell),
    ("dockerfile", Language::Text),
    ("gemfile", Language::Ruby),
    ("gemfile.lock", Language::Text),
    ("artisan", Language::Php),
    ("rakefile", Language::Ruby),
    ("procfile", Language::Text),
    (".env", Language::Text),
    (".gitignore", Language::Text),
    (".editorconfig", Language::Text),
];

/// Names kept even when their extension is unsupported. Compared against the
/// lower-cased stem.
pub static IMPORTANT_NAMES: &[&str] = &["readme", "license", "licence", "changelog", "makefile", "dockerfile"];

const CONFIG_FILENAMES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "tsconfig.json",
    "jsconfig.json",
    "cargo.toml",
    "cargo.lock",
    "pyproject.toml",
    "setup.cfg",
    "requirements.txt",
    "pipfile",
    "go.mod",
    "go.sum",
    "pom.xml",
    "build.gradle",
    "gemfile",
    "gemfile.lock",
    "composer.json",
    "makefile",
    "dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    ".env",
    ".gitignore",
    ".editorconfig",
    ".eslintrc",
    ".eslintrc.json",
    ".prettierrc",
    ".babelrc",
];
const CONFIG_EXTENSIONS: &[&str] = &["ini", "cfg", "conf", "env", "toml", "properties"];
const DOC_EXTENSIONS: &[&str] = &["md", "mdx", "rst", "adoc", "txt"];
const DOC_STEMS: &[&str] = &["license", "licence", "changelog", "contributing", "authors"];
const COMPONENT_EXTENSIONS: &[&str] = &["jsx", "tsx", "vue", "svelte"];
const STYLE_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "styl"];
const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "hbs", "ejs", "pug", "twig", "jinja", "j2"];
const SCRIPT_EXTENSIONS: &[&str] = &["sh", "bash", "zsh", "fish", "ps1", "bat"];
const DATA_EXTENSIONS: &[&str] = &["json", "jsonc", "yaml", "yml", "xml", "csv", "sql"];

/// Lower-cased view of a path handed to each rule.
pub struct ClassifyInput<'a> {
    pub name: &'a str,
    pub stem: &'a str,
    pub path: &'a str,
    pub extension: &'a str,
    pub language: Language,
}

/// One step of the semantic-type chain. The first rule whose predicate
/// holds decides the type.
pub struct SemanticRule {
    pub label: &'static str,
    pub matches: fn(&ClassifyInput<'_>) -> bool,
    pub result: SemanticType,
}

pub static SEMANTIC_RULES: &[SemanticRule] = &[
    SemanticRule {
        label: "config",
        matches: |i| {
            CONFIG_FILENAMES.contains(&i.name)
                || i.name.contains("config")
                || i.name.contains("settings")
                || CONFIG_EXTENSIONS.contains(&i.extension)
        },
        result: SemanticType::Config,
    },
    SemanticRule {
        label: "readme",
        matches: |i| i.name.starts_with("readme"),
        result: SemanticType::Readme,
    },
    SemanticRule {
        label: "documentation",
        matches: |i| DOC_EXTENSIONS.contains(&i.extension) || DOC_STEMS.contains(&i.stem),
        result: SemanticType::Documentation,
    },
    SemanticRule {
        label: "test",
        matches: |i| i.path.contains("test") || i.path.contains("spec"),
        result: SemanticType::Test,
    },
    SemanticRule {
        label: "controller",
        matches: |i| i.path.contains("controller"),
        result: SemanticType::Controller,
    },
    SemanticRule {
        label: "service",
        matches: |i| i.path.contains("service"),
        result: SemanticType::Service,
    },
    SemanticRule {
        label: "model",
        matches: |i| i.path.contains("model"),
        result: SemanticType::Model,
    },
    SemanticRule {
        label: "component",
        matches: |i| i.path.contains("component") || COMPONENT_EXTENSIONS.contains(&i.extension),
        result: SemanticType::Component,
    },
    SemanticRule {
        label: "utility",
        matches: |i| i.path.contains("util") || i.path.contains("helper"),
        result: SemanticType::Utility,
    },
    SemanticRule {
        label: "style",
        matches: |i| STYLE_EXTENSIONS.contains(&i.extension),
        result: SemanticType::Style,
    },
    SemanticRule {
        label: "template",
        matches: |i| TEMPLATE_EXTENSIONS.contains(&i.extension),
        result: SemanticType::Template,
    },
    SemanticRule {
        label: "script",
        matches: |i| SCRIPT_EXTENSIONS.contains(&i.extension),
        result: SemanticType::Script,
    },
    SemanticRule {
        label: "data",
        matches: |i| DATA_EXTENSIONS.contains(&i.extension),
        result: SemanticType::Data,
    },
    SemanticRule {
        label: "module",
        matches: |i| i.language.is_programming(),
        result: SemanticType::Module,
    },
    SemanticRule {
        label: "other",
        matches: |_| true,
        result: SemanticType::Other,
    },
];

/// Lookup tables driving the classifier. Swappable so tests can run the
/// chain against fixture tables.
#[derive(Clone, Copy)]
pub struct ClassifierTables {
    pub languages: &'static [(&'static str, Language)],
    pub filenames: &'static [(&'static str, Language)],
    pub important_names: &'static [&'static str],
    pub rules: &'static [SemanticRule],
}

impl Default for ClassifierTables {
    fn default() -> Self {
        Self {
            languages: LANGUAGE_TABLE,
            filenames: FILENAME_TABLE,
            important_names: IMPORTANT_NAMES,
            rules: SEMANTIC_RULES,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub language: Language,
    pub semantic_type: SemanticType,
}

#[derive(Clone, Copy, Default)]
pub struct Classifier {
    tables: ClassifierTables,
}

impl Classifier {
    pub fn new(tables: ClassifierTables) -> Self {
        Self { tables }
    }

    pub fn language_for_extension(&self, ext: &str) -> Option<Language> {
        let ext = ext.to_ascii_lowercase();
        self.tables
            .languages
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, lang)| *lang)
    }

    /// Language for a file name, or `None` when the file is not indexable.
    pub fn language_for_name(&self, name: &str) -> Option<Language> {
        let lower = name.to_ascii_lowercase();
        if let Some((_, lang)) = self.tables.filenames.iter().find(|(n, _)| *n == lower) {
            return Some(*lang);
        }
        let (stem, ext) = split_name(&lower);
        if let Some(lang) = self.language_for_extension(ext) {
            return Some(lang);
        }
        self.tables
            .important_names
            .contains(&stem)
            .then_some(Language::Text)
    }

    /// Language and the first semantic rule that holds for `relative_path`.
    fn first_rule(&self, relative_path: &str) -> Option<(Language, Option<&'static SemanticRule>)> {
        let name = file_name(relative_path);
        let language = self.language_for_name(name)?;

        let name_lower = name.to_ascii_lowercase();
        let path_lower = relative_path.replace('\\', "/").to_ascii_lowercase();
        let (stem, extension) = split_name(&name_lower);
        let input = ClassifyInput {
            name: &name_lower,
            stem,
            path: &path_lower,
            extension,
            language,
        };
        let rule = self.tables.rules.iter().find(|rule| (rule.matches)(&input));
        Some((language, rule))
    }

    /// Classify a root-relative path. Returns `None` for unsupported or
    /// binary files that are not on the important-name allow-list.
    pub fn classify(&self, relative_path: &str, content: Option<&str>) -> Option<Classification> {
        let (language, rule) = self.first_rule(relative_path)?;
        let mut semantic_type = rule.map(|r| r.result).unwrap_or(SemanticType::Other);

        if semantic_type == SemanticType::Module
            && let Some(content) = content
        {
            let name_lower = file_name(relative_path).to_ascii_lowercase();
            if declares_class_named(content, split_name(&name_lower).0) {
                semantic_type = SemanticType::Class;
            }
        }

        Some(Classification {
            language,
            semantic_type,
        })
    }

    /// Label of the rule that decides `relative_path`, for diagnostics.
    pub fn matching_rule(&self, relative_path: &str) -> Option<&'static str> {
        self.first_rule(relative_path)?.1.map(|rule| rule.label)
    }
}

fn file_name(relative_path: &str) -> &str {
    relative_path
        .rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or(relative_path)
}

/// `("user.test", "js")` for `"user.test.js"`; dotfiles keep their full name
/// as the stem.
fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (name, ""),
    }
}

fn declares_class_named(content: &str, stem: &str) -> bool {
    regex_class_decl()
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .any(|m| m.as_str().eq_ignore_ascii_case(stem))
}

pub fn is_test_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains("test") || lower.contains("spec")
}
