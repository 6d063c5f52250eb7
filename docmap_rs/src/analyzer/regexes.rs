//! Line-pattern regexes for best-effort source extraction.
//!
//! None of these parse the language; they match the common shapes of
//! declarations and imports and will miss or over-match unusual code.

use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

// ---- imports -------------------------------------------------------------

pub(crate) fn regex_es_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*import\s+(?:type\s+)?(?:[^'";]*?\s+from\s+)?["']([^"']+)["']"#))
}

pub(crate) fn regex_es_reexport() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*export\s+(?:\*|\{[^}]*\})\s+from\s+["']([^"']+)["']"#))
}

pub(crate) fn regex_require() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\brequire\s*\(\s*["']([^"']+)["']\s*\)"#))
}

pub(crate) fn regex_dynamic_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\bimport\s*\(\s*["']([^"']+)["']\s*\)"#))
}

pub(crate) fn regex_py_from_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*from\s+([.\w]+)\s+import\b"))
}

pub(crate) fn regex_dotted_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // python `import a.b, c` and java/kotlin/scala `import a.b.C;`
    RE.get_or_init(|| regex(r"(?m)^\s*import\s+(?:static\s+)?([\w.]+(?:\s*,\s*[\w.]+)*)"))
}

pub(crate) fn regex_rust_use() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+(?:::)?([A-Za-z_][\w]*(?:::[A-Za-z_][\w]*)*)"))
}

pub(crate) fn regex_rust_mod() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+([A-Za-z_]\w*)\s*;"))
}

pub(crate) fn regex_go_import_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"]+)""#))
}

pub(crate) fn regex_go_import_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?s)\bimport\s*\(([^)]*)\)"))
}

pub(crate) fn regex_quoted() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#""([^"]+)""#))
}

pub(crate) fn regex_ruby_require() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*require(_relative)?\s*\(?\s*["']([^"']+)["']"#))
}

pub(crate) fn regex_c_include() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?m)^\s*#\s*include\s+([<"])([^>"]+)[>"]"#))
}

// ---- declarations --------------------------------------------------------

pub(crate) fn regex_class_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:pub(?:\([^)]*\))?\s+)?(?:public\s+|private\s+|protected\s+|internal\s+)?(?:static\s+)?(?:abstract\s+|final\s+|sealed\s+|open\s+|data\s+)*(?:class|struct|interface|trait|enum)\s+([A-Za-z_]\w*)",
        )
    })
}

pub(crate) fn regex_go_type_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^type\s+([A-Za-z_]\w*)\s+(?:struct|interface)\b"))
}

pub(crate) fn regex_js_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*\("))
}

pub(crate) fn regex_js_arrow() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|[A-Za-z_$][\w$]*\s*=>)")
    })
}

pub(crate) fn regex_def() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // python and ruby
    RE.get_or_init(|| regex(r"(?m)^([ \t]*)(?:async\s+)?def\s+(?:self\.)?([A-Za-z_]\w*[?!]?)"))
}

pub(crate) fn regex_rust_fn() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"(?m)^\s*(pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+\S+\s+)?fn\s+([A-Za-z_]\w*)")
    })
}

pub(crate) fn regex_rust_pub_item() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^pub\s+(?:async\s+)?(?:fn|struct|enum|trait|type|const|static|mod)\s+([A-Za-z_]\w*)"))
}

pub(crate) fn regex_go_func() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^func\s+(?:\([^)]*\)\s*)?([A-Za-z_]\w*)\s*\("))
}

pub(crate) fn regex_keyword_func() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // kotlin `fun`, swift `func`, php `function`
    RE.get_or_init(|| regex(r"(?m)^\s*(?:(?:public|private|protected|internal|open|override|static|suspend)\s+)*(?:fun|func|function)\s+(?:<[^>]*>\s*)?([A-Za-z_]\w*)\s*[(<]"))
}

pub(crate) fn regex_c_like_method() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // java / c# / c / c++: `[modifiers] Type name(args) {`
    RE.get_or_init(|| {
        regex(r"(?m)^\s*(?:(?:public|private|protected|static|final|virtual|override|async|inline|const)\s+)*[A-Za-z_][\w<>\[\],:*& ]*?\s+\**([A-Za-z_]\w*)\s*\([^;{)]*\)\s*(?:const\s*)?(?:throws\s+[\w., ]+)?\s*\{")
    })
}

// ---- exports -------------------------------------------------------------

pub(crate) fn regex_es_export_decl() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(r"(?m)^\s*export\s+(?:default\s+)?(?:async\s+)?(?:function\s*\*?|const|let|var|class|interface|type|enum|abstract\s+class)\s+([A-Za-z_$][\w$]*)")
    })
}

pub(crate) fn regex_es_export_brace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*export\s+\{([^}]+)\}"))
}

pub(crate) fn regex_commonjs_export() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*="))
}

pub(crate) fn regex_module_exports() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*module\.exports\s*=\s*\{?\s*([A-Za-z_$][\w$]*(?:\s*,\s*[A-Za-z_$][\w$]*)*)"))
}

pub(crate) fn regex_public_type() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*public\s+(?:static\s+)?(?:abstract\s+|final\s+|sealed\s+)*(?:class|interface|enum|record|struct)\s+([A-Za-z_]\w*)"))
}

// ---- documentation -------------------------------------------------------

pub(crate) fn regex_block_doc() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?s)/\*\*(.*?)\*/"))
}

pub(crate) fn regex_triple_slash_doc() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?m)^\s*//[/!]\s?(.*)$"))
}

pub(crate) fn regex_docstring() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?s)(?:"""|''')(.*?)(?:"""|''')"#))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn es_import_covers_from_and_side_effect_forms() {
        let src = "import React from 'react';\nimport './styles.css';\nimport { a, b } from \"../lib/a\";\n";
        let found: Vec<_> = regex_es_import()
            .captures_iter(src)
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(found, vec!["react", "./styles.css", "../lib/a"]);
    }

    #[test]
    fn class_decl_matches_common_languages() {
        let src = "export default class App {}\nclass Foo(Base):\npub struct Bar;\npublic final class Baz {\n";
        let found: Vec<_> = regex_class_decl()
            .captures_iter(src)
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(found, vec!["App", "Foo", "Bar", "Baz"]);
    }

    #[test]
    fn js_arrow_functions() {
        let src = "const add = (a, b) => a + b;\nexport const load = async () => {};\nconst x = 5;\nlet inc = n => n + 1;\n";
        let found: Vec<_> = regex_js_arrow()
            .captures_iter(src)
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(found, vec!["add", "load", "inc"]);
    }
}
