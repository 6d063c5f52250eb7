//! Test and documentation ratios.
//!
//! Both are plain counts over the filtered file set. Nothing is weighted by
//! size or complexity, and "coverage" here means test files per source file,
//! not executed lines.

use crate::types::{DocumentationStats, FileNode, SemanticType, TestCoverage};

fn is_source(file: &FileNode) -> bool {
    file.language.is_programming() && file.semantic_type != SemanticType::Test
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw.min(100.0) * 10.0).round() / 10.0
}

/// Test files against programming-language source files, capped at 100%.
pub fn test_coverage(files: &[&FileNode]) -> TestCoverage {
    let test_file_count = files
        .iter()
        .filter(|f| f.semantic_type == SemanticType::Test)
        .count();
    let source_file_count = files.iter().filter(|f| is_source(f)).count();
    TestCoverage {
        test_file_count,
        source_file_count,
        estimated_percentage: percentage(test_file_count, source_file_count),
        has_tests: test_file_count > 0,
    }
}

/// Documentation files, plus the share of source files carrying a leading
/// doc comment.
pub fn documentation_stats(files: &[&FileNode]) -> DocumentationStats {
    let doc_file_count = files
        .iter()
        .filter(|f| {
            matches!(
                f.semantic_type,
                SemanticType::Readme | SemanticType::Documentation
            )
        })
        .count();
    let sources: Vec<_> = files.iter().filter(|f| is_source(f)).collect();
    let files_with_inline_docs_count = sources.iter().filter(|f| f.doc_comment.is_some()).count();
    let ratio = if sources.is_empty() {
        0.0
    } else {
        files_with_inline_docs_count as f64 / sources.len() as f64
    };
    DocumentationStats {
        doc_file_count,
        files_with_inline_docs_count,
        ratio,
        has_readme: files.iter().any(|f| f.semantic_type == SemanticType::Readme),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;
    use std::path::PathBuf;

    fn file(rel: &str, language: Language, semantic_type: SemanticType) -> FileNode {
        FileNode {
            path: PathBuf::from("/p").join(rel),
            relative_path: rel.to_string(),
            name: rel.rsplit('/').next().unwrap_or(rel).to_string(),
            extension: String::new(),
            language,
            semantic_type,
            size_bytes: 1,
            line_count: 1,
            complexity: 1,
            last_modified: None,
            extracted_metadata: None,
            doc_comment: None,
            description: None,
        }
    }

    #[test]
    fn coverage_counts_tests_against_sources() {
        let a = file("src/a.js", Language::JavaScript, SemanticType::Module);
        let b = file("src/b.js", Language::JavaScript, SemanticType::Controller);
        let c = file("src/c.css", Language::Css, SemanticType::Style);
        let t = file("tests/a.test.js", Language::JavaScript, SemanticType::Test);
        let cov = test_coverage(&[&a, &b, &c, &t]);
        assert_eq!(cov.test_file_count, 1);
        assert_eq!(cov.source_file_count, 2);
        assert_eq!(cov.estimated_percentage, 50.0);
        assert!(cov.has_tests);
    }

    #[test]
    fn coverage_is_capped_and_safe_on_empty() {
        let a = file("src/a.js", Language::JavaScript, SemanticType::Module);
        let t1 = file("a.test.js", Language::JavaScript, SemanticType::Test);
        let t2 = file("b.test.js", Language::JavaScript, SemanticType::Test);
        assert_eq!(test_coverage(&[&a, &t1, &t2]).estimated_percentage, 100.0);

        let empty = test_coverage(&[]);
        assert_eq!(empty.estimated_percentage, 0.0);
        assert!(!empty.has_tests);
    }

    #[test]
    fn documentation_ratio() {
        let mut a = file("src/a.rs", Language::Rust, SemanticType::Module);
        a.doc_comment = Some("Parses things.".into());
        let b = file("src/b.rs", Language::Rust, SemanticType::Module);
        let readme = file("README.md", Language::Markdown, SemanticType::Readme);
        let guide = file("docs/guide.md", Language::Markdown, SemanticType::Documentation);

        let stats = documentation_stats(&[&a, &b, &readme, &guide]);
        assert_eq!(stats.doc_file_count, 2);
        assert_eq!(stats.files_with_inline_docs_count, 1);
        assert!((stats.ratio - 0.5).abs() < f64::EPSILON);
        assert!(stats.has_readme);

        let none = documentation_stats(&[&b]);
        assert_eq!(none.ratio, 0.0);
        assert!(!none.has_readme);
    }
}
