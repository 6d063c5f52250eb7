//! Path filtering and ignore-file helpers.
//!
//! Patterns follow a small gitignore-like grammar:
//! - `name` matches any path segment equal to `name`
//! - `name/` matches directories named `name` (and everything under them)
//! - `a/b` (no glob characters) matches that root-relative path and its
//!   descendants
//! - anything with `*`, `?` or `[` is a glob over the full relative path;
//!   `*` may cross `/`, and a glob without `/` is also tried against each
//!   single segment

use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

const GLOB_CHARS: &[char] = &['*', '?', '['];

#[derive(Clone, Debug)]
enum Matcher {
    Segment(String),
    Directory(String),
    Prefix(String),
    Glob {
        matcher: GlobMatcher,
        per_segment: bool,
    },
}

impl Matcher {
    fn parse(raw: &str) -> Option<Self> {
        let pattern = raw.trim();
        let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
        let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        if pattern.is_empty() {
            return None;
        }

        if pattern.contains(GLOB_CHARS) {
            return match GlobBuilder::new(pattern.trim_end_matches('/'))
                .literal_separator(false)
                .build()
            {
                Ok(glob) => Some(Matcher::Glob {
                    matcher: glob.compile_matcher(),
                    per_segment: !pattern.trim_end_matches('/').contains('/'),
                }),
                Err(err) => {
                    warn!(pattern = raw, error = %err, "invalid glob pattern ignored");
                    None
                }
            };
        }
        if let Some(dir) = pattern.strip_suffix('/') {
            return Some(Matcher::Directory(dir.to_string()));
        }
        if pattern.contains('/') {
            return Some(Matcher::Prefix(pattern.to_string()));
        }
        Some(Matcher::Segment(pattern.to_string()))
    }

    fn matches(&self, relative: &str, is_dir: bool) -> bool {
        match self {
            Matcher::Segment(name) => relative.split('/').any(|s| s == name),
            Matcher::Directory(dir) => {
                if dir.contains('/') {
                    return (is_dir && relative == dir) || relative.starts_with(&format!("{dir}/"));
                }
                let segments: Vec<&str> = relative.split('/').collect();
                // For a file, only the folders above it can match.
                let dir_segments = if is_dir {
                    &segments[..]
                } else {
                    &segments[..segments.len().saturating_sub(1)]
                };
                dir_segments.iter().any(|s| s == dir)
            }
            Matcher::Prefix(prefix) => {
                relative == prefix || relative.starts_with(&format!("{prefix}/"))
            }
            Matcher::Glob {
                matcher,
                per_segment,
            } => {
                matcher.is_match(relative)
                    || (*per_segment && relative.split('/').any(|s| matcher.is_match(s)))
            }
        }
    }
}

/// Outcome of evaluating one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Included,
    /// Matched an exclude pattern.
    Excluded,
    /// A segment starts with `.` and hidden entries are not requested.
    Hidden,
    /// Include patterns exist and none matched.
    NotIncluded,
}

impl Verdict {
    pub fn is_included(self) -> bool {
        self == Verdict::Included
    }

    /// Excluded and hidden directories are not descended into.
    pub fn prunes(self) -> bool {
        matches!(self, Verdict::Excluded | Verdict::Hidden)
    }
}

/// Include/exclude evaluator. Exclusion is checked first and always wins;
/// the hidden check is independent of both pattern lists.
#[derive(Clone, Debug, Default)]
pub struct PathFilter {
    include: Vec<Matcher>,
    exclude: Vec<Matcher>,
    include_hidden: bool,
}

impl PathFilter {
    pub fn new<I, E>(include: I, exclude: E, include_hidden: bool) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: include
                .into_iter()
                .filter_map(|p| Matcher::parse(p.as_ref()))
                .collect(),
            exclude: exclude
                .into_iter()
                .filter_map(|p| Matcher::parse(p.as_ref()))
                .collect(),
            include_hidden,
        }
    }

    pub fn has_include_patterns(&self) -> bool {
        !self.include.is_empty()
    }

    /// Evaluate a root-relative, `/`-separated path. The empty path is the
    /// root and is always included.
    pub fn decide(&self, relative: &str, is_dir: bool) -> Verdict {
        let relative = relative.trim_matches('/');
        if relative.is_empty() {
            return Verdict::Included;
        }
        if self.exclude.iter().any(|m| m.matches(relative, is_dir)) {
            return Verdict::Excluded;
        }
        if !self.include_hidden && relative.split('/').any(is_hidden_name) {
            return Verdict::Hidden;
        }
        if self.include.is_empty() || self.include.iter().any(|m| m.matches(relative, is_dir)) {
            Verdict::Included
        } else {
            Verdict::NotIncluded
        }
    }
}

pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// Patterns from an ignore file: comments and blank lines dropped, trailing
/// slashes stripped. Negations cannot be expressed as excludes and are
/// skipped. A missing file yields no patterns.
pub fn read_ignore_file(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no ignore file");
            return Vec::new();
        }
    };
    parse_ignore_patterns(&content)
}

pub fn parse_ignore_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            if line.starts_with('!') {
                debug!(pattern = line, "negated ignore pattern skipped");
                return false;
            }
            true
        })
        .map(|line| line.trim_end_matches('/').to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Root-relative path with `/` separators on every platform.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str]) -> PathFilter {
        PathFilter::new(include, exclude, false)
    }

    #[test]
    fn segment_patterns_match_anywhere() {
        let f = filter(&[], &["node_modules"]);
        assert_eq!(f.decide("node_modules", true), Verdict::Excluded);
        assert_eq!(f.decide("node_modules/lib/index.js", false), Verdict::Excluded);
        assert_eq!(f.decide("packages/a/node_modules", true), Verdict::Excluded);
        assert_eq!(f.decide("src/node_modules_helper.js", false), Verdict::Included);
    }

    #[test]
    fn trailing_slash_means_directory() {
        let f = filter(&[], &["build/"]);
        assert_eq!(f.decide("build", true), Verdict::Excluded);
        assert_eq!(f.decide("build/out.js", false), Verdict::Excluded);
        // A file called `build` is not a directory.
        assert_eq!(f.decide("build", false), Verdict::Included);
    }

    #[test]
    fn globs_cover_the_full_path() {
        let f = filter(&[], &["*.log", "src/**/gen_*.rs", "?.tmp"]);
        assert_eq!(f.decide("debug.log", false), Verdict::Excluded);
        assert_eq!(f.decide("logs/deep/app.log", false), Verdict::Excluded);
        assert_eq!(f.decide("src/a/b/gen_x.rs", false), Verdict::Excluded);
        assert_eq!(f.decide("src/a/b/x.rs", false), Verdict::Included);
        assert_eq!(f.decide("dir/a.tmp", false), Verdict::Excluded);
        assert_eq!(f.decide("dir/ab.tmp", false), Verdict::Included);
    }

    #[test]
    fn slash_patterns_are_root_anchored_prefixes() {
        let f = filter(&[], &["src/generated"]);
        assert_eq!(f.decide("src/generated", true), Verdict::Excluded);
        assert_eq!(f.decide("src/generated/a.ts", false), Verdict::Excluded);
        assert_eq!(f.decide("lib/src/generated", true), Verdict::Included);
        assert_eq!(f.decide("src/generated_types.ts", false), Verdict::Included);
    }

    #[test]
    fn exclude_dominates_include() {
        let f = filter(&["src"], &["*.test.js"]);
        assert_eq!(f.decide("src/app.js", false), Verdict::Included);
        assert_eq!(f.decide("src/app.test.js", false), Verdict::Excluded);
        assert_eq!(f.decide("docs/readme.md", false), Verdict::NotIncluded);

        // Same pattern on both sides: excluded.
        let both = filter(&["vendor"], &["vendor"]);
        assert_eq!(both.decide("vendor/x.js", false), Verdict::Excluded);
    }

    #[test]
    fn hidden_entries_need_opt_in() {
        let f = filter(&[], &[]);
        assert_eq!(f.decide(".env", false), Verdict::Hidden);
        assert_eq!(f.decide(".github/workflows/ci.yml", false), Verdict::Hidden);
        assert!(Verdict::Hidden.prunes());

        let shown = PathFilter::new(Vec::<String>::new(), Vec::<String>::new(), true);
        assert_eq!(shown.decide(".env", false), Verdict::Included);
    }

    #[test]
    fn root_is_always_included() {
        let f = filter(&["src"], &["*"]);
        assert_eq!(f.decide("", true), Verdict::Included);
    }

    #[test]
    fn ignore_file_parsing() {
        let content = "# comment\n\nnode_modules/\n*.log\n!keep.log\n  dist/  \n/\n";
        assert_eq!(
            parse_ignore_patterns(content),
            vec!["node_modules", "*.log", "dist"]
        );

        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join(".gitignore");
        std::fs::write(&path, "target/\n").expect("write .gitignore");
        assert_eq!(read_ignore_file(&path), vec!["target"]);
        assert!(read_ignore_file(&tmp.path().join("missing")).is_empty());
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/p");
        assert_eq!(relative_path(root, Path::new("/p/src/a.js")), "src/a.js");
        assert_eq!(relative_path(root, Path::new("/p")), "");
    }
}
