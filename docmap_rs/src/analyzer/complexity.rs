//! Heuristic complexity score.
//!
//! The score is a coarse signal in `[1, 10]` built from file length,
//! branching keyword counts, literal brace nesting and a few idiom checks.
//! It is not cyclomatic complexity: nothing is parsed, braces inside strings
//! count, and long files score higher twice (once for their length and again
//! for the keywords that length brings). That bias toward large files is
//! kept on purpose.

use crate::types::{Language, MAX_COMPLEXITY, MIN_COMPLEXITY};

/// Line-count thresholds, each adds one point.
const LINE_BRACKETS: [usize; 3] = [200, 500, 1000];
/// Branching keyword thresholds, each adds one point.
const KEYWORD_BRACKETS: [usize; 4] = [10, 25, 50, 100];
/// Maximum brace depth thresholds, each adds one point.
const DEPTH_BRACKETS: [usize; 2] = [3, 5];

/// Branching keywords for one language family.
#[derive(Clone, Copy, Debug)]
pub struct KeywordSet {
    /// Whole-word tokens.
    pub words: &'static [&'static str],
    /// Operators matched as substrings.
    pub operators: &'static [&'static str],
}

const C_LIKE: KeywordSet = KeywordSet {
    words: &[
        "if", "else", "for", "while", "do", "switch", "case", "try", "catch", "finally", "throw",
    ],
    operators: &["&&", "||", "?."],
};

const PYTHON: KeywordSet = KeywordSet {
    words: &[
        "if", "elif", "else", "for", "while", "try", "except", "finally", "raise", "with", "and",
        "or", "match", "case", "lambda",
    ],
    operators: &[],
};

const RUST: KeywordSet = KeywordSet {
    words: &["if", "else", "for", "while", "loop", "match", "return"],
    operators: &["&&", "||", "=>", "?;"],
};

const GO: KeywordSet = KeywordSet {
    words: &["if", "else", "for", "switch", "case", "select", "defer", "go", "panic", "recover"],
    operators: &["&&", "||"],
};

const RUBY: KeywordSet = KeywordSet {
    words: &[
        "if", "elsif", "else", "unless", "while", "until", "for", "case", "when", "begin",
        "rescue", "ensure", "and", "or",
    ],
    operators: &["&&", "||"],
};

const SHELL: KeywordSet = KeywordSet {
    words: &["if", "elif", "else", "for", "while", "until", "case", "then"],
    operators: &["&&", "||"],
};

/// Keyword set for `language`; unknown languages use the JavaScript-like set.
pub fn keywords_for(language: Language) -> KeywordSet {
    match language {
        Language::Python => PYTHON,
        Language::Rust => RUST,
        Language::Go => GO,
        Language::Ruby => RUBY,
        Language::Shell => SHELL,
        _ => C_LIKE,
    }
}

const CONCURRENCY_SIGNALS: &[&str] = &[
    "async ",
    "await ",
    "Promise.all",
    "Promise.race",
    "thread::spawn",
    "tokio::",
    "Thread(",
    "threading.",
    "asyncio.",
    "go func",
    "sync.WaitGroup",
    "Mutex",
    "new Worker(",
    "ExecutorService",
];

const DEFERRED_SIGNALS: &[&str] = &[
    ".then(",
    "callback",
    "setTimeout(",
    "setInterval(",
    "setImmediate(",
    "process.nextTick(",
    "defer ",
    "addEventListener(",
    ".on(",
];

const REGEX_SIGNALS: &[&str] = &[
    "new RegExp",
    "RegExp(",
    "re.compile(",
    "re.match(",
    "re.search(",
    "re.sub(",
    "Regex::new(",
    "regexp.MustCompile(",
    "regexp.Compile(",
    "Pattern.compile(",
    "preg_match(",
    ".match(/",
    ".replace(/",
    ".test(",
];

/// Score `content` written in `language`. Always within
/// [`MIN_COMPLEXITY`]..=[`MAX_COMPLEXITY`].
pub fn score(content: &str, language: Language) -> u8 {
    let mut total = MIN_COMPLEXITY as usize;

    let lines = content.lines().count();
    total += LINE_BRACKETS.iter().filter(|&&t| lines > t).count();

    let keywords = count_keywords(content, keywords_for(language));
    total += KEYWORD_BRACKETS.iter().filter(|&&t| keywords > t).count();

    let depth = max_brace_depth(content);
    total += DEPTH_BRACKETS.iter().filter(|&&t| depth > t).count();

    for signals in [CONCURRENCY_SIGNALS, DEFERRED_SIGNALS, REGEX_SIGNALS] {
        if signals.iter().any(|s| content.contains(s)) {
            total += 1;
        }
    }

    total.clamp(MIN_COMPLEXITY as usize, MAX_COMPLEXITY as usize) as u8
}

/// Number of branching keywords and operators in `content`.
pub fn count_keywords(content: &str, set: KeywordSet) -> usize {
    let words = content
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| set.words.contains(token))
        .count();
    let operators: usize = set
        .operators
        .iter()
        .map(|op| content.matches(op).count())
        .sum();
    words + operators
}

/// Deepest `{` nesting seen while scanning left to right. Unbalanced
/// closing braces never push the depth below zero.
pub fn max_brace_depth(content: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for c in content.chars() {
        match c {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
