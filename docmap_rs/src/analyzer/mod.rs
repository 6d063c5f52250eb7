pub mod classify;
pub mod complexity;
pub mod coverage;
pub mod frameworks;
pub mod metadata;
pub(crate) mod regexes;
pub mod structure;

pub use classify::{Classification, Classifier, ClassifierTables};
pub use structure::{Analyzer, analyze};
