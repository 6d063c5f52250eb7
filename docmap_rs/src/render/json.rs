//! JSON export mirroring the whole index.

use crate::error::RenderError;
use crate::types::ProjectIndex;

pub fn render(index: &ProjectIndex) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(index)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;
    use serde_json::Value;

    fn collect_paths(folder: &Value, files: &mut Vec<String>, folders: &mut Vec<String>) {
        folders.push(folder["relativePath"].as_str().unwrap_or_default().to_string());
        for file in folder["files"].as_array().into_iter().flatten() {
            files.push(file["relativePath"].as_str().unwrap_or_default().to_string());
        }
        for child in folder["folders"].as_array().into_iter().flatten() {
            collect_paths(child, files, folders);
        }
    }

    #[test]
    fn every_node_appears_exactly_once() {
        let index = fixtures::index();
        let value: Value = serde_json::from_str(&render(&index).expect("json")).expect("parse");

        let (mut files, mut folders) = (Vec::new(), Vec::new());
        collect_paths(&value["root"], &mut files, &mut folders);

        let expected_files: Vec<String> =
            index.files().iter().map(|f| f.relative_path.clone()).collect();
        let expected_folders: Vec<String> =
            index.folders().iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(files, expected_files);
        assert_eq!(folders, expected_folders);
    }

    #[test]
    fn export_carries_analysis_and_metadata() {
        let value: Value =
            serde_json::from_str(&render(&fixtures::index()).expect("json")).expect("parse");
        assert_eq!(value["project"]["name"], "shop");
        assert_eq!(value["analysis"]["architecturePatterns"][0], "MVC");
        assert_eq!(value["analysis"]["testCoverage"]["hasTests"], true);
        assert_eq!(value["metadata"]["totalFiles"], 5);
        assert_eq!(
            value["metadata"]["complexityDistribution"]
                .as_array()
                .map(Vec::len),
            Some(10)
        );
    }

    #[test]
    fn export_reads_back_into_an_index() {
        let index = fixtures::index();
        let parsed: ProjectIndex =
            serde_json::from_str(&render(&index).expect("json")).expect("deserialize");
        assert_eq!(parsed.files().len(), index.files().len());
        assert_eq!(parsed.analysis, index.analysis);
    }
}
