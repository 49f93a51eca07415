//! In-place text rewriting of chart metadata files
//!
//! Only a chart's readme, manifest and lock file are ever rewritten. Templates
//! and other chart contents are left untouched. Rewriting works on raw bytes,
//! so files that are not valid UTF-8 pass through unchanged apart from the
//! matched spans.

use once_cell::sync::Lazy;
use regex::bytes::{self, NoExpand};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};

use crate::error::{ChartError, Result};

static MATCHED_FILE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^(readme\.md|chart\.ya?ml|chart\.lock)$")
        .case_insensitive(true)
        .build()
        .expect("valid matched-file pattern")
});

static FILE_REFERENCE: Lazy<bytes::Regex> = Lazy::new(|| {
    bytes::Regex::new(r"file://(?-u:\S)+").expect("valid file reference pattern")
});

/// Whether a file name is one of the rewritable chart metadata files
///
/// The whole name must be `README.md`, `Chart.yaml`, `Chart.yml` or
/// `Chart.lock` in any case. Names that merely contain one of them, such as
/// `myreadme.md` or `Chart.yaml.bak`, do not match.
pub fn is_matched_file(name: &str) -> bool {
    MATCHED_FILE.is_match(name)
}

/// List the rewritable metadata files directly inside a chart directory
pub fn find_matching_chart_files(chart_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(chart_path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if is_matched_file(&entry.file_name().to_string_lossy()) {
            files.push(entry.path());
        }
    }

    Ok(files)
}

/// Read a whole file, transform it, and write the result back
pub fn inline_replace(path: &Path, replacer: impl FnOnce(&[u8]) -> Vec<u8>) -> Result<()> {
    tracing::debug!("Inline replacement for {}", path.display());

    let contents = std::fs::read(path).map_err(|e| ChartError::Rewrite {
        path: path.display().to_string(),
        source: e,
    })?;

    std::fs::write(path, replacer(&contents)).map_err(|e| ChartError::Rewrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// Compile a case-insensitive matcher for a literal version token
pub fn version_token_pattern(token: &str) -> Result<bytes::Regex> {
    Ok(bytes::RegexBuilder::new(&regex::escape(token))
        .case_insensitive(true)
        .build()?)
}

/// Replace every occurrence of the token, in any case, with `version`
pub fn replace_version_token(contents: &[u8], token: &bytes::Regex, version: &str) -> Vec<u8> {
    token
        .replace_all(contents, NoExpand(version.as_bytes()))
        .into_owned()
}

/// Replace every `file://...` reference with a quoted repository name
pub fn replace_file_references(contents: &[u8], repository: &str) -> Vec<u8> {
    let quoted = format!("'{}'", repository);
    FILE_REFERENCE
        .replace_all(contents, NoExpand(quoted.as_bytes()))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_matched_file_names() {
        for name in ["README.md", "readme.md", "Chart.yaml", "chart.yml", "Chart.lock", "CHART.YAML"] {
            assert!(is_matched_file(name), "{name} should match");
        }
        for name in ["values.yaml", "Chart.yaml.bak", "NOTES.txt", "myreadme.md"] {
            assert!(!is_matched_file(name), "{name} should not match");
        }
    }

    #[test]
    fn test_find_matching_chart_files_skips_dirs_and_templates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Chart.yaml"), "name: app").unwrap();
        std::fs::write(dir.path().join("README.md"), "# app").unwrap();
        std::fs::write(dir.path().join("values.yaml"), "a: 1").unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join("templates").join("Chart.yaml"), "x").unwrap();

        let mut names: Vec<String> = find_matching_chart_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["Chart.yaml", "README.md"]);
    }

    #[test]
    fn test_replace_version_token_mixed_case() {
        let token = version_token_pattern("0.0.0-local").unwrap();
        let out = replace_version_token(b"0.0.0-local\ntest\n0.0.0-LOCAL", &token, "1234");
        assert_eq!(out, b"1234\ntest\n1234");
    }

    #[test]
    fn test_replace_version_token_is_literal() {
        let token = version_token_pattern("0.0.0-local").unwrap();
        let input = b"version: 010203-local";
        assert_eq!(replace_version_token(input, &token, "1.0.0"), input);
    }

    #[test]
    fn test_replace_version_token_does_not_expand_captures() {
        let token = version_token_pattern("0.0.0-local").unwrap();
        assert_eq!(replace_version_token(b"v: 0.0.0-local", &token, "$1"), b"v: $1");
    }

    #[test]
    fn test_replace_file_references() {
        let out = replace_file_references(
            b"test:  file://../some/path\nkey2:     file://../../otherPath",
            "testrepo",
        );
        assert_eq!(out, b"test:  'testrepo'\nkey2:     'testrepo'");
    }

    #[test]
    fn test_replace_file_references_without_match() {
        let input = b"repository: https://charts.example.com";
        assert_eq!(replace_file_references(input, "testrepo"), input);
    }

    #[test]
    fn test_inline_replace_rewrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Chart.yaml");
        std::fs::write(&path, "version: 0.0.0-local\nappVersion: 0.0.0-Local\n").unwrap();

        let token = version_token_pattern("0.0.0-local").unwrap();
        inline_replace(&path, |c| replace_version_token(c, &token, "2.1.0")).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "version: 2.1.0\nappVersion: 2.1.0\n");
    }

    #[test]
    fn test_inline_replace_without_token_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        let original = "# chart\r\n\r\nno placeholder here \u{00e9}\n";
        std::fs::write(&path, original).unwrap();

        let token = version_token_pattern("0.0.0-local").unwrap();
        inline_replace(&path, |c| replace_version_token(c, &token, "2.1.0")).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), original.as_bytes());
    }

    #[test]
    fn test_inline_replace_non_utf8_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, b"# caf\xe9 chart 0.0.0-local\n").unwrap();

        let token = version_token_pattern("0.0.0-local").unwrap();
        inline_replace(&path, |c| replace_version_token(c, &token, "2.1.0")).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"# caf\xe9 chart 2.1.0\n");
    }

    #[test]
    fn test_inline_replace_non_utf8_file_without_token_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        let original = b"# caf\xe9 chart\n";
        std::fs::write(&path, original).unwrap();

        let token = version_token_pattern("0.0.0-local").unwrap();
        inline_replace(&path, |c| replace_version_token(c, &token, "2.1.0")).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_replace_file_references_with_latin1_path() {
        let out = replace_file_references(b"repository: file://../caf\xe9\nname: x\n", "testrepo");
        assert_eq!(out, b"repository: 'testrepo'\nname: x\n");
    }

    #[test]
    fn test_inline_replace_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = inline_replace(&dir.path().join("Chart.yaml"), |c| c.to_vec()).unwrap_err();
        assert!(matches!(err, ChartError::Rewrite { .. }));
    }
}
