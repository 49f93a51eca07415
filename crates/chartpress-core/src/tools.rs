//! External tool names and argument vectors

use std::path::Path;

/// The Helm CLI
pub const HELM: &str = "helm";

/// The helm-docs documentation generator
pub const HELM_DOCS: &str = "helm-docs";

/// Extension of archives produced by `helm package`
pub const ARCHIVE_EXTENSION: &str = ".tgz";

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `helm version`
pub fn helm_version_args() -> Vec<String> {
    vec!["version".to_string()]
}

/// `helm dep up <chart>`
pub fn dependency_update_args(chart: &Path) -> Vec<String> {
    vec!["dep".to_string(), "up".to_string(), path_arg(chart)]
}

/// `helm package <chart> -d <dest>`
pub fn package_args(chart: &Path, dest: &Path) -> Vec<String> {
    vec![
        "package".to_string(),
        path_arg(chart),
        "-d".to_string(),
        path_arg(dest),
    ]
}

/// `helm-docs --version`
pub fn docs_version_args() -> Vec<String> {
    vec!["--version".to_string()]
}

/// `helm-docs -u publish -s alphanum`
pub fn docs_generate_args() -> Vec<String> {
    ["-u", "publish", "-s", "alphanum"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// `helm cm-push [-f] <archive> <repository>`
pub fn push_args(force: bool, archive: &Path, repository: &str) -> Vec<String> {
    let mut args = vec!["cm-push".to_string()];
    if force {
        args.push("-f".to_string());
    }
    args.push(path_arg(archive));
    args.push(repository.to_string());
    args
}
