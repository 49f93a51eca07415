//! End-to-end tests with stand-in `helm` and `git` executables
//!
//! The fake tools log their arguments and produce just enough output for the
//! pipeline to run: `helm package` copies the stamped manifest next to an
//! empty archive, and `git` reports a single `v1.0.0` tag.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const FAKE_HELM: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_TOOL_LOG"
if [ "$1" = "package" ]; then
  name=$(basename "$2")
  cp "$2/Chart.yaml" "$4/$name.Chart.yaml"
  touch "$4/$name-packaged.tgz"
fi
exit 0
"#;

const FAKE_HELM_DOCS: &str = r#"#!/bin/sh
echo "helm-docs $@ in $(pwd -P)" >> "$FAKE_TOOL_LOG"
exit 0
"#;

const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $@" >> "$FAKE_TOOL_LOG"
case "$1 $2" in
  "rev-parse --is-inside-work-tree") echo true ;;
  "describe --tags") echo v1.0.0 ;;
  *) exit 1 ;;
esac
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();

        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        install_script(&bin.join("helm"), FAKE_HELM);
        install_script(&bin.join("git"), FAKE_GIT);

        for name in ["test1", "test2"] {
            let chart = dir.path().join("src").join(name);
            fs::create_dir_all(chart.join("templates")).unwrap();
            fs::write(
                chart.join("Chart.yaml"),
                format!("apiVersion: v2\nname: {name}\nversion: 0.0.0-local\n"),
            )
            .unwrap();
            fs::write(chart.join("README.md"), "# Version 0.0.0-LOCAL\n").unwrap();
            fs::write(chart.join("values.yaml"), "tag: 0.0.0-local\n").unwrap();
        }

        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn run(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let path = format!(
            "{}:{}",
            self.path("bin").display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_chartpress"));
        cmd.current_dir(self.dir.path())
            .args(args)
            .env("PATH", path)
            .env("FAKE_TOOL_LOG", self.path("tools.log"))
            .env("HELM_PLUGIN_PATH", self.path("src"))
            .env("HELM_PLUGIN_PUBLISH_PATH", self.path("publish"))
            .env_remove("CHARTPRESS_CONFIG");
        cmd.envs(env.iter().copied());

        cmd.output().expect("Failed to execute chartpress")
    }

    fn log(&self) -> Vec<String> {
        fs::read_to_string(self.path("tools.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn packaged_manifest(&self, chart: &str) -> String {
        fs::read_to_string(self.path("publish").join(format!("{chart}.Chart.yaml"))).unwrap()
    }
}

fn install_script(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_prepare_packages_every_chart() {
    let ws = Workspace::new();

    let output = ws.run(&["prepare", "1.2.3"], &[]);
    assert_success(&output);

    let publish = ws.path("publish");
    let log = ws.log();
    for chart in ["test1", "test2"] {
        let chart_dir = publish.join(chart);
        let dep_up = format!("dep up {}", chart_dir.display());
        let package = format!("package {} -d {}", chart_dir.display(), publish.display());

        let dep_index = log.iter().position(|l| *l == dep_up);
        let package_index = log.iter().position(|l| *l == package);
        assert!(dep_index.is_some(), "missing `{dep_up}` in {log:?}");
        assert!(package_index.is_some(), "missing `{package}` in {log:?}");
        assert!(dep_index < package_index);

        assert!(ws.packaged_manifest(chart).contains("version: 1.2.3"));
        assert!(publish.join(format!("{chart}-packaged.tgz")).exists());
        assert!(!chart_dir.exists(), "staged chart {chart} should be removed");
    }

    // Sources keep the token
    let source = fs::read_to_string(ws.path("src/test1/Chart.yaml")).unwrap();
    assert!(source.contains("0.0.0-local"));
}

#[test]
fn test_prepare_runs_helm_docs_when_enabled() {
    let ws = Workspace::new();
    install_script(&ws.path("bin/helm-docs"), FAKE_HELM_DOCS);

    let output = ws.run(&["prepare", "1.2.3"], &[("HELM_PLUGIN_USE_HELM_DOCS", "true")]);
    assert_success(&output);

    let docs: Vec<_> = ws
        .log()
        .into_iter()
        .filter(|l| l.starts_with("helm-docs -u publish -s alphanum"))
        .collect();
    assert_eq!(docs.len(), 1);

    let publish = ws.path("publish").canonicalize().unwrap();
    assert_eq!(docs[0], format!("helm-docs -u publish -s alphanum in {}", publish.display()));
}

#[test]
fn test_push_force() {
    let ws = Workspace::new();
    assert_success(&ws.run(&["prepare", "1.2.3"], &[]));

    let output = ws.run(
        &["push"],
        &[
            ("HELM_PLUGIN_PUBLISH_REPOSITORY", "museum"),
            ("HELM_PLUGIN_FORCE_PUSH", "true"),
        ],
    );
    assert_success(&output);

    let pushes: Vec<_> = ws
        .log()
        .into_iter()
        .filter(|l| l.starts_with("cm-push"))
        .collect();
    assert_eq!(pushes.len(), 2);
    assert!(pushes.iter().all(|l| l.starts_with("cm-push -f ") && l.ends_with(" museum")));
}

#[test]
fn test_publish_stamps_next_version() {
    let ws = Workspace::new();

    let output = ws.run(&["publish", "--bump", "minor"], &[]);
    assert_success(&output);

    assert!(ws.packaged_manifest("test1").contains("version: v1.1.0"));
    assert!(!ws.log().iter().any(|l| l.starts_with("cm-push")));
}

#[test]
fn test_publish_without_version_prefix_and_push() {
    let ws = Workspace::new();

    let output = ws.run(
        &["publish", "--bump", "patch", "--no-version-prefix"],
        &[
            ("HELM_PLUGIN_PUSH", "1"),
            ("HELM_PLUGIN_PUBLISH_REPOSITORY", "museum"),
        ],
    );
    assert_success(&output);

    assert!(ws.packaged_manifest("test2").contains("version: 1.0.1"));
    let pushes = ws.log().into_iter().filter(|l| l.starts_with("cm-push ")).count();
    assert_eq!(pushes, 2);
}

#[test]
fn test_previous_version() {
    let ws = Workspace::new();

    let output = ws.run(&["previous-version"], &[]);
    assert_success(&output);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "v1.0.0");
}

#[test]
fn test_before_run_fails_without_helm_docs() {
    let ws = Workspace::new();

    // Only the fake bin directory, so helm-docs cannot be found
    let output = ws.run(
        &["before-run"],
        &[
            ("HELM_PLUGIN_USE_HELM_DOCS", "true"),
            ("PATH", ws.path("bin").to_str().unwrap()),
        ],
    );

    assert_eq!(output.status.code(), Some(3));
}
