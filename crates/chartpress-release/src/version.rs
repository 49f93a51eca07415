//! Release version arithmetic
//!
//! Version strings are parsed with `semver`; the increment rules follow the
//! node-semver conventions release tooling expects:
//! - `1.2.3` + `patch` = `1.2.4`, but `1.2.4-rc.0` + `patch` = `1.2.4`
//! - `1.2.3` + `prerelease` with id `next` = `1.2.4-next.0`
//! - `1.2.4-next.0` + `prerelease` with id `next` = `1.2.4-next.1`
//!
//! Every function returns `None` when the input version or bump kind cannot be
//! interpreted; callers treat that as "no release", not as an error.

use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// Semantic version bump requested by the release host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
}

impl BumpKind {
    /// Parse a lowercase bump name; unknown names yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "major" => Some(Self::Major),
            "minor" => Some(Self::Minor),
            "patch" => Some(Self::Patch),
            "premajor" => Some(Self::Premajor),
            "preminor" => Some(Self::Preminor),
            "prepatch" => Some(Self::Prepatch),
            "prerelease" => Some(Self::Prerelease),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Premajor => "premajor",
            Self::Preminor => "preminor",
            Self::Prepatch => "prepatch",
            Self::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a version, tolerating surrounding whitespace and a `v` or `=` prefix
pub fn parse_version(value: &str) -> Option<Version> {
    let trimmed = value.trim().trim_start_matches(['=', 'v']);
    Version::parse(trimmed.trim()).ok()
}

/// Increment `version` by `bump`, starting prereleases at `identifier.0`
pub fn inc(version: &str, bump: BumpKind, identifier: Option<&str>) -> Option<String> {
    let mut v = parse_version(version)?;
    v.build = BuildMetadata::EMPTY;

    let mut pre: Vec<String> = if v.pre.is_empty() {
        Vec::new()
    } else {
        v.pre.as_str().split('.').map(str::to_string).collect()
    };

    match bump {
        BumpKind::Major => {
            if v.minor != 0 || v.patch != 0 || pre.is_empty() {
                v.major += 1;
            }
            v.minor = 0;
            v.patch = 0;
            pre.clear();
        }
        BumpKind::Minor => {
            if v.patch != 0 || pre.is_empty() {
                v.minor += 1;
            }
            v.patch = 0;
            pre.clear();
        }
        BumpKind::Patch => {
            if pre.is_empty() {
                v.patch += 1;
            }
            pre.clear();
        }
        BumpKind::Premajor => {
            pre.clear();
            v.major += 1;
            v.minor = 0;
            v.patch = 0;
            bump_prerelease(&mut pre, identifier);
        }
        BumpKind::Preminor => {
            pre.clear();
            v.minor += 1;
            v.patch = 0;
            bump_prerelease(&mut pre, identifier);
        }
        BumpKind::Prepatch => {
            pre.clear();
            v.patch += 1;
            bump_prerelease(&mut pre, identifier);
        }
        BumpKind::Prerelease => {
            if pre.is_empty() {
                v.patch += 1;
            }
            bump_prerelease(&mut pre, identifier);
        }
    }

    v.pre = if pre.is_empty() {
        Prerelease::EMPTY
    } else {
        Prerelease::new(&pre.join(".")).ok()?
    };

    Some(v.to_string())
}

/// [`inc`] with the bump given by name
pub fn inc_named(version: &str, bump: &str, identifier: Option<&str>) -> Option<String> {
    inc(version, BumpKind::parse(bump)?, identifier)
}

/// Increment the last numeric prerelease component, or start a new series
fn bump_prerelease(pre: &mut Vec<String>, identifier: Option<&str>) {
    if pre.is_empty() {
        pre.push("0".to_string());
    } else {
        let last_numeric = pre
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, part)| part.parse::<u64>().ok().map(|n| (i, n)));

        match last_numeric {
            Some((i, n)) => pre[i] = (n + 1).to_string(),
            None => pre.push("0".to_string()),
        }
    }

    if let Some(id) = identifier.filter(|id| !id.is_empty()) {
        let continues_series =
            pre[0] == id && pre.get(1).is_some_and(|p| p.parse::<u64>().is_ok());
        if !continues_series {
            *pre = vec![id.to_string(), "0".to_string()];
        }
    }
}

/// Whether `a` sorts strictly before `b` (unparsable versions never do)
pub fn is_lower(a: &str, b: &str) -> bool {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

/// Compute the next prerelease version on branch `tag`
///
/// The prerelease derived from the last stable release wins when it is ahead
/// of `current`; otherwise `current` itself is advanced.
pub fn determine_next_version(
    last_release: &str,
    current: &str,
    bump: &str,
    tag: &str,
) -> Option<String> {
    let from_release = BumpKind::parse(&format!("pre{}", bump))
        .and_then(|kind| inc(last_release, kind, Some(tag)));

    match from_release {
        Some(next) if is_lower(current, &next) => Some(next),
        _ => inc(current, BumpKind::Prerelease, Some(tag)),
    }
}

/// Apply the release tag prefix (`v`) unless disabled or already present
pub fn prefix_release(version: &str, no_version_prefix: bool) -> String {
    if no_version_prefix || version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}
