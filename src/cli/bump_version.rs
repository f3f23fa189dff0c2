//! `cubeai bump-version` — increment the version stored in the config.
//!
//! The config carries `version = "major.minor.patch+build"`. The default
//! bump increments the patch and the build number; `--build` touches the
//! build number only. Rewrites use `toml_edit` so the rest of the file
//! keeps its formatting and comments.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use toml_edit::{value, DocumentMut};

/// Rewrite the version field in the config file.
pub fn run(build_only: bool, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => crate::config::AppConfig::default_path()?,
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;

    let mut doc: DocumentMut = content.parse().context("failed to parse config")?;
    let current = doc
        .get("version")
        .and_then(|v| v.as_str())
        .context("config has no version field")?;

    let bumped = bump(current, build_only)?;
    println!("{} -> {}", current, bumped);
    doc["version"] = value(&bumped);

    fs::write(&path, doc.to_string())
        .with_context(|| format!("failed to write config at {}", path.display()))?;
    Ok(())
}

/// Compute the next version string.
fn bump(version: &str, build_only: bool) -> Result<String> {
    let (semver, build) = version.split_once('+').unwrap_or((version, "0"));
    let build: u64 = build
        .parse()
        .with_context(|| format!("invalid build number in version '{}'", version))?;

    let parts: Vec<&str> = semver.split('.').collect();
    if parts.len() != 3 {
        bail!("version '{}' is not major.minor.patch", version);
    }
    let major: u64 = parts[0].parse().context("invalid major version")?;
    let minor: u64 = parts[1].parse().context("invalid minor version")?;
    let mut patch: u64 = parts[2].parse().context("invalid patch version")?;

    if !build_only {
        patch += 1;
    }
    Ok(format!("{}.{}.{}+{}", major, minor, patch, build + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_bump_increments_patch_and_build() {
        assert_eq!(bump("0.3.1+14", false).unwrap(), "0.3.2+15");
    }

    #[test]
    fn build_bump_leaves_semver_alone() {
        assert_eq!(bump("0.3.1+14", true).unwrap(), "0.3.1+15");
    }

    #[test]
    fn missing_build_number_starts_at_one() {
        assert_eq!(bump("1.2.3", true).unwrap(), "1.2.3+1");
    }

    #[test]
    fn malformed_versions_rejected() {
        assert!(bump("1.2", false).is_err());
        assert!(bump("a.b.c", false).is_err());
        assert!(bump("1.2.3+x", false).is_err());
    }

    #[test]
    fn rewrite_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubeai.toml");
        fs::write(&path, "version = \"0.1.0+3\"\n\n[api]\nbase_url = \"http://x\"\n").unwrap();

        run(true, Some(path.clone())).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("version = \"0.1.0+4\""));
        assert!(content.contains("base_url = \"http://x\""));
    }
}
