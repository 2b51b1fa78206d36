//! Build metadata reported by `stool version`.

use std::fmt;

/// Build and platform details captured at compile time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Program name
    pub name: &'static str,
    /// Version, always starting with `v`
    pub version: String,
    /// Build date, or `unknown`
    pub date: &'static str,
    /// Source commit, or `unknown`
    pub commit: &'static str,
    /// Target operating system
    pub os: &'static str,
    /// Target architecture
    pub arch: &'static str,
    /// Compiler version, or `unknown`
    pub rustc: &'static str,
}

impl BuildInfo {
    /// Collects the metadata of the running build
    pub fn current() -> Self {
        Self {
            name: "stool",
            version: normalize_version(crate::VERSION),
            date: option_env!("STOOL_BUILD_DATE").unwrap_or("unknown"),
            commit: option_env!("STOOL_BUILD_COMMIT").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            rustc: option_env!("STOOL_RUSTC_VERSION").unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.version)?;
        writeln!(f, "- build/date: {}", self.date)?;
        writeln!(f, "- build/commit: {}", self.commit)?;
        writeln!(f, "- os/type: {}", self.os)?;
        writeln!(f, "- os/arch: {}", self.arch)?;
        writeln!(f, "- rust/version: {}", self.rustc)
    }
}

/// Prefixes `v` unless already present
fn normalize_version(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{}", version)
    }
}
