//! Version-like values for snap versions and track names
//!
//! Snap versions are not always valid semver (`2021.12.0.dev20211120`,
//! `0.118.0b1`) and track names are often partial (`0.118`) or plain words
//! (`latest`). [`Version`] accepts all of them, keeps the original string for
//! display, and still provides a total order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;

/// Name of the rolling track, ordered after every other version
pub const LATEST: &str = "latest";

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+(?:\.\d+)*)").expect("valid numeric prefix regex"));

static DEV_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.dev\d*|dev\d+)$").expect("valid dev suffix regex"));

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "0.118" -> Version(0, 118, 0)
/// - "2023.10.1" -> Version(2023, 10, 1)
/// - "2021.12.0.dev0" -> None
fn parse_semver(version: &str) -> Option<semver::Version> {
    let version = version.strip_prefix('v').unwrap_or(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    semver::Version::parse(&normalized).ok()
}

/// Coarse ordering class: numeric versions < other words < `latest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Numeric,
    Word,
    Latest,
}

/// A parsed version or track name
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    sections: Vec<u64>,
    semver: Option<semver::Version>,
}

impl Version {
    /// Parse a version string. Never fails; unparseable strings become
    /// non-numeric versions ordered lexically.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let sections = NUMERIC_PREFIX
            .captures(raw)
            .map(|caps| {
                caps[1]
                    .split('.')
                    .map_while(|s| s.parse::<u64>().ok())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            raw: raw.to_string(),
            sections,
            semver: parse_semver(raw),
        }
    }

    /// The original string, unchanged
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric section `index` (0 = major, 1 = minor, ...)
    pub fn section(&self, index: usize) -> Option<u64> {
        self.sections.get(index).copied()
    }

    /// The `major.minor` line this version belongs to, e.g. "2023.10" for
    /// "2023.10.1". Missing minor sections count as 0.
    pub fn major_minor(&self) -> Option<String> {
        let major = self.section(0)?;
        Some(format!("{}.{}", major, self.section(1).unwrap_or(0)))
    }

    /// Whether this is a development build: ends in `.dev`, `.devN` or `devN`
    pub fn is_dev(&self) -> bool {
        DEV_SUFFIX.is_match(&self.raw)
    }

    pub fn is_latest(&self) -> bool {
        self.raw == LATEST
    }

    fn class(&self) -> Class {
        if self.is_latest() {
            Class::Latest
        } else if self.sections.is_empty() {
            Class::Word
        } else {
            Class::Numeric
        }
    }
}

/// Compare numeric sections, treating missing trailing sections as 0
fn compare_sections(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class()
            .cmp(&other.class())
            .then_with(|| compare_sections(&self.sections, &other.sections))
            .then_with(|| match (&self.semver, &other.semver) {
                // Only pre-release and build metadata can still differ here
                (Some(a), Some(b)) => a.cmp(b),
                _ => Ordering::Equal,
            })
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.117", "0.118")]
    #[case("0.118", "2023.10")]
    #[case("2023.9", "2023.10")]
    #[case("2023.10.0", "2023.10.1")]
    #[case("1.0.0-beta.1", "1.0.0")]
    #[case("2021.12.0.dev0", "2021.12.1")]
    #[case("2023.10", "stable")] // words sort after numeric versions
    #[case("stable", "latest")]
    #[case("2099.1", "latest")]
    fn cmp_orders_lower_before_higher(#[case] lower: &str, #[case] higher: &str) {
        let lower = Version::parse(lower);
        let higher = Version::parse(higher);

        assert_eq!(lower.cmp(&higher), Ordering::Less);
        assert_eq!(higher.cmp(&lower), Ordering::Greater);
    }

    #[test]
    fn cmp_is_equal_only_for_identical_strings() {
        assert_eq!(
            Version::parse("0.118").cmp(&Version::parse("0.118")),
            Ordering::Equal
        );
        assert_ne!(
            Version::parse("0.118").cmp(&Version::parse("0.118.0")),
            Ordering::Equal
        );
    }

    #[rstest]
    #[case("2023.10.1", Some(2023), Some(10), Some(1))]
    #[case("0.118", Some(0), Some(118), None)]
    #[case("2021.12.0.dev20211120", Some(2021), Some(12), Some(0))]
    #[case("v1.2.3", Some(1), Some(2), Some(3))]
    #[case("latest", None, None, None)]
    fn section_returns_numeric_parts(
        #[case] raw: &str,
        #[case] major: Option<u64>,
        #[case] minor: Option<u64>,
        #[case] patch: Option<u64>,
    ) {
        let version = Version::parse(raw);

        assert_eq!(version.section(0), major);
        assert_eq!(version.section(1), minor);
        assert_eq!(version.section(2), patch);
    }

    #[rstest]
    #[case("2.5.3", Some("2.5"))]
    #[case("0.118.0", Some("0.118"))]
    #[case("2022", Some("2022.0"))]
    #[case("latest", None)]
    fn major_minor_returns_track_line(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            Version::parse(raw).major_minor(),
            expected.map(|s| s.to_string())
        );
    }

    #[rstest]
    #[case("2021.12.0.dev20211120", true)]
    #[case("0.118.0.dev0", true)]
    #[case("0.118.0dev0", true)]
    #[case("2023.11.0.dev", true)]
    #[case("2023.10.1", false)]
    #[case("2023.10.1-devices", false)]
    #[case("dev-2023.10", false)]
    #[case("2023.10.1-webdev", false)]
    fn is_dev_detects_development_builds(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(Version::parse(raw).is_dev(), expected);
    }

    #[test]
    fn display_keeps_original_string() {
        assert_eq!(Version::parse("0.118.0b1").to_string(), "0.118.0b1");
        assert_eq!(Version::parse("0.118").to_string(), "0.118");
    }

    #[test]
    fn compares_against_plain_strings() {
        assert!(Version::parse("latest") == "latest");
        assert!(Version::parse("latest").is_latest());
        assert!(!Version::parse("0.118").is_latest());
    }
}
