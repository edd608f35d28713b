//! # App Version Ordering
//!
//! Dotted app versions (`"5.6.2"`) compared component-wise as integers.
//! Missing trailing components count as zero, so `"1.0"` equals `"1"`.
//! Parsing never fails: a component that is not a non-negative integer
//! counts as zero, and one too large for `u64` saturates.

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;

/// A parsed dotted version.
///
/// Equality and ordering ignore trailing zero components.
#[derive(Debug, Clone)]
pub struct AppVersion {
    parts: Vec<u64>,
    raw: String,
}

impl AppVersion {
    /// Parse a dotted version string.
    pub fn parse(raw: &str) -> Self {
        let parts = raw
            .split('.')
            .map(component)
            .collect();
        Self {
            parts,
            raw: raw.to_string(),
        }
    }

    /// Numeric components in order.
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// The string this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn component(part: &str) -> u64 {
    match part.trim().parse::<u64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => 0,
    }
}

impl From<&str> for AppVersion {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for AppVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for AppVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AppVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AppVersion {}

/// Compare two dotted version strings numerically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    AppVersion::parse(a).cmp(&AppVersion::parse(b))
}
