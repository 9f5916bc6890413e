use anyhow::{Context, Result, anyhow};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A package id paired with an exact version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub id: String,
    pub version: Version,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Check whether this identity refers to the given id, ignoring case.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

impl FromStr for PackageIdentity {
    type Err = anyhow::Error;

    /// Parses `Id@Version`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = s
            .rsplit_once('@')
            .ok_or_else(|| anyhow!("Invalid package identity '{}'. Expected 'id@version'.", s))?;
        if id.is_empty() {
            anyhow::bail!("Invalid package identity '{}': id cannot be empty.", s);
        }
        let version = Version::parse(version)
            .with_context(|| format!("Invalid version in package identity '{}'", s))?;
        Ok(Self::new(id, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_parse() {
        let identity: PackageIdentity = "Foo@1.2.3".parse().unwrap();
        assert_eq!(identity.id, "Foo");
        assert_eq!(identity.version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_identity_parse_prerelease() {
        let identity: PackageIdentity = "Foo.Bar@2.0.0-beta.1".parse().unwrap();
        assert_eq!(identity.id, "Foo.Bar");
        assert!(!identity.version.pre.is_empty());
    }

    #[test]
    fn test_identity_parse_invalid() {
        assert!("Foo".parse::<PackageIdentity>().is_err());
        assert!("@1.0.0".parse::<PackageIdentity>().is_err());
        assert!("Foo@".parse::<PackageIdentity>().is_err());
        assert!("Foo@not-a-version".parse::<PackageIdentity>().is_err());
    }

    #[test]
    fn test_identity_display() {
        let identity = PackageIdentity::new("Foo", Version::new(1, 0, 0));
        assert_eq!(identity.to_string(), "Foo 1.0.0");
    }

    #[test]
    fn test_identity_equality_is_exact() {
        let a = PackageIdentity::new("Foo", Version::new(1, 0, 0));
        let b = PackageIdentity::new("Foo", Version::new(1, 0, 0));
        let c = PackageIdentity::new("foo", Version::new(1, 0, 0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.has_id("foo"));
    }
}
