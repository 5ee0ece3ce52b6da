//! Newtype wrappers for solution identifiers.
//!
//! All newtypes serialize/deserialize as plain strings so the persisted
//! documents keep their wire format.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_newtype!(
    /// Normalized solution name: lowercase, spaces replaced with hyphens.
    /// Keys the `active` map and the availability view.
    SolutionName
);

string_newtype!(
    /// Identifier of one mounted solution version, `<name>-<version>`.
    SolutionId
);

impl SolutionName {
    /// Normalize a display name as published by an archive.
    pub fn normalized(display_name: &str) -> Self {
        Self(display_name.replace(' ', "-").to_lowercase())
    }
}

impl SolutionId {
    pub fn for_version(name: &SolutionName, version: &str) -> Self {
        Self(format!("{name}-{version}"))
    }
}

/// Wire value selecting the `latest` mounted version.
pub const LATEST: &str = "latest";

/// Version selector recorded in the `active` map: either a concrete version
/// string or the `latest` sentinel. Serializes as the plain wire string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VersionSelector {
    Latest,
    Exact(String),
}

impl VersionSelector {
    pub fn as_str(&self) -> &str {
        match self {
            VersionSelector::Latest => LATEST,
            VersionSelector::Exact(version) => version,
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, VersionSelector::Latest)
    }
}

impl From<String> for VersionSelector {
    fn from(s: String) -> Self {
        if s == LATEST {
            VersionSelector::Latest
        } else {
            VersionSelector::Exact(s)
        }
    }
}

impl From<VersionSelector> for String {
    fn from(selector: VersionSelector) -> Self {
        selector.as_str().to_owned()
    }
}

impl FromStr for VersionSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_display_names() {
        assert_eq!(SolutionName::normalized("Example Solution").as_str(), "example-solution");
        assert_eq!(SolutionName::normalized("simple").as_str(), "simple");
        assert_eq!(SolutionName::normalized("Already-Hyphenated").as_str(), "already-hyphenated");
    }

    #[test]
    fn id_combines_name_and_version() {
        let name = SolutionName::normalized("Example Solution");
        let id = SolutionId::for_version(&name, "1.2.0");
        assert_eq!(id.as_str(), "example-solution-1.2.0");
    }

    #[test]
    fn selector_parses_latest_sentinel() {
        let selector: VersionSelector = "latest".parse().unwrap();
        assert!(selector.is_latest());
        let selector: VersionSelector = "1.0.0".parse().unwrap();
        assert_eq!(selector, VersionSelector::Exact("1.0.0".to_owned()));
    }

    #[test]
    fn selector_serializes_as_wire_string() {
        let yaml = serde_yaml::to_string(&VersionSelector::Latest).unwrap();
        assert_eq!(yaml.trim(), "latest");
        let yaml = serde_yaml::to_string(&VersionSelector::Exact("2.3.4".to_owned())).unwrap();
        assert_eq!(yaml.trim(), "2.3.4");
    }

    #[test]
    fn selector_roundtrips_through_yaml() {
        for raw in ["latest", "1.0.0-beta"] {
            let selector: VersionSelector = serde_yaml::from_str(raw).unwrap();
            assert_eq!(selector.as_str(), raw);
            let back = serde_yaml::to_string(&selector).unwrap();
            assert_eq!(back.trim(), raw);
        }
    }

    #[test]
    fn name_serde_roundtrip() {
        let name = SolutionName::normalized("Example Solution");
        let yaml = serde_yaml::to_string(&name).unwrap();
        assert_eq!(yaml.trim(), "example-solution");
        let back: SolutionName = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, name);
    }
}
