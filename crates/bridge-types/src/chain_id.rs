//! CAIP-2 style chain identifiers: `eip155:<n>` for EVM, `solana:<cluster>` for SVM.
//!
//! The core treats a [`ChainId`] opaquely — only the namespace prefix is
//! ever inspected (e.g. to decide whether a chain is a candidate hub).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A stable, opaque chain identifier: `namespace:reference`.
///
/// Examples: `eip155:8453` (Base mainnet), `eip155:84532` (Base Sepolia),
/// `solana:mainnet`, `solana:devnet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId {
    namespace: String,
    reference: String,
}

impl ChainId {
    pub fn new(namespace: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn is_eip155(&self) -> bool {
        self.namespace == "eip155"
    }

    pub fn is_solana(&self) -> bool {
        self.namespace == "solana"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChainIdFormatError {
    #[error("chain id `{0}` is missing a `namespace:reference` separator")]
    MissingSeparator(String),
    #[error("chain id `{0}` has an empty namespace or reference")]
    EmptyComponent(String),
}

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, reference) = s
            .split_once(':')
            .ok_or_else(|| ChainIdFormatError::MissingSeparator(s.to_string()))?;
        if namespace.is_empty() || reference.is_empty() {
            return Err(ChainIdFormatError::EmptyComponent(s.to_string()));
        }
        Ok(ChainId::new(namespace, reference))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.to_string()
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ChainId::from_str(&raw).map_err(D::Error::custom)
    }
}

/// A pattern over chain ids, used by the route registry to recognize the
/// configured hub namespace/reference(s) without hard-coding a single id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIdPattern {
    /// Matches any reference within a namespace: `eip155:*`.
    Wildcard { namespace: String },
    /// Matches one exact chain id.
    Exact { namespace: String, reference: String },
    /// Matches any of a fixed set of references within a namespace:
    /// `eip155:{8453,84532}`.
    Set {
        namespace: String,
        references: HashSet<String>,
    },
}

impl ChainIdPattern {
    pub fn matches(&self, chain_id: &ChainId) -> bool {
        match self {
            ChainIdPattern::Wildcard { namespace } => namespace == chain_id.namespace(),
            ChainIdPattern::Exact {
                namespace,
                reference,
            } => namespace == chain_id.namespace() && reference == chain_id.reference(),
            ChainIdPattern::Set {
                namespace,
                references,
            } => namespace == chain_id.namespace() && references.contains(chain_id.reference()),
        }
    }
}

impl fmt::Display for ChainIdPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainIdPattern::Wildcard { namespace } => write!(f, "{namespace}:*"),
            ChainIdPattern::Exact {
                namespace,
                reference,
            } => write!(f, "{namespace}:{reference}"),
            ChainIdPattern::Set {
                namespace,
                references,
            } => {
                let mut refs: Vec<&str> = references.iter().map(String::as_str).collect();
                refs.sort_unstable();
                write!(f, "{namespace}:{{{}}}", refs.join(","))
            }
        }
    }
}

impl FromStr for ChainIdPattern {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = s
            .split_once(':')
            .ok_or_else(|| ChainIdFormatError::MissingSeparator(s.to_string()))?;
        if namespace.is_empty() {
            return Err(ChainIdFormatError::EmptyComponent(s.to_string()));
        }
        if rest == "*" {
            return Ok(ChainIdPattern::Wildcard {
                namespace: namespace.to_string(),
            });
        }
        if let Some(inner) = rest.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            let references: HashSet<String> = inner
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if references.is_empty() {
                return Err(ChainIdFormatError::EmptyComponent(s.to_string()));
            }
            return Ok(ChainIdPattern::Set {
                namespace: namespace.to_string(),
                references,
            });
        }
        if rest.is_empty() {
            return Err(ChainIdFormatError::EmptyComponent(s.to_string()));
        }
        Ok(ChainIdPattern::Exact {
            namespace: namespace.to_string(),
            reference: rest.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: ChainId = "eip155:8453".parse().unwrap();
        assert_eq!(id.namespace(), "eip155");
        assert_eq!(id.reference(), "8453");
        assert_eq!(id.to_string(), "eip155:8453");
        assert!(id.is_eip155());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(ChainId::from_str("eip1558453").is_err());
    }

    #[test]
    fn rejects_empty_components() {
        assert!(ChainId::from_str(":8453").is_err());
        assert!(ChainId::from_str("eip155:").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = ChainId::new("solana", "mainnet");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"solana:mainnet\"");
        let back: ChainId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn pattern_wildcard_matches_any_reference() {
        let pattern: ChainIdPattern = "eip155:*".parse().unwrap();
        assert!(pattern.matches(&ChainId::new("eip155", "8453")));
        assert!(pattern.matches(&ChainId::new("eip155", "84532")));
        assert!(!pattern.matches(&ChainId::new("solana", "mainnet")));
    }

    #[test]
    fn pattern_set_matches_members_only() {
        let pattern: ChainIdPattern = "eip155:{8453,84532}".parse().unwrap();
        assert!(pattern.matches(&ChainId::new("eip155", "8453")));
        assert!(pattern.matches(&ChainId::new("eip155", "84532")));
        assert!(!pattern.matches(&ChainId::new("eip155", "1")));
    }

    #[test]
    fn pattern_exact_matches_one_id() {
        let pattern: ChainIdPattern = "eip155:8453".parse().unwrap();
        assert!(pattern.matches(&ChainId::new("eip155", "8453")));
        assert!(!pattern.matches(&ChainId::new("eip155", "1")));
    }
}
