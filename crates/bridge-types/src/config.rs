//! Config document primitives shared across chain adapters: RPC endpoint
//! shape and a literal-or-environment-variable wrapper for signer material.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

/// An RPC endpoint and an optional client-side rate limit (requests/sec).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub http: Url,
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

/// Wraps a value that may be given literally in config, or as a reference
/// to an environment variable using `$VAR` or `${VAR}` syntax.
///
/// This keeps signer material (private keys, keypair paths) out of config
/// files committed to source control while still letting tests and local
/// development supply literals directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(T);

impl<T> LiteralOrEnv<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for LiteralOrEnv<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

fn resolve_env_reference(raw: &str) -> Option<String> {
    let var_name = raw
        .strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
        .or_else(|| raw.strip_prefix('$'))?;
    std::env::var(var_name).ok()
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let resolved = resolve_env_reference(&raw).unwrap_or(raw);
        resolved
            .parse::<T>()
            .map(LiteralOrEnv)
            .map_err(D::Error::custom)
    }
}

impl<T: fmt::Display> Serialize for LiteralOrEnv<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_dollar_brace_syntax() {
        // SAFETY: single-threaded test, no concurrent env mutation elsewhere in this process.
        unsafe { std::env::set_var("BRIDGE_TEST_VAR", "42") };
        let value: LiteralOrEnv<u32> = serde_json::from_str("\"${BRIDGE_TEST_VAR}\"").unwrap();
        assert_eq!(*value, 42);
    }

    #[test]
    fn accepts_literal_values() {
        let value: LiteralOrEnv<u32> = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(*value, 7);
    }

    #[test]
    fn rpc_config_deserializes() {
        let cfg: RpcConfig =
            serde_json::from_str("{\"http\":\"https://rpc.example/\",\"rate_limit\":5}").unwrap();
        assert_eq!(cfg.rate_limit, Some(5));
    }
}
