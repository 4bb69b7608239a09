//! `tokenMappings[srcChain->dstChain][srcToken] -> dstToken`, used by both
//! route adapters to reject a token transfer with no registered
//! counterpart asset.

use std::collections::HashMap;

use bridge_types::ChainId;

#[derive(Debug, Clone, Default)]
pub struct TokenMappings {
    entries: HashMap<(ChainId, ChainId), HashMap<String, String>>,
}

impl TokenMappings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: ChainId, destination: ChainId, source_token: impl Into<String>, destination_token: impl Into<String>) {
        self.entries
            .entry((source, destination))
            .or_default()
            .insert(source_token.into(), destination_token.into());
    }

    pub fn lookup(&self, source: &ChainId, destination: &ChainId, source_token: &str) -> Option<&str> {
        self.entries
            .get(&(source.clone(), destination.clone()))
            .and_then(|m| m.get(source_token))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_mapping_returns_none() {
        let mappings = TokenMappings::new();
        let svm = ChainId::new("solana", "mainnet");
        let evm = ChainId::new("eip155", "8453");
        assert!(mappings.lookup(&svm, &evm, "mint").is_none());
    }

    #[test]
    fn registered_mapping_round_trips() {
        let mut mappings = TokenMappings::new();
        let svm = ChainId::new("solana", "mainnet");
        let evm = ChainId::new("eip155", "8453");
        mappings.insert(svm.clone(), evm.clone(), "MintAddr111", "0xToken");
        assert_eq!(mappings.lookup(&svm, &evm, "MintAddr111"), Some("0xToken"));
        assert!(mappings.lookup(&evm, &svm, "MintAddr111").is_none());
    }
}
