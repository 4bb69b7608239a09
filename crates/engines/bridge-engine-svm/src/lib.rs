//! The SVM source engine: SVM-originated bridge sends (native, token,
//! wrapped-token, arbitrary call, wrap-token metadata creation), and the
//! prove+execute terminal steps for EVM→SVM messages.

pub mod engine;
pub mod error;
pub mod keypair_cache;
pub mod pda;
pub mod program;
pub mod salt;

pub use engine::{
    BridgeOpOptions, IncomingMessageStatus, InitiatedMessage, NestedCallSpec, PayerSource,
    ProveResult, SvmEngine, SvmEngineConfig,
};
pub use error::SvmEngineError;
pub use keypair_cache::KeypairCache;
