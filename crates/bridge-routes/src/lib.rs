//! Route adapters, the route registry, and the generic polling monitor
//! that together implement the chain-agnostic `RouteAdapter` contract:
//! `capabilities`, `initiate`, `prove`, `execute`, `status`, `monitor`.

pub mod adapter;
pub mod evm_to_svm;
pub mod monitor;
pub mod registry;
pub mod svm_to_evm;
pub mod token_mappings;
mod util;

pub use adapter::{MonitorExt, RouteAdapter};
pub use evm_to_svm::EvmToSvmRoute;
pub use monitor::{MonitorOptions, MonitorStream};
pub use registry::{RouteFactory, RouteRegistry};
pub use svm_to_evm::SvmToEvmRoute;
pub use token_mappings::TokenMappings;
