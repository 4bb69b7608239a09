//! The static program-derived-address seed table, shared with the
//! on-chain programs. Baked as read-only byte slices; never parsed from
//! an IDL at runtime.

/// Seeds the bridge program's config/state account.
pub const BRIDGE_SEED: &[u8] = b"bridge";
/// Seeds the SOL vault PDA that custodies native SOL pending bridging.
pub const SOL_VAULT_SEED: &[u8] = b"sol_vault";
/// Seeds a per-mint token vault PDA: `(TOKEN_VAULT_SEED, mint, remoteToken)`.
pub const TOKEN_VAULT_SEED: &[u8] = b"token_vault";
/// Seeds an outgoing message PDA: `(OUTGOING_MESSAGE_SEED, salt)`.
pub const OUTGOING_MESSAGE_SEED: &[u8] = b"outgoing_message";
/// Seeds an incoming message PDA: `(INCOMING_MESSAGE_SEED, messageHash)`.
pub const INCOMING_MESSAGE_SEED: &[u8] = b"incoming_message";
/// Seeds the account recording the latest observed hub output root.
pub const OUTPUT_ROOT_SEED: &[u8] = b"output_root";
/// Seeds a deterministic wrapped-token mint PDA.
pub const WRAPPED_TOKEN_SEED: &[u8] = b"wrapped_token";
/// Seeds the bridge program's CPI authority, used by the relay instruction.
pub const BRIDGE_CPI_AUTHORITY_SEED: &[u8] = b"bridge_cpi_authority";
/// Seeds the relayer program's config account.
pub const CFG_SEED: &[u8] = b"cfg";
/// Seeds the relayer program's per-message metering account.
pub const MTR_SEED: &[u8] = b"mtr";
