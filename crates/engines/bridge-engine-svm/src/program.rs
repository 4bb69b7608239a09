//! Instruction encoding and account-layout decoding for the bridge and
//! relayer programs. Binary encoding of the on-chain programs' own
//! instructions and accounts is treated as an external collaborator's
//! concern, generated-client-shaped rather than IDL-parsed at runtime;
//! the engine above only orchestrates PDA derivation, signer resolution,
//! and submission. Account layouts here mirror the on-chain programs'
//! fields one at a time rather than parsing an IDL document at runtime.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

/// One-byte instruction discriminants. A real client would derive these
/// from the program's IDL (e.g. an 8-byte Anchor sighash); this SDK bakes
/// a flat byte table instead, consistent with the rest of the protocol's
/// "no IDL parsed at runtime" stance.
mod discriminant {
    pub const BRIDGE_NATIVE: u8 = 1;
    pub const BRIDGE_TOKEN: u8 = 2;
    pub const BRIDGE_WRAPPED: u8 = 3;
    pub const BRIDGE_CALL: u8 = 4;
    pub const WRAP_TOKEN_METADATA: u8 = 5;
    pub const PAY_FOR_RELAY: u8 = 6;
    pub const PROVE_INCOMING_MESSAGE: u8 = 7;
    pub const RELAY_MESSAGE: u8 = 8;
}

fn instruction_data(discriminant: u8, args: impl BorshSerialize) -> Vec<u8> {
    let mut data = vec![discriminant];
    args.serialize(&mut data).expect("borsh serialization of fixed-shape args cannot fail");
    data
}

#[derive(BorshSerialize)]
struct BridgeNativeArgs {
    salt: [u8; 32],
    to: [u8; 32],
    amount: u64,
    gas_limit: u64,
    nested_call: Option<NestedCallArgs>,
}

#[derive(BorshSerialize)]
struct BridgeTokenArgs {
    salt: [u8; 32],
    to: [u8; 32],
    remote_token: [u8; 32],
    amount: u64,
    gas_limit: u64,
    nested_call: Option<NestedCallArgs>,
}

#[derive(BorshSerialize)]
struct NestedCallArgs {
    call_type: u8,
    to: [u8; 32],
    value: u128,
    data: Vec<u8>,
}

#[derive(BorshSerialize)]
struct BridgeCallArgs {
    salt: [u8; 32],
    to: [u8; 32],
    value: u128,
    data: Vec<u8>,
    call_type: u8,
    gas_limit: u64,
}

#[derive(BorshSerialize)]
struct WrapTokenMetadataArgs {
    remote_token: [u8; 20],
    name: String,
    symbol: String,
    decimals: u8,
    scaler_exponent: i8,
}

#[derive(BorshSerialize)]
struct PayForRelayArgs {
    relay_salt: [u8; 32],
    gas_limit: u64,
}

#[derive(BorshSerialize)]
struct ProveIncomingMessageArgs {
    message_hash: [u8; 32],
    nonce: u64,
    sender: [u8; 20],
    ty: u8,
    data: Vec<u8>,
    proof: Vec<[u8; 32]>,
    block_number: u64,
}

#[derive(BorshSerialize)]
struct RelayMessageArgs {
    message_hash: [u8; 32],
}

#[allow(clippy::too_many_arguments)]
pub fn bridge_native_instruction(
    bridge_program: &Pubkey,
    outgoing_message: &Pubkey,
    sol_vault: &Pubkey,
    payer: &Pubkey,
    salt: [u8; 32],
    to: [u8; 32],
    amount: u64,
    gas_limit: u64,
    nested_call: Option<(u8, [u8; 32], u128, Vec<u8>)>,
) -> Instruction {
    let data = instruction_data(
        discriminant::BRIDGE_NATIVE,
        BridgeNativeArgs {
            salt,
            to,
            amount,
            gas_limit,
            nested_call: nested_call.map(|(call_type, to, value, data)| NestedCallArgs {
                call_type,
                to,
                value,
                data,
            }),
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*outgoing_message, false),
            AccountMeta::new(*sol_vault, false),
            AccountMeta::new(*payer, true),
        ],
        data,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn bridge_token_instruction(
    bridge_program: &Pubkey,
    outgoing_message: &Pubkey,
    token_vault: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
    salt: [u8; 32],
    to: [u8; 32],
    remote_token: [u8; 32],
    amount: u64,
    gas_limit: u64,
    nested_call: Option<(u8, [u8; 32], u128, Vec<u8>)>,
) -> Instruction {
    let data = instruction_data(
        discriminant::BRIDGE_TOKEN,
        BridgeTokenArgs {
            salt,
            to,
            remote_token,
            amount,
            gas_limit,
            nested_call: nested_call.map(|(call_type, to, value, data)| NestedCallArgs {
                call_type,
                to,
                value,
                data,
            }),
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*outgoing_message, false),
            AccountMeta::new(*token_vault, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new(*payer, true),
        ],
        data,
    }
}

/// A wrapped-token bridge shares `bridge_token`'s account/instruction
/// shape; the remote-side contract distinguishes the wrapped asset by the
/// mint itself (derived deterministically in `wrap_token_metadata`), not a
/// different instruction. See [`bridge_token_instruction`].
#[allow(clippy::too_many_arguments)]
pub fn bridge_wrapped_instruction(
    bridge_program: &Pubkey,
    outgoing_message: &Pubkey,
    token_vault: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
    salt: [u8; 32],
    to: [u8; 32],
    remote_token: [u8; 32],
    amount: u64,
    gas_limit: u64,
) -> Instruction {
    let data = instruction_data(
        discriminant::BRIDGE_WRAPPED,
        BridgeTokenArgs {
            salt,
            to,
            remote_token,
            amount,
            gas_limit,
            nested_call: None,
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*outgoing_message, false),
            AccountMeta::new(*token_vault, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new(*payer, true),
        ],
        data,
    }
}

pub fn bridge_call_instruction(
    bridge_program: &Pubkey,
    outgoing_message: &Pubkey,
    payer: &Pubkey,
    salt: [u8; 32],
    to: [u8; 32],
    value: u128,
    data: Vec<u8>,
    call_type: u8,
    gas_limit: u64,
) -> Instruction {
    let ix_data = instruction_data(
        discriminant::BRIDGE_CALL,
        BridgeCallArgs {
            salt,
            to,
            value,
            data,
            call_type,
            gas_limit,
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*outgoing_message, false),
            AccountMeta::new(*payer, true),
        ],
        data: ix_data,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn wrap_token_metadata_instruction(
    bridge_program: &Pubkey,
    wrapped_token_mint: &Pubkey,
    payer: &Pubkey,
    remote_token: [u8; 20],
    name: String,
    symbol: String,
    decimals: u8,
    scaler_exponent: i8,
) -> Instruction {
    let data = instruction_data(
        discriminant::WRAP_TOKEN_METADATA,
        WrapTokenMetadataArgs {
            remote_token,
            name,
            symbol,
            decimals,
            scaler_exponent,
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*wrapped_token_mint, false),
            AccountMeta::new(*payer, true),
        ],
        data,
    }
}

pub fn pay_for_relay_instruction(
    relayer_program: &Pubkey,
    relay_metering: &Pubkey,
    payer: &Pubkey,
    relay_salt: [u8; 32],
    gas_limit: u64,
) -> Instruction {
    let data = instruction_data(
        discriminant::PAY_FOR_RELAY,
        PayForRelayArgs {
            relay_salt,
            gas_limit,
        },
    );
    Instruction {
        program_id: *relayer_program,
        accounts: vec![
            AccountMeta::new(*relay_metering, false),
            AccountMeta::new(*payer, true),
        ],
        data,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn prove_incoming_message_instruction(
    bridge_program: &Pubkey,
    incoming_message: &Pubkey,
    payer: &Pubkey,
    message_hash: [u8; 32],
    nonce: u64,
    sender: [u8; 20],
    ty: u8,
    data: Vec<u8>,
    proof: Vec<[u8; 32]>,
    block_number: u64,
) -> Instruction {
    let ix_data = instruction_data(
        discriminant::PROVE_INCOMING_MESSAGE,
        ProveIncomingMessageArgs {
            message_hash,
            nonce,
            sender,
            ty,
            data,
            proof,
            block_number,
        },
    );
    Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*incoming_message, false),
            AccountMeta::new(*payer, true),
        ],
        data: ix_data,
    }
}

/// Builds the single `relayMessage` instruction, appending the
/// already-materialized remaining-accounts list stored on the incoming
/// message account (see [`IncomingMessageAccount`]).
pub fn relay_message_instruction(
    bridge_program: &Pubkey,
    incoming_message: &Pubkey,
    payer: &Pubkey,
    message_hash: [u8; 32],
    remaining_accounts: &[RemainingAccount],
) -> Instruction {
    let data = instruction_data(discriminant::RELAY_MESSAGE, RelayMessageArgs { message_hash });
    let mut accounts = vec![
        AccountMeta::new(*incoming_message, false),
        AccountMeta::new(*payer, true),
    ];
    accounts.extend(remaining_accounts.iter().map(RemainingAccount::to_account_meta));
    Instruction {
        program_id: *bridge_program,
        accounts,
        data,
    }
}

/// One account entry in the remaining-accounts list the relay instruction
/// needs: the on-chain program persisted these (SOL vault, token vault,
/// recipient, mint owner program, and every account the nested
/// instructions reference) at prove time, since decoding them from raw
/// payload bytes client-side would re-implement the bridge program's own
/// instruction-encoding logic.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct RemainingAccount {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl RemainingAccount {
    fn to_account_meta(&self) -> AccountMeta {
        let pubkey = Pubkey::new_from_array(self.pubkey);
        match (self.is_signer, self.is_writable) {
            (true, true) => AccountMeta::new(pubkey, true),
            (true, false) => AccountMeta::new_readonly(pubkey, true),
            (false, true) => AccountMeta::new(pubkey, false),
            (false, false) => AccountMeta::new_readonly(pubkey, false),
        }
    }
}

/// The SVM-side account layout for a proven, not-yet-executed incoming
/// message (an EVM→SVM message). Mirrors the on-chain program's account
/// one field at a time.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone)]
pub struct IncomingMessageAccount {
    pub executed: bool,
    pub message_hash: [u8; 32],
    pub sender: [u8; 20],
    pub bridge_cpi_authority: [u8; 32],
    pub remaining_accounts: Vec<RemainingAccount>,
}

impl IncomingMessageAccount {
    pub fn decode(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut slice = data;
        Self::deserialize(&mut slice)
    }

    /// The remaining-accounts list with the bridge CPI authority's write
    /// flag forced to read-only, as the relay instruction requires.
    pub fn remaining_accounts_for_relay(&self) -> Vec<RemainingAccount> {
        self.remaining_accounts
            .iter()
            .cloned()
            .map(|mut account| {
                if account.pubkey == self.bridge_cpi_authority {
                    account.is_writable = false;
                }
                account
            })
            .collect()
    }
}

/// The SVM-side account layout for a not-yet-observed outgoing message (an
/// SVM→EVM message). `outgoing_message_pubkey` is not stored in the account
/// itself — it is the account's own address, supplied by the caller that
/// already knows the PDA it fetched.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone)]
pub struct OutgoingMessageAccount {
    pub nonce: u64,
    pub sender: [u8; 32],
    pub ty: u8,
    pub data: Vec<u8>,
    pub gas_limit: u64,
}

impl OutgoingMessageAccount {
    pub fn decode(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut slice = data;
        Self::deserialize(&mut slice)
    }
}

/// The on-chain bridge state account: just enough fields for
/// `latestDestinationBlockNumber` (the recorded hub block height used for
/// prove readiness).
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone)]
pub struct BridgeStateAccount {
    pub latest_hub_block_number: u64,
}

impl BridgeStateAccount {
    pub fn decode(data: &[u8]) -> Result<Self, std::io::Error> {
        let mut slice = data;
        Self::deserialize(&mut slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_message_account_round_trips() {
        let account = IncomingMessageAccount {
            executed: false,
            message_hash: [9u8; 32],
            sender: [1u8; 20],
            bridge_cpi_authority: [2u8; 32],
            remaining_accounts: vec![RemainingAccount {
                pubkey: [2u8; 32],
                is_signer: false,
                is_writable: true,
            }],
        };
        let encoded = borsh::to_vec(&account).unwrap();
        let decoded = IncomingMessageAccount::decode(&encoded).unwrap();
        assert_eq!(decoded.message_hash, account.message_hash);
        assert!(!decoded.executed);
    }

    #[test]
    fn cpi_authority_write_flag_is_downgraded_for_relay() {
        let account = IncomingMessageAccount {
            executed: false,
            message_hash: [0u8; 32],
            sender: [0u8; 20],
            bridge_cpi_authority: [7u8; 32],
            remaining_accounts: vec![
                RemainingAccount {
                    pubkey: [7u8; 32],
                    is_signer: false,
                    is_writable: true,
                },
                RemainingAccount {
                    pubkey: [8u8; 32],
                    is_signer: false,
                    is_writable: true,
                },
            ],
        };
        let downgraded = account.remaining_accounts_for_relay();
        assert!(!downgraded[0].is_writable);
        assert!(downgraded[1].is_writable);
    }

    #[test]
    fn outgoing_message_account_round_trips() {
        let account = OutgoingMessageAccount {
            nonce: 42,
            sender: [1u8; 32],
            ty: 0,
            data: vec![0xde, 0xad, 0xbe, 0xef],
            gas_limit: 123_456,
        };
        let encoded = borsh::to_vec(&account).unwrap();
        let decoded = OutgoingMessageAccount::decode(&encoded).unwrap();
        assert_eq!(decoded.nonce, 42);
        assert_eq!(decoded.data, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn bridge_state_account_round_trips() {
        let state = BridgeStateAccount {
            latest_hub_block_number: 123_456,
        };
        let encoded = borsh::to_vec(&state).unwrap();
        let decoded = BridgeStateAccount::decode(&encoded).unwrap();
        assert_eq!(decoded.latest_hub_block_number, 123_456);
    }
}
