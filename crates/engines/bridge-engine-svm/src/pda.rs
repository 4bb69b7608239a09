//! Program-derived-address helpers built on the static seed table in
//! `bridge_codec::seeds`. Each function is a fixed `(seed, ...)`
//! derivation; none of this parses an on-chain IDL at runtime.

use bridge_codec::seeds;
use solana_pubkey::Pubkey;

pub fn outgoing_message_pda(bridge_program: &Pubkey, salt: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::OUTGOING_MESSAGE_SEED, salt], bridge_program)
}

pub fn incoming_message_pda(bridge_program: &Pubkey, message_hash: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::INCOMING_MESSAGE_SEED, message_hash], bridge_program)
}

pub fn token_vault_pda(
    bridge_program: &Pubkey,
    mint: &Pubkey,
    remote_token: &[u8; 32],
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[seeds::TOKEN_VAULT_SEED, mint.as_ref(), remote_token],
        bridge_program,
    )
}

pub fn sol_vault_pda(bridge_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::SOL_VAULT_SEED], bridge_program)
}

pub fn bridge_state_pda(bridge_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::BRIDGE_SEED], bridge_program)
}

pub fn bridge_cpi_authority_pda(bridge_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::BRIDGE_CPI_AUTHORITY_SEED], bridge_program)
}

pub fn wrapped_token_pda(bridge_program: &Pubkey, wrapped_token_id: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::WRAPPED_TOKEN_SEED, wrapped_token_id], bridge_program)
}

/// The relayer-program PDA recording a pay-for-relay metering entry,
/// derived from a fresh salt distinct from the outgoing message's.
pub fn relay_metering_pda(relayer_program: &Pubkey, relay_salt: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::MTR_SEED, relay_salt], relayer_program)
}

pub fn relayer_config_pda(relayer_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::CFG_SEED], relayer_program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outgoing_message_pda_is_deterministic() {
        let program = Pubkey::new_unique();
        let salt = [7u8; 32];
        let (a, _) = outgoing_message_pda(&program, &salt);
        let (b, _) = outgoing_message_pda(&program, &salt);
        assert_eq!(a, b);
    }

    #[test]
    fn different_salts_yield_different_pdas() {
        let program = Pubkey::new_unique();
        let (a, _) = outgoing_message_pda(&program, &[1u8; 32]);
        let (b, _) = outgoing_message_pda(&program, &[2u8; 32]);
        assert_ne!(a, b);
    }
}
