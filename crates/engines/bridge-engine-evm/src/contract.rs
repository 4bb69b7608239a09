//! The bespoke EVM bridge contract interface, declared inline with
//! `alloy_sol_types::sol!` rather than loaded from an external ABI JSON
//! file: this protocol is not a standard token/interface ABI, so there
//! is no shared artifact to load.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    pub struct IncomingMessage {
        uint64 nonce;
        bytes32 sender;
        uint8 ty;
        bytes data;
        bytes32 outgoingMessagePubkey;
        uint64 gasLimit;
    }

    /// A single raw SVM instruction a caller wants forwarded through the
    /// bridge for execution on the SVM side. Binary encoding of the
    /// instruction's own accounts/data is an external-program concern (the
    /// spec treats "binary encoding of individual chain-native
    /// program/contract instructions" as out of scope); this contract
    /// surface carries it as an opaque blob.
    #[derive(Debug, PartialEq, Eq)]
    pub struct Ix {
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    pub struct Transfer {
        address localToken;
        bytes32 remoteToken;
        bytes32 to;
        uint64 amount;
    }

    pub event MessageInitiated(bytes32 messageHash, bytes32 mmrRoot, Message message);

    #[derive(Debug, PartialEq, Eq)]
    pub struct Message {
        uint64 nonce;
        bytes32 sender;
        uint8 ty;
        bytes data;
    }

    #[sol(rpc)]
    pub interface IBridge {
        function BRIDGE_VALIDATOR() external view returns (address);
        function successes(bytes32 outerHash) external view returns (bool);
        function failures(bytes32 outerHash) external view returns (bool);
        function getMessageHash(IncomingMessage calldata message) external view returns (bytes32);
        function generateProof(uint64 nonce) external view returns (bytes32[] memory);
        function bridgeCall(Ix[] calldata ixs) external payable returns (bytes32);
        function bridgeToken(Transfer calldata transfer, Ix[] calldata ixs) external payable returns (bytes32);
        function relayMessages(IncomingMessage[] calldata messages) external;
    }

    #[sol(rpc)]
    pub interface IBridgeValidator {
        function validMessages(bytes32 outerHash) external view returns (bool);
    }
}
