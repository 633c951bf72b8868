//! Protocol-wide constants for the hashlock escrow.

/// Width of one canonical integer word (amounts, fees, token ids).
pub const WORD_SIZE: usize = 32;

/// Words in the receiver-hook parameter block:
/// `id, taker, token, takerSecretHash, makerSecretHash, lockTime`.
pub const HOOK_PAYLOAD_WORDS: usize = 6;

/// Exact byte length of the receiver-hook parameter block.
pub const HOOK_PAYLOAD_LEN: usize = HOOK_PAYLOAD_WORDS * WORD_SIZE;

/// Acceptance value a unique-token receiver must return.
pub const UNIQUE_RECEIVED_SELECTOR: [u8; 4] = [0x15, 0x0b, 0x7a, 0x02];

/// Acceptance value a semi-fungible single-transfer receiver must return.
pub const SEMI_FUNGIBLE_RECEIVED_SELECTOR: [u8; 4] = [0xf2, 0x3a, 0x6e, 0x61];

/// Acceptance value of a semi-fungible batch receiver. The escrow never
/// returns it: batch receipts are rejected.
pub const SEMI_FUNGIBLE_BATCH_RECEIVED_SELECTOR: [u8; 4] = [0xbc, 0x19, 0x7c, 0x81];
