//! Proposed channel states and their canonical digest.
//!
//! The digest is the Keccak-256 hash over the state's fields, each encoded
//! as a 32-byte big-endian word in declaration order (the ABI encoding of a
//! static struct). It is what parties sign off-channel.

use serde::Serialize;
use sha3::{
    digest::{core_api::CoreWrapper, Output},
    Digest, Keccak256, Keccak256Core,
};

use crate::types::{Amount, ChannelId, Hash, Signature, PARTICIPANTS};

/// Balance split plus the version number it is valid for.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    pub balance_a: Amount,
    pub balance_b: Amount,
    pub nonce: u64,
}

impl BalanceUpdate {
    pub fn new(balance_a: Amount, balance_b: Amount, nonce: u64) -> Self {
        Self {
            balance_a,
            balance_b,
            nonce,
        }
    }
}

/// A [BalanceUpdate] together with the signatures of party A and party B (in
/// that order).
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SignedUpdate {
    pub update: BalanceUpdate,
    pub sigs: [Signature; PARTICIPANTS],
}

impl SignedUpdate {
    pub fn new(update: BalanceUpdate, sigs: [Signature; PARTICIPANTS]) -> Self {
        Self { update, sigs }
    }
}

/// The full state a signature commits to.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelState {
    pub channel_id: ChannelId,
    pub balance_a: Amount,
    pub balance_b: Amount,
    pub nonce: u64,
    /// Set for the state used in a cooperative close.
    pub is_final: bool,
}

impl ChannelState {
    pub fn new(channel_id: ChannelId, update: BalanceUpdate, is_final: bool) -> Self {
        Self {
            channel_id,
            balance_a: update.balance_a,
            balance_b: update.balance_b,
            nonce: update.nonce,
            is_final,
        }
    }

    pub fn digest(&self) -> Hash {
        let mut writer = Keccak256Writer::default();
        writer.write_u64(self.channel_id);
        writer.write(&self.balance_a.to_word());
        writer.write(&self.balance_b.to_word());
        writer.write_u64(self.nonce);
        writer.write_u64(self.is_final as u64);
        Hash(writer.finalize().into())
    }
}

struct Keccak256Writer {
    hasher: CoreWrapper<Keccak256Core>,
}

impl Default for Keccak256Writer {
    fn default() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }
}

impl Keccak256Writer {
    fn write(&mut self, slot: &[u8; 32]) {
        self.hasher.update(slot);
    }

    fn write_u64(&mut self, value: u64) {
        self.write(&Amount::from(value).to_word());
    }

    fn finalize(self) -> Output<Keccak256> {
        self.hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ChannelState {
        ChannelState::new(1, BalanceUpdate::new(1500.into(), 1500.into(), 3), false)
    }

    #[test]
    fn digest_is_keccak_of_abi_words() {
        let s = state();

        let mut encoded = Vec::new();
        for word in [
            Amount::from(1u64),
            Amount::from(1500u64),
            Amount::from(1500u64),
            Amount::from(3u64),
            Amount::from(0u64),
        ] {
            encoded.extend_from_slice(&word.to_word());
        }
        let expected: [u8; 32] = Keccak256::digest(&encoded).into();

        assert_eq!(s.digest(), Hash(expected));
    }

    #[test]
    fn digest_commits_to_every_field() {
        let base = state();
        let variants = [
            ChannelState { channel_id: 2, ..base },
            ChannelState { balance_a: 1499.into(), ..base },
            ChannelState { balance_b: 1501.into(), ..base },
            ChannelState { nonce: 4, ..base },
            ChannelState { is_final: true, ..base },
        ];

        for v in variants {
            assert_ne!(v.digest(), base.digest(), "{:?}", v);
        }
    }
}
