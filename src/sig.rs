//! Signature policies applied to proposed channel states.
//!
//! The adjudicator never looks at signature bytes itself. Every proposed
//! state is handed to a [SignatureVerifier] together with the channel it
//! belongs to, and any error it returns rejects the operation.

use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::{
    channel::{Channel, ChannelState, Party},
    types::{Address, Hash, Signature, PARTICIPANTS},
};

#[cfg(feature = "k256")]
mod k256;
#[cfg(feature = "k256")]
pub use self::k256::{recover_signer, EthSignatureVerifier, Signer};

#[cfg(test)]
mod tests;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ecdsa failure: {0}")]
    Ecdsa(String),

    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("signature of party {party:?} recovers to {recovered}")]
    WrongSigner { party: Party, recovered: Address },
}

/// Decides whether the signatures attached to a proposed state are
/// acceptable. `sigs[0]` belongs to party A, `sigs[1]` to party B.
pub trait SignatureVerifier {
    fn verify(
        &self,
        channel: &Channel,
        state: &ChannelState,
        sigs: &[Signature; PARTICIPANTS],
    ) -> Result<(), Error>;
}

/// Accepts every signature.
///
/// With this policy nothing but "caller is a party", the nonce ordering and
/// the balance arithmetic protect a channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAnySignature;

impl SignatureVerifier for AcceptAnySignature {
    fn verify(
        &self,
        _channel: &Channel,
        _state: &ChannelState,
        _sigs: &[Signature; PARTICIPANTS],
    ) -> Result<(), Error> {
        Ok(())
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(
        &self,
        channel: &Channel,
        state: &ChannelState,
        sigs: &[Signature; PARTICIPANTS],
    ) -> Result<(), Error> {
        (**self).verify(channel, state, sigs)
    }
}

/// Add the `\x19Ethereum Signed Message\n<length>` prefix to hash.
#[cfg_attr(not(feature = "k256"), allow(dead_code))]
fn hash_to_eth_signed_msg_hash(hash: Hash) -> Hash {
    // Packed encoding
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n32");
    hasher.update(hash.0);
    Hash(hasher.finalize().into())
}
