//! Ethereum-style signatures using the k256 Rust crate (implementation of
//! ecdsa in Rust).

use ::k256::{
    ecdsa::{
        recoverable,
        signature::{hazmat::PrehashSigner, Signature as k256Signature},
        SigningKey, VerifyingKey,
    },
    elliptic_curve::sec1::ToEncodedPoint,
};
use sha3::{Digest, Keccak256};

use super::{hash_to_eth_signed_msg_hash, Error, SignatureVerifier};
use crate::{
    channel::{Channel, ChannelState, Party},
    types::{Address, Hash, Signature, PARTICIPANTS},
};

/// Offset the EVM expects on the recovery id.
const ETH_V_OFFSET: u8 = 27;

fn ecdsa_error(e: ::k256::ecdsa::Error) -> Error {
    Error::Ecdsa(e.to_string())
}

impl From<VerifyingKey> for Address {
    fn from(key: VerifyingKey) -> Self {
        // The uncompressed SEC1 encoding is a 0x04 tag followed by the 64
        // bytes of the public key.
        let point = key.to_encoded_point(false);
        let hash: [u8; 32] = Keccak256::digest(&point.as_bytes()[1..]).into();

        let mut addr = Address([0; 20]);
        addr.0.copy_from_slice(&hash[32 - 20..]);
        addr
    }
}

/// Holds a party's secret key and signs channel states with it.
#[derive(Debug)]
pub struct Signer {
    key: SigningKey,
    addr: Address,
}

impl Signer {
    pub fn new<R: rand::Rng + rand::CryptoRng>(rng: &mut R) -> Self {
        Self::from_key(SigningKey::random(rng))
    }

    /// Restores a signer from a 32-byte secret scalar.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, Error> {
        let key = SigningKey::from_bytes(secret).map_err(ecdsa_error)?;
        Ok(Self::from_key(key))
    }

    fn from_key(key: SigningKey) -> Self {
        let addr = key.verifying_key().into();
        Self { key, addr }
    }

    pub fn address(&self) -> Address {
        self.addr
    }

    pub fn sign_eth(&self, msg: Hash) -> Result<Signature, Error> {
        // "\x19Ethereum Signed Message:\n32" format
        let hash = hash_to_eth_signed_msg_hash(msg);

        let sig: recoverable::Signature = self.key.sign_prehash(&hash.0).map_err(ecdsa_error)?;

        // `r || s || v`, which is already the layout we need, except for the
        // offset on `v`.
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&sig.as_bytes()[..64]);
        let v = sig.as_bytes()[64] + ETH_V_OFFSET;

        Ok(Signature::new(&rs, v))
    }

    pub fn sign_state(&self, state: &ChannelState) -> Result<Signature, Error> {
        self.sign_eth(state.digest())
    }
}

/// Recovers the address that produced `eth_sig` over `msg`.
pub fn recover_signer(msg: Hash, eth_sig: Signature) -> Result<Address, Error> {
    // "\x19Ethereum Signed Message:\n32" format
    let hash = hash_to_eth_signed_msg_hash(msg);

    let mut sig_bytes: [u8; 65] = eth_sig.0;
    sig_bytes[64] = sig_bytes[64]
        .checked_sub(ETH_V_OFFSET)
        .filter(|v| *v <= 1)
        .ok_or(Error::InvalidRecoveryId(eth_sig.0[64]))?;

    let sig = recoverable::Signature::from_bytes(&sig_bytes).map_err(ecdsa_error)?;
    let verifying_key = sig
        .recover_verifying_key_from_digest_bytes(&hash.0.into())
        .map_err(ecdsa_error)?;
    Ok(verifying_key.into())
}

/// Requires `sigs[0]` to come from party A and `sigs[1]` from party B, both
/// over [ChannelState::digest].
#[derive(Debug, Default, Clone, Copy)]
pub struct EthSignatureVerifier;

impl SignatureVerifier for EthSignatureVerifier {
    fn verify(
        &self,
        channel: &Channel,
        state: &ChannelState,
        sigs: &[Signature; PARTICIPANTS],
    ) -> Result<(), Error> {
        let digest = state.digest();
        for (party, sig) in [Party::A, Party::B].into_iter().zip(sigs) {
            let recovered = recover_signer(digest, *sig)?;
            if recovered != channel.address_of(party) {
                return Err(Error::WrongSigner { party, recovered });
            }
        }
        Ok(())
    }
}
