use super::*;
use crate::channel::BalanceUpdate;

fn channel(party_a: Address, party_b: Address) -> Channel {
    Channel {
        id: 1,
        party_a,
        party_b,
        balance_a: 1000.into(),
        balance_b: 2000.into(),
        total_deposit: 3000.into(),
        nonce: 0,
        timeout: 200,
        challenge_period: 144,
        created_at: 0,
        is_closed: false,
    }
}

fn state() -> ChannelState {
    ChannelState::new(1, BalanceUpdate::new(1500.into(), 1500.into(), 1), false)
}

#[test]
fn accept_any_signature_accepts_garbage() {
    let c = channel(Address([0xa1; 20]), Address([0xb0; 20]));
    let sigs = [Signature([0xff; 65]), Signature::default()];
    assert!(AcceptAnySignature.verify(&c, &state(), &sigs).is_ok());
}

#[cfg(feature = "k256")]
mod eth {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    macro_rules! make_a_to_b {
        ($name:ident, $seed:literal) => {
            #[test]
            fn $name() {
                // Do not use that on any real device, this is just for testing.
                let mut rng = StdRng::seed_from_u64($seed);
                let signer = Signer::new(&mut rng);
                let msg: Hash = rand::Rng::gen(&mut rng);
                let sig = signer.sign_eth(msg).unwrap();

                assert!(sig.0[64] == 27 || sig.0[64] == 28);
                assert_eq!(recover_signer(msg, sig).unwrap(), signer.address());
            }
        };
    }

    make_a_to_b!(sign_and_recover_seed_0, 0);
    make_a_to_b!(sign_and_recover_seed_1, 1);

    #[test]
    fn address_of_known_key() {
        // Secret key 1, whose address is well known.
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let signer = Signer::from_bytes(&secret).unwrap();

        let mut expected = [0u8; 20];
        hex::decode_to_slice("7e5f4552091a69125d5dfcb7b8c2659029395bdf", &mut expected).unwrap();
        assert_eq!(signer.address(), Address(expected));
    }

    fn signers() -> (Signer, Signer) {
        let mut rng = StdRng::seed_from_u64(7);
        (Signer::new(&mut rng), Signer::new(&mut rng))
    }

    #[test]
    fn verifier_accepts_both_parties() {
        let (a, b) = signers();
        let c = channel(a.address(), b.address());
        let s = state();
        let sigs = [a.sign_state(&s).unwrap(), b.sign_state(&s).unwrap()];

        assert!(EthSignatureVerifier.verify(&c, &s, &sigs).is_ok());
    }

    #[test]
    fn verifier_rejects_swapped_signatures() {
        let (a, b) = signers();
        let c = channel(a.address(), b.address());
        let s = state();
        let sigs = [b.sign_state(&s).unwrap(), a.sign_state(&s).unwrap()];

        match EthSignatureVerifier.verify(&c, &s, &sigs) {
            Err(Error::WrongSigner { party, recovered }) => {
                assert_eq!(party, Party::A);
                assert_eq!(recovered, b.address());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn verifier_rejects_signature_over_other_state() {
        let (a, b) = signers();
        let c = channel(a.address(), b.address());
        let signed = state();
        let proposed = ChannelState {
            balance_a: 3000.into(),
            balance_b: 0.into(),
            ..signed
        };
        let sigs = [a.sign_state(&signed).unwrap(), b.sign_state(&signed).unwrap()];

        assert!(EthSignatureVerifier.verify(&c, &proposed, &sigs).is_err());
    }

    #[test]
    fn bad_recovery_id_is_an_error() {
        let (a, _) = signers();
        let mut sig = a.sign_eth(Hash::default()).unwrap();
        sig.0[64] = 1;

        assert!(matches!(
            recover_signer(Hash::default(), sig),
            Err(Error::InvalidRecoveryId(1))
        ));
    }
}
