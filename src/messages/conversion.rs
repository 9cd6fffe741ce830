use super::{ChannelEvent, CloseReason, ConversionError};
use crate::{
    chanwire::{self, event::Kind},
    types::{Address, Amount},
};

fn amount_bytes(amount: Amount) -> Vec<u8> {
    amount.to_word().to_vec()
}

fn amount_from(bytes: Vec<u8>) -> Result<Amount, ConversionError> {
    if bytes.len() != 32 {
        return Err(ConversionError::ByteLengthMismatch);
    }
    Ok(Amount::from_big_endian(&bytes))
}

fn address_from(bytes: Vec<u8>) -> Result<Address, ConversionError> {
    Ok(Address(
        bytes
            .try_into()
            .or(Err(ConversionError::ByteLengthMismatch))?,
    ))
}

impl From<CloseReason> for chanwire::CloseReason {
    fn from(value: CloseReason) -> Self {
        match value {
            CloseReason::Cooperative => Self::Cooperative,
            CloseReason::Timeout => Self::Timeout,
            CloseReason::Challenge => Self::Challenge,
        }
    }
}

impl TryFrom<i32> for CloseReason {
    type Error = ConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match chanwire::CloseReason::from_i32(value) {
            Some(chanwire::CloseReason::Cooperative) => Ok(Self::Cooperative),
            Some(chanwire::CloseReason::Timeout) => Ok(Self::Timeout),
            Some(chanwire::CloseReason::Challenge) => Ok(Self::Challenge),
            None => Err(ConversionError::UnknownCloseReason(value)),
        }
    }
}

impl From<ChannelEvent> for chanwire::Event {
    fn from(value: ChannelEvent) -> Self {
        let kind = match value {
            ChannelEvent::Created {
                party_a,
                party_b,
                deposit_a,
                deposit_b,
                timeout,
                ..
            } => Kind::Created(chanwire::ChannelCreated {
                party_a: party_a.0.to_vec(),
                party_b: party_b.0.to_vec(),
                deposit_a: amount_bytes(deposit_a),
                deposit_b: amount_bytes(deposit_b),
                timeout,
            }),
            ChannelEvent::Deposited {
                party,
                amount,
                total_deposit,
                ..
            } => Kind::Deposited(chanwire::Deposited {
                party: party.0.to_vec(),
                amount: amount_bytes(amount),
                total_deposit: amount_bytes(total_deposit),
            }),
            ChannelEvent::ChallengeStarted {
                challenger,
                nonce,
                challenge_time,
                ..
            } => Kind::ChallengeStarted(chanwire::ChallengeStarted {
                challenger: challenger.0.to_vec(),
                nonce,
                challenge_time,
            }),
            ChannelEvent::ChallengeResponded {
                responder, nonce, ..
            } => Kind::ChallengeResponded(chanwire::ChallengeResponded {
                responder: responder.0.to_vec(),
                nonce,
            }),
            ChannelEvent::Closed {
                balance_a,
                balance_b,
                nonce,
                reason,
                ..
            } => Kind::Closed(chanwire::ChannelClosed {
                balance_a: amount_bytes(balance_a),
                balance_b: amount_bytes(balance_b),
                nonce,
                reason: chanwire::CloseReason::from(reason) as i32,
            }),
        };

        Self {
            channel_id: value.channel_id(),
            kind: Some(kind),
        }
    }
}

impl TryFrom<chanwire::Event> for ChannelEvent {
    type Error = ConversionError;

    fn try_from(value: chanwire::Event) -> Result<Self, Self::Error> {
        let id = value.channel_id;
        Ok(match value.kind.ok_or(ConversionError::ExpectedSome)? {
            Kind::Created(msg) => ChannelEvent::Created {
                id,
                party_a: address_from(msg.party_a)?,
                party_b: address_from(msg.party_b)?,
                deposit_a: amount_from(msg.deposit_a)?,
                deposit_b: amount_from(msg.deposit_b)?,
                timeout: msg.timeout,
            },
            Kind::Deposited(msg) => ChannelEvent::Deposited {
                id,
                party: address_from(msg.party)?,
                amount: amount_from(msg.amount)?,
                total_deposit: amount_from(msg.total_deposit)?,
            },
            Kind::ChallengeStarted(msg) => ChannelEvent::ChallengeStarted {
                id,
                challenger: address_from(msg.challenger)?,
                nonce: msg.nonce,
                challenge_time: msg.challenge_time,
            },
            Kind::ChallengeResponded(msg) => ChannelEvent::ChallengeResponded {
                id,
                responder: address_from(msg.responder)?,
                nonce: msg.nonce,
            },
            Kind::Closed(msg) => ChannelEvent::Closed {
                id,
                balance_a: amount_from(msg.balance_a)?,
                balance_b: amount_from(msg.balance_b)?,
                nonce: msg.nonce,
                reason: msg.reason.try_into()?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_32_byte_big_endian() {
        let event = ChannelEvent::Deposited {
            id: 3,
            party: Address([0xb0; 20]),
            amount: 0x0100.into(),
            total_deposit: 3256.into(),
        };

        let wire = chanwire::Event::from(event);
        assert_eq!(wire.channel_id, 3);
        match wire.kind {
            Some(Kind::Deposited(msg)) => {
                assert_eq!(msg.amount.len(), 32);
                assert_eq!(msg.amount[30..], [0x01, 0x00]);
                assert_eq!(msg.party, vec![0xb0; 20]);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn closed_event_survives_conversion() {
        let event = ChannelEvent::Closed {
            id: 1,
            balance_a: 1500.into(),
            balance_b: 1500.into(),
            nonce: 7,
            reason: CloseReason::Challenge,
        };
        assert_eq!(ChannelEvent::try_from(chanwire::Event::from(event)), Ok(event));
    }

    #[test]
    fn rejects_truncated_address() {
        let wire = chanwire::Event {
            channel_id: 1,
            kind: Some(Kind::ChallengeResponded(chanwire::ChallengeResponded {
                responder: vec![0xb0; 19],
                nonce: 2,
            })),
        };
        assert_eq!(
            ChannelEvent::try_from(wire),
            Err(ConversionError::ByteLengthMismatch)
        );
    }

    #[test]
    fn rejects_unknown_close_reason_and_missing_kind() {
        assert_eq!(
            CloseReason::try_from(9),
            Err(ConversionError::UnknownCloseReason(9))
        );
        let empty = chanwire::Event {
            channel_id: 1,
            kind: None,
        };
        assert_eq!(
            ChannelEvent::try_from(empty),
            Err(ConversionError::ExpectedSome)
        );
    }
}
