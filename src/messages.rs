mod conversion;

use serde::Serialize;
use thiserror::Error;

use crate::types::{Address, Amount, ChannelId};

/// Failure to turn a wire message back into a [ChannelEvent].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("byte field has the wrong length")]
    ByteLengthMismatch,
    #[error("required field is missing")]
    ExpectedSome,
    #[error("unknown close reason {0}")]
    UnknownCloseReason(i32),
}

/// How a channel reached `Closed`.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CloseReason {
    Cooperative,
    Timeout,
    Challenge,
}

/// Notifications emitted after an operation has been committed.
///
/// Failed operations never emit anything.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Created {
        id: ChannelId,
        party_a: Address,
        party_b: Address,
        deposit_a: Amount,
        deposit_b: Amount,
        timeout: u64,
    },
    Deposited {
        id: ChannelId,
        party: Address,
        amount: Amount,
        total_deposit: Amount,
    },
    /// Emitted for every `challenge_close`, including one overwriting a live
    /// dispute.
    ChallengeStarted {
        id: ChannelId,
        challenger: Address,
        nonce: u64,
        challenge_time: u64,
    },
    ChallengeResponded {
        id: ChannelId,
        responder: Address,
        nonce: u64,
    },
    Closed {
        id: ChannelId,
        balance_a: Amount,
        balance_b: Amount,
        nonce: u64,
        reason: CloseReason,
    },
}

impl ChannelEvent {
    pub fn channel_id(&self) -> ChannelId {
        match *self {
            ChannelEvent::Created { id, .. }
            | ChannelEvent::Deposited { id, .. }
            | ChannelEvent::ChallengeStarted { id, .. }
            | ChannelEvent::ChallengeResponded { id, .. }
            | ChannelEvent::Closed { id, .. } => id,
        }
    }
}
