//! Error type returned by every adjudicator operation.

use thiserror::Error;

use crate::ledger::LedgerError;

/// Represents all the ways an operation on a channel can fail.
///
/// Nothing is retried internally and a failed operation leaves no trace on
/// the channel records or the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller is not one of the channel's two parties.
    #[error("caller is not authorized for this channel")]
    NotAuthorized,

    /// No channel (or, for dispute operations, no live dispute) exists for the
    /// given identifier.
    #[error("channel not found")]
    ChannelNotFound,

    /// The channel was already closed and accepts no further operations.
    #[error("channel is closed")]
    ChannelClosed,

    /// A signature was rejected by the signature policy, or the proposed nonce
    /// does not supersede the current one.
    #[error("invalid signature or stale nonce")]
    InvalidSignature,

    /// A deposit amount was zero.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The channel timeout or challenge period has not elapsed yet, or the
    /// requested timeout is too close to the current clock.
    #[error("timeout not reached")]
    TimeoutNotReached,

    /// Proposed balances do not add up to the channel's total deposit.
    #[error("balances do not match the total deposit")]
    InvalidBalance,

    /// Reserved, no operation currently returns it.
    #[error("channel already exists")]
    ChannelAlreadyExists,

    /// The ledger refused the settlement batch.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Alias for `Result` using the adjudicator [Error].
pub type Result<T> = core::result::Result<T, Error>;
