//! Adjudicator for two-party payment channels.
//!
//! Two parties lock collateral into a channel, exchange balance updates
//! off-channel and settle the final split here, either cooperatively, after
//! the channel's timeout, or through a challenge/response dispute.
//!
//! The adjudicator itself holds no value. It moves deposits and payouts
//! through a [ledger::Ledger], reads deadlines from a [clock::Clock], checks
//! signatures with a [sig::SignatureVerifier] and reports committed
//! operations to a [wire::EventBus].

#![forbid(unsafe_code)]

mod adjudicator;
pub mod channel;
pub mod clock;
pub mod config;
mod error;
pub mod ledger;
pub mod messages;
pub mod sig;
mod types;
pub mod wire;

pub mod chanwire;

pub use adjudicator::Adjudicator;
pub use error::{Error, Result};
pub use types::{Address, Amount, ChannelId, Hash, ParseBytesError, Signature, PARTICIPANTS, U256};
