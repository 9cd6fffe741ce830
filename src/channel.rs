mod dispute;
mod registry;
mod state;
mod state_machine;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    types::{Address, Amount, ChannelId},
};

pub use dispute::Dispute;
pub use registry::ChannelRegistry;
pub use state::{BalanceUpdate, ChannelState, SignedUpdate};

pub(crate) use registry::Slot;

/// Which side of a channel an identity is on.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Party {
    A,
    B,
}

/// Lifecycle status of a channel. `Closed` is terminal.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    Open,
    Closed,
}

/// The shared record of both parties' committed balances.
///
/// `balance_a + balance_b == total_deposit` holds after creation, after every
/// deposit and at the moment the channel is closed.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub party_a: Address,
    pub party_b: Address,
    pub balance_a: Amount,
    pub balance_b: Amount,
    pub total_deposit: Amount,
    /// Version of the most recently accepted off-channel state.
    pub nonce: u64,
    /// Absolute clock value from which on anyone may close with the recorded
    /// balances.
    pub timeout: u64,
    pub challenge_period: u64,
    pub created_at: u64,
    pub is_closed: bool,
}

impl Channel {
    pub fn status(&self) -> ChannelStatus {
        if self.is_closed {
            ChannelStatus::Closed
        } else {
            ChannelStatus::Open
        }
    }

    pub fn party_of(&self, identity: &Address) -> Option<Party> {
        if *identity == self.party_a {
            Some(Party::A)
        } else if *identity == self.party_b {
            Some(Party::B)
        } else {
            None
        }
    }

    pub fn is_party(&self, identity: &Address) -> bool {
        self.party_of(identity).is_some()
    }

    pub fn address_of(&self, party: Party) -> Address {
        match party {
            Party::A => self.party_a,
            Party::B => self.party_b,
        }
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed {
            Err(Error::ChannelClosed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn ensure_party(&self, caller: &Address) -> Result<Party> {
        self.party_of(caller).ok_or(Error::NotAuthorized)
    }

    /// Checks that a proposed split distributes exactly the total deposit.
    pub(crate) fn ensure_split(&self, balance_a: Amount, balance_b: Amount) -> Result<()> {
        match balance_a.checked_add(balance_b) {
            Some(sum) if sum == self.total_deposit => Ok(()),
            _ => Err(Error::InvalidBalance),
        }
    }

    /// Adds `amount` to `party`'s side and to the total.
    pub(crate) fn credit(&mut self, party: Party, amount: Amount) -> Result<()> {
        let balance = match party {
            Party::A => &mut self.balance_a,
            Party::B => &mut self.balance_b,
        };
        *balance = balance.checked_add(amount).ok_or(Error::InvalidBalance)?;
        self.total_deposit = self
            .total_deposit
            .checked_add(amount)
            .ok_or(Error::InvalidBalance)?;
        Ok(())
    }

    /// Records the final split and marks the channel closed.
    pub(crate) fn close_with(&mut self, balance_a: Amount, balance_b: Amount) {
        debug_assert_eq!(balance_a + balance_b, self.total_deposit);
        self.balance_a = balance_a;
        self.balance_b = balance_b;
        self.is_closed = true;
    }
}
