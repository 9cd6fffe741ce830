//! Channel records, identifier assignment, creation and deposits.

use std::{collections::HashMap, sync::Arc};

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

use super::{Channel, Dispute};
use crate::{
    adjudicator::Adjudicator,
    clock::Clock,
    error::{Error, Result},
    ledger::{Batch, Ledger},
    messages::ChannelEvent,
    sig::SignatureVerifier,
    types::{Address, Amount, ChannelId},
    wire::EventBus,
};

/// A channel together with its (at most one) live dispute. Both are only
/// ever mutated while the slot's lock is held.
#[derive(Debug)]
pub(crate) struct Slot {
    pub channel: Channel,
    pub dispute: Option<Dispute>,
}

/// Owns every channel record.
///
/// Each channel sits behind its own lock, so operations on different channels
/// do not contend. The map itself is only write-locked to insert a new
/// channel.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    slots: RwLock<HashMap<ChannelId, Arc<Mutex<Slot>>>>,
    /// Number of channels created so far, which is also the last assigned id.
    counter: Mutex<ChannelId>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel_id: ChannelId) -> Option<Channel> {
        self.slot(channel_id).ok().map(|s| s.lock().channel)
    }

    pub fn get_dispute(&self, channel_id: ChannelId) -> Option<Dispute> {
        self.slot(channel_id).ok().and_then(|s| s.lock().dispute)
    }

    pub fn count(&self) -> u64 {
        *self.counter.lock()
    }

    pub fn is_party(&self, channel_id: ChannelId, identity: &Address) -> bool {
        self.get(channel_id)
            .map(|c| c.is_party(identity))
            .unwrap_or(false)
    }

    pub(crate) fn slot(&self, channel_id: ChannelId) -> Result<Arc<Mutex<Slot>>> {
        self.slots
            .read()
            .get(&channel_id)
            .cloned()
            .ok_or(Error::ChannelNotFound)
    }

    /// Locks the id counter. Holding the guard serializes channel creation.
    fn lock_counter(&self) -> MutexGuard<'_, ChannelId> {
        self.counter.lock()
    }

    fn insert(&self, channel: Channel) {
        let slot = Slot {
            channel,
            dispute: None,
        };
        self.slots
            .write()
            .insert(channel.id, Arc::new(Mutex::new(slot)));
    }
}

impl<L, C, V, B> Adjudicator<L, C, V, B>
where
    L: Ledger,
    C: Clock,
    V: SignatureVerifier,
    B: EventBus,
{
    /// Opens a channel between `caller` (party A) and `counterparty` (party
    /// B), moving both deposits into custody. Returns the new channel's id.
    pub fn create_channel(
        &self,
        caller: Address,
        counterparty: Address,
        deposit_a: Amount,
        deposit_b: Amount,
        timeout: u64,
    ) -> Result<ChannelId> {
        debug!(%caller, %counterparty, %deposit_a, %deposit_b, timeout, "create channel");

        if deposit_a.is_zero() || deposit_b.is_zero() {
            return Err(Error::InsufficientFunds);
        }
        if caller == counterparty {
            return Err(Error::NotAuthorized);
        }

        let mut counter = self.registry.lock_counter();

        let now = self.clock.now();
        if timeout <= now.saturating_add(self.config.min_timeout_horizon) {
            return Err(Error::TimeoutNotReached);
        }
        let total_deposit = deposit_a
            .checked_add(deposit_b)
            .ok_or(Error::InvalidBalance)?;

        let id = *counter + 1;
        let channel = Channel {
            id,
            party_a: caller,
            party_b: counterparty,
            balance_a: deposit_a,
            balance_b: deposit_b,
            total_deposit,
            nonce: 0,
            timeout,
            challenge_period: self.config.challenge_period,
            created_at: now,
            is_closed: false,
        };

        let mut batch = Batch::new();
        batch
            .push(caller, self.config.custody, deposit_a)
            .push(counterparty, self.config.custody, deposit_b);
        self.settle(id, &batch)?;

        self.registry.insert(channel);
        *counter = id;
        drop(counter);

        info!(channel_id = id, party_a = %caller, party_b = %counterparty, %total_deposit, "channel created");
        self.publish(ChannelEvent::Created {
            id,
            party_a: caller,
            party_b: counterparty,
            deposit_a,
            deposit_b,
            timeout,
        });

        Ok(id)
    }

    /// Adds `amount` from `caller` to the caller's side of an open channel.
    pub fn deposit(&self, caller: Address, channel_id: ChannelId, amount: Amount) -> Result<()> {
        debug!(channel_id, %caller, %amount, "deposit");

        self.with_slot(channel_id, |slot| {
            let mut channel = slot.channel;
            channel.ensure_open()?;
            if amount.is_zero() {
                return Err(Error::InsufficientFunds);
            }
            let party = channel.ensure_party(&caller)?;
            channel.credit(party, amount)?;

            let mut batch = Batch::new();
            batch.push(caller, self.config.custody, amount);
            self.settle(channel_id, &batch)?;
            slot.channel = channel;

            info!(channel_id, party = ?party, %amount, total_deposit = %channel.total_deposit, "deposit recorded");
            self.publish(ChannelEvent::Deposited {
                id: channel_id,
                party: caller,
                amount,
                total_deposit: channel.total_deposit,
            });
            Ok(())
        })
    }
}
