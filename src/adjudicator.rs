use tracing::warn;

use crate::{
    channel::{Channel, ChannelRegistry, ChannelState, Dispute, Slot},
    clock::Clock,
    config::AdjudicatorConfig,
    error::{Error, Result},
    ledger::{Batch, Ledger},
    messages::ChannelEvent,
    sig::SignatureVerifier,
    types::{Address, Amount, ChannelId, Signature, PARTICIPANTS},
    wire::EventBus,
};

/// The main object of this crate: holds every channel and settles them
/// against a [Ledger].
///
/// All operations take the authenticated identity of the caller as their
/// first argument; the adjudicator never derives it. Operations on distinct
/// channels may run concurrently from several threads.
///
/// Note: A host will usually have exactly one ledger, clock, verifier and bus
/// type, thus using dynamic dispatch here doesn't make much sense.
#[derive(Debug)]
pub struct Adjudicator<L, C, V, B>
where
    L: Ledger,
    C: Clock,
    V: SignatureVerifier,
    B: EventBus,
{
    pub(crate) registry: ChannelRegistry,
    pub(crate) ledger: L,
    pub(crate) clock: C,
    pub(crate) verifier: V,
    pub(crate) bus: B,
    pub(crate) config: AdjudicatorConfig,
}

impl<L, C, V, B> Adjudicator<L, C, V, B>
where
    L: Ledger,
    C: Clock,
    V: SignatureVerifier,
    B: EventBus,
{
    pub fn new(config: AdjudicatorConfig, ledger: L, clock: C, verifier: V, bus: B) -> Self {
        Adjudicator {
            registry: ChannelRegistry::new(),
            ledger,
            clock,
            verifier,
            bus,
            config,
        }
    }

    pub fn config(&self) -> &AdjudicatorConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn get_channel(&self, channel_id: ChannelId) -> Option<Channel> {
        self.registry.get(channel_id)
    }

    pub fn get_dispute(&self, channel_id: ChannelId) -> Option<Dispute> {
        self.registry.get_dispute(channel_id)
    }

    pub fn get_channel_count(&self) -> u64 {
        self.registry.count()
    }

    pub fn is_channel_party(&self, channel_id: ChannelId, identity: &Address) -> bool {
        self.registry.is_party(channel_id, identity)
    }

    /// Runs `f` with exclusive access to the channel's slot.
    pub(crate) fn with_slot<T>(
        &self,
        channel_id: ChannelId,
        f: impl FnOnce(&mut Slot) -> Result<T>,
    ) -> Result<T> {
        let slot = self.registry.slot(channel_id)?;
        let mut guard = slot.lock();
        f(&mut guard)
    }

    /// Hands the batch to the ledger. Nothing is written to the records
    /// before this returned `Ok`.
    pub(crate) fn settle(&self, channel_id: ChannelId, batch: &Batch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.ledger.settle(batch.transfers()).map_err(|e| {
            warn!(channel_id, error = %e, "ledger rejected settlement");
            Error::from(e)
        })
    }

    /// Applies the signature policy to a proposed state.
    pub(crate) fn check_signatures(
        &self,
        channel: &Channel,
        state: &ChannelState,
        sigs: &[Signature; PARTICIPANTS],
    ) -> Result<()> {
        self.verifier.verify(channel, state, sigs).map_err(|e| {
            warn!(channel_id = channel.id, error = %e, "signature rejected");
            Error::InvalidSignature
        })
    }

    /// Batch paying out a closing split from custody.
    pub(crate) fn payout(&self, channel: &Channel, balance_a: Amount, balance_b: Amount) -> Batch {
        let mut batch = Batch::new();
        batch
            .push(self.config.custody, channel.party_a, balance_a)
            .push(self.config.custody, channel.party_b, balance_b);
        batch
    }

    pub(crate) fn publish(&self, event: ChannelEvent) {
        self.bus.publish(event);
    }
}
