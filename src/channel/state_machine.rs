//! Direct `Open -> Closed` transitions: cooperative close and timeout close.

use tracing::{debug, info};

use super::{BalanceUpdate, ChannelState};
use crate::{
    adjudicator::Adjudicator,
    clock::Clock,
    error::{Error, Result},
    ledger::Ledger,
    messages::{ChannelEvent, CloseReason},
    sig::SignatureVerifier,
    types::{Address, Amount, ChannelId, Signature, PARTICIPANTS},
    wire::EventBus,
};

impl<L, C, V, B> Adjudicator<L, C, V, B>
where
    L: Ledger,
    C: Clock,
    V: SignatureVerifier,
    B: EventBus,
{
    /// Closes the channel immediately with the given split.
    ///
    /// Only one of the parties has to call this. Whether the other party
    /// agreed is left to the signature policy; the default policy accepts any
    /// signature, so a single party can close with any split adding up to the
    /// total deposit.
    pub fn cooperative_close(
        &self,
        caller: Address,
        channel_id: ChannelId,
        final_a: Amount,
        final_b: Amount,
        sigs: [Signature; PARTICIPANTS],
    ) -> Result<()> {
        debug!(channel_id, %caller, %final_a, %final_b, "cooperative close");

        self.with_slot(channel_id, |slot| {
            let mut channel = slot.channel;
            channel.ensure_open()?;
            channel.ensure_split(final_a, final_b)?;
            channel.ensure_party(&caller)?;
            let final_state = ChannelState::new(
                channel_id,
                BalanceUpdate::new(final_a, final_b, channel.nonce),
                true,
            );
            self.check_signatures(&channel, &final_state, &sigs)?;

            let batch = self.payout(&channel, final_a, final_b);
            channel.close_with(final_a, final_b);
            self.settle(channel_id, &batch)?;
            slot.channel = channel;

            info!(channel_id, %final_a, %final_b, "channel closed cooperatively");
            self.publish(ChannelEvent::Closed {
                id: channel_id,
                balance_a: final_a,
                balance_b: final_b,
                nonce: channel.nonce,
                reason: CloseReason::Cooperative,
            });
            Ok(())
        })
    }

    /// Closes the channel with its recorded balances once its timeout has
    /// been reached. Callable by anyone.
    ///
    /// A live dispute is neither paid nor removed; it stays readable through
    /// [crate::channel::ChannelRegistry::get_dispute].
    pub fn timeout_close(&self, caller: Address, channel_id: ChannelId) -> Result<()> {
        debug!(channel_id, %caller, "timeout close");

        self.with_slot(channel_id, |slot| {
            let mut channel = slot.channel;
            channel.ensure_open()?;
            if self.clock.now() < channel.timeout {
                return Err(Error::TimeoutNotReached);
            }

            let (balance_a, balance_b) = (channel.balance_a, channel.balance_b);
            let batch = self.payout(&channel, balance_a, balance_b);
            channel.close_with(balance_a, balance_b);
            self.settle(channel_id, &batch)?;
            slot.channel = channel;

            info!(channel_id, %balance_a, %balance_b, "channel closed after timeout");
            self.publish(ChannelEvent::Closed {
                id: channel_id,
                balance_a,
                balance_b,
                nonce: channel.nonce,
                reason: CloseReason::Timeout,
            });
            Ok(())
        })
    }
}
