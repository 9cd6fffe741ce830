//! Challenge/response dispute resolution.
//!
//! A party that cannot get its counterparty to close cooperatively opens a
//! dispute with the latest state it holds. During the challenge period either
//! party may respond with a state carrying a strictly higher nonce. Once the
//! period has elapsed, measured from the challenge, anyone can finalize and
//! the last proposal is paid out.
//!
//! Responses never move the window. A further `challenge_close` on a live
//! dispute only has to meet the channel nonce and overwrites the dispute,
//! restarting the window at the current clock.
//!
//! Signatures on proposals go through the adjudicator's [SignatureVerifier].
//! With [crate::sig::AcceptAnySignature] safety rests only on "caller is a
//! party" and the nonce race: a party whose counterparty stays silent for the
//! whole window can finalize any split it likes.

use serde::Serialize;
use tracing::{debug, info};

use super::{BalanceUpdate, ChannelState, SignedUpdate};
use crate::{
    adjudicator::Adjudicator,
    clock::Clock,
    error::{Error, Result},
    ledger::Ledger,
    messages::{ChannelEvent, CloseReason},
    sig::SignatureVerifier,
    types::{Address, Amount, ChannelId, Signature},
    wire::EventBus,
};

/// Settlement proposal contested during the challenge period.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Dispute {
    pub challenger: Address,
    pub new_balance_a: Amount,
    pub new_balance_b: Amount,
    pub new_nonce: u64,
    /// Clock value of the latest `challenge_close`. Responses do not move it.
    pub challenge_time: u64,
    pub signature_a: Signature,
    pub signature_b: Signature,
}

impl Dispute {
    pub fn proposal(&self) -> BalanceUpdate {
        BalanceUpdate::new(self.new_balance_a, self.new_balance_b, self.new_nonce)
    }

    /// First clock value at which the dispute may be finalized.
    pub fn finalizable_at(&self, challenge_period: u64) -> u64 {
        self.challenge_time.saturating_add(challenge_period)
    }

    fn replace_proposal(&mut self, signed: &SignedUpdate) {
        self.new_balance_a = signed.update.balance_a;
        self.new_balance_b = signed.update.balance_b;
        self.new_nonce = signed.update.nonce;
        self.signature_a = signed.sigs[0];
        self.signature_b = signed.sigs[1];
    }
}

impl<L, C, V, B> Adjudicator<L, C, V, B>
where
    L: Ledger,
    C: Clock,
    V: SignatureVerifier,
    B: EventBus,
{
    /// Opens a dispute on an open channel with `signed` as the proposed final
    /// state, replacing any live one. Does not close the channel.
    pub fn challenge_close(
        &self,
        caller: Address,
        channel_id: ChannelId,
        signed: SignedUpdate,
    ) -> Result<()> {
        debug!(channel_id, %caller, nonce = signed.update.nonce, "challenge close");

        self.with_slot(channel_id, |slot| {
            let channel = slot.channel;
            channel.ensure_open()?;
            channel.ensure_party(&caller)?;

            let update = signed.update;
            if update.nonce < channel.nonce {
                return Err(Error::InvalidSignature);
            }
            channel.ensure_split(update.balance_a, update.balance_b)?;
            self.check_signatures(
                &channel,
                &ChannelState::new(channel_id, update, false),
                &signed.sigs,
            )?;

            let challenge_time = self.clock.now();
            if let Some(live) = slot.dispute {
                debug!(channel_id, replaced_nonce = live.new_nonce, "overwriting live dispute");
            }
            slot.dispute = Some(Dispute {
                challenger: caller,
                new_balance_a: update.balance_a,
                new_balance_b: update.balance_b,
                new_nonce: update.nonce,
                challenge_time,
                signature_a: signed.sigs[0],
                signature_b: signed.sigs[1],
            });

            info!(channel_id, challenger = %caller, nonce = update.nonce, challenge_time, "dispute opened");
            self.publish(ChannelEvent::ChallengeStarted {
                id: channel_id,
                challenger: caller,
                nonce: update.nonce,
                challenge_time,
            });
            Ok(())
        })
    }

    /// Replaces the live dispute's proposal with a strictly newer state.
    pub fn challenge_response(
        &self,
        caller: Address,
        channel_id: ChannelId,
        signed: SignedUpdate,
    ) -> Result<()> {
        debug!(channel_id, %caller, nonce = signed.update.nonce, "challenge response");

        self.with_slot(channel_id, |slot| {
            let channel = slot.channel;
            channel.ensure_open()?;
            let mut dispute = slot.dispute.ok_or(Error::ChannelNotFound)?;
            channel.ensure_party(&caller)?;

            let update = signed.update;
            if update.nonce <= dispute.new_nonce {
                return Err(Error::InvalidSignature);
            }
            channel.ensure_split(update.balance_a, update.balance_b)?;
            self.check_signatures(
                &channel,
                &ChannelState::new(channel_id, update, false),
                &signed.sigs,
            )?;

            dispute.replace_proposal(&signed);
            slot.dispute = Some(dispute);

            info!(channel_id, responder = %caller, nonce = update.nonce, "dispute superseded");
            self.publish(ChannelEvent::ChallengeResponded {
                id: channel_id,
                responder: caller,
                nonce: update.nonce,
            });
            Ok(())
        })
    }

    /// Pays out the dispute's proposal once the challenge period has elapsed
    /// and closes the channel. Callable by anyone.
    pub fn finalize_challenge(&self, caller: Address, channel_id: ChannelId) -> Result<()> {
        debug!(channel_id, %caller, "finalize challenge");

        self.with_slot(channel_id, |slot| {
            let mut channel = slot.channel;
            channel.ensure_open()?;
            let dispute = slot.dispute.ok_or(Error::ChannelNotFound)?;

            let now = self.clock.now();
            if now < dispute.finalizable_at(channel.challenge_period) {
                return Err(Error::TimeoutNotReached);
            }

            let batch = self.payout(&channel, dispute.new_balance_a, dispute.new_balance_b);
            channel.nonce = dispute.new_nonce;
            channel.close_with(dispute.new_balance_a, dispute.new_balance_b);
            self.settle(channel_id, &batch)?;
            slot.channel = channel;
            slot.dispute = None;

            info!(
                channel_id,
                balance_a = %channel.balance_a,
                balance_b = %channel.balance_b,
                nonce = channel.nonce,
                "dispute finalized, channel closed"
            );
            self.publish(ChannelEvent::Closed {
                id: channel_id,
                balance_a: channel.balance_a,
                balance_b: channel.balance_b,
                nonce: channel.nonce,
                reason: CloseReason::Challenge,
            });
            Ok(())
        })
    }
}
