mod encoding;

use core::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

pub use encoding::{decode_frame, FrameError, ProtoBufEncodingLayer};

use crate::messages::ChannelEvent;

/// Byte-level sink for encoded events (a socket, a log file, ...).
pub trait BytesBus: Debug {
    fn send_event(&self, msg: &[u8]);
}

/// Receives every event after the operation producing it has been committed.
///
/// Publishing happens while the channel's lock is still held, so
/// implementations must not call back into the adjudicator.
pub trait EventBus {
    fn publish(&self, event: ChannelEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl EventBus for NullBus {
    fn publish(&self, _event: ChannelEvent) {}
}

/// Keeps every published event in memory, in publishing order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ChannelEvent>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<ChannelEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns everything published so far.
    pub fn drain(&self) -> Vec<ChannelEvent> {
        core::mem::take(&mut *self.events.lock())
    }
}

impl EventBus for EventLog {
    fn publish(&self, event: ChannelEvent) {
        self.events.lock().push(event);
    }
}

impl<T: EventBus + ?Sized> EventBus for &T {
    fn publish(&self, event: ChannelEvent) {
        (**self).publish(event)
    }
}

impl<T: EventBus + ?Sized> EventBus for Arc<T> {
    fn publish(&self, event: ChannelEvent) {
        (**self).publish(event)
    }
}
