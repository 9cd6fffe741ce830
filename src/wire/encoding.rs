use prost::{bytes::BufMut, DecodeError, EncodeError, Message};
use thiserror::Error;
use tracing::error;

use super::{BytesBus, EventBus};
use crate::{
    chanwire,
    messages::{ChannelEvent, ConversionError},
};

/// Size of the length prefix in front of every frame.
const LENGTH_PREFIX: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("message of {0} bytes does not fit a frame")]
    TooLong(usize),
    #[error("frame shorter than its length prefix")]
    Truncated,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Encodes events as protobuf messages and hands them to a [BytesBus].
///
/// Every frame is a 2-byte big-endian length followed by the encoded
/// [chanwire::Event].
#[derive(Debug)]
pub struct ProtoBufEncodingLayer<B: BytesBus> {
    pub bus: B,
}

impl<B: BytesBus> ProtoBufEncodingLayer<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    fn encode<T: Message>(msg: T) -> Result<Vec<u8>, FrameError> {
        // A fixed u16 length, not the LEB128 varint written by
        // `encode_length_delimited`.
        let len = msg.encoded_len();
        let prefix = u16::try_from(len).map_err(|_| FrameError::TooLong(len))?;

        let mut buf = Vec::with_capacity(LENGTH_PREFIX + len);
        buf.put_slice(&prefix.to_be_bytes());
        msg.encode(&mut buf)?;
        Ok(buf)
    }
}

impl<B: BytesBus> EventBus for ProtoBufEncodingLayer<B> {
    fn publish(&self, event: ChannelEvent) {
        let channel_id = event.channel_id();
        match Self::encode(chanwire::Event::from(event)) {
            Ok(buf) => self.bus.send_event(&buf),
            // The operation has already been committed, all we can do is drop
            // the notification.
            Err(e) => error!(channel_id, error = %e, "dropping event that does not fit a frame"),
        }
    }
}

/// Decodes one frame written by [ProtoBufEncodingLayer]. Bytes after the
/// frame are ignored.
pub fn decode_frame(buf: &[u8]) -> Result<ChannelEvent, FrameError> {
    if buf.len() < LENGTH_PREFIX {
        return Err(FrameError::Truncated);
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let body = buf
        .get(LENGTH_PREFIX..LENGTH_PREFIX + len)
        .ok_or(FrameError::Truncated)?;

    let msg = chanwire::Event::decode(body)?;
    Ok(msg.try_into()?)
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::{messages::CloseReason, types::Address};

    #[derive(Debug, Default)]
    struct RecordingBus {
        frames: Mutex<Vec<Vec<u8>>>,
    }

    impl BytesBus for RecordingBus {
        fn send_event(&self, msg: &[u8]) {
            self.frames.lock().push(msg.to_vec());
        }
    }

    fn closed() -> ChannelEvent {
        ChannelEvent::Closed {
            id: 1,
            balance_a: 2500.into(),
            balance_b: 500.into(),
            nonce: 0,
            reason: CloseReason::Cooperative,
        }
    }

    #[test]
    fn frame_starts_with_big_endian_length() {
        let layer = ProtoBufEncodingLayer::new(RecordingBus::default());
        layer.publish(closed());

        let frames = layer.bus.frames.lock();
        assert_eq!(frames.len(), 1);
        let frame = &frames[0];
        let len = u16::from_be_bytes([frame[0], frame[1]]) as usize;
        assert_eq!(len, frame.len() - LENGTH_PREFIX);
        assert_eq!(len, chanwire::Event::from(closed()).encoded_len());
    }

    #[test]
    fn published_frames_decode() {
        let layer = ProtoBufEncodingLayer::new(RecordingBus::default());
        let created = ChannelEvent::Created {
            id: 4,
            party_a: Address([0xa1; 20]),
            party_b: Address([0xb0; 20]),
            deposit_a: 1000.into(),
            deposit_b: 2000.into(),
            timeout: 200,
        };
        layer.publish(created);
        layer.publish(closed());

        let frames = layer.bus.frames.lock();
        assert_eq!(decode_frame(&frames[0]), Ok(created));
        assert_eq!(decode_frame(&frames[1]), Ok(closed()));
    }

    #[test]
    fn short_frames_are_rejected() {
        assert_eq!(decode_frame(&[0x00]), Err(FrameError::Truncated));
        assert_eq!(decode_frame(&[0x00, 0x05, 0x08]), Err(FrameError::Truncated));
    }

    #[test]
    fn oversized_messages_do_not_encode() {
        let msg = chanwire::ChannelCreated {
            party_a: vec![0; 1 << 16],
            ..Default::default()
        };
        assert_eq!(
            ProtoBufEncodingLayer::<RecordingBus>::encode(msg),
            Err(FrameError::TooLong((1 << 16) + 4))
        );
    }
}
