//! Protobuf messages used to put [crate::messages::ChannelEvent]s on the
//! wire.
//!
//! Equivalent to what prost-build generates for:
//!
//! ```proto
//! syntax = "proto3";
//! package chanwire;
//!
//! enum CloseReason { COOPERATIVE = 0; TIMEOUT = 1; CHALLENGE = 2; }
//!
//! message Event {
//!   uint64 channel_id = 1;
//!   oneof kind {
//!     ChannelCreated created = 2;
//!     Deposited deposited = 3;
//!     ChallengeStarted challenge_started = 4;
//!     ChallengeResponded challenge_responded = 5;
//!     ChannelClosed closed = 6;
//!   }
//! }
//! ```
//!
//! Addresses are 20 raw bytes, amounts 32 big-endian bytes.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(uint64, tag = "1")]
    pub channel_id: u64,
    #[prost(oneof = "event::Kind", tags = "2, 3, 4, 5, 6")]
    pub kind: ::core::option::Option<event::Kind>,
}

/// Nested message and enum types in `Event`.
pub mod event {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "2")]
        Created(super::ChannelCreated),
        #[prost(message, tag = "3")]
        Deposited(super::Deposited),
        #[prost(message, tag = "4")]
        ChallengeStarted(super::ChallengeStarted),
        #[prost(message, tag = "5")]
        ChallengeResponded(super::ChallengeResponded),
        #[prost(message, tag = "6")]
        Closed(super::ChannelClosed),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelCreated {
    #[prost(bytes = "vec", tag = "1")]
    pub party_a: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub party_b: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub deposit_a: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub deposit_b: Vec<u8>,
    #[prost(uint64, tag = "5")]
    pub timeout: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Deposited {
    #[prost(bytes = "vec", tag = "1")]
    pub party: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub amount: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub total_deposit: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChallengeStarted {
    #[prost(bytes = "vec", tag = "1")]
    pub challenger: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
    #[prost(uint64, tag = "3")]
    pub challenge_time: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChallengeResponded {
    #[prost(bytes = "vec", tag = "1")]
    pub responder: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelClosed {
    #[prost(bytes = "vec", tag = "1")]
    pub balance_a: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub balance_b: Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub nonce: u64,
    #[prost(enumeration = "CloseReason", tag = "4")]
    pub reason: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CloseReason {
    Cooperative = 0,
    Timeout = 1,
    Challenge = 2,
}
