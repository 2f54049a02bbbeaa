//! ## RTP: A Transport Protocol for Real-Time Applications
//!
//! [RFC3550]: https://tools.ietf.org/html/rfc3550
//! [RFC4585]: https://tools.ietf.org/html/rfc4585
//!
//! RTP provides end-to-end delivery services for data with real-time
//! characteristics, such as interactive audio and video. Those services
//! include payload type identification, sequence numbering, timestamping
//! and delivery monitoring. The data transport is augmented by a control
//! protocol (RTCP) to allow monitoring of the data delivery in a manner
//! scalable to large multicast networks: each participant periodically
//! sends reception reports describing the quality of the streams it
//! receives, and the interval between those reports is scaled to the
//! session's total control bandwidth.
//!
//! This crate covers the wire level of [RFC3550] and the feedback
//! messages of [RFC4585]: encoding and decoding of RTP data packets and
//! RTCP control packets, the per-source reception statistics a receiver
//! maintains (sequence validity, loss, jitter), and the randomized
//! report-interval calculator. Sockets, clocks, media codecs and session
//! orchestration are the caller's business.
//!
//! ```
//! use rtp_codec::packet::Packet;
//!
//! let buffer = [
//!     0x80, 0xe0, 0x12, 0x34, 0xde, 0xad, 0xbe, 0xef,
//!     0xca, 0xfe, 0xba, 0xbe, 0x01, 0x02, 0x03, 0x04,
//! ];
//!
//! let packet = Packet::decode(&buffer).unwrap();
//!
//! assert_eq!(packet.header.payload_kind, 96);
//! assert_eq!(packet.header.sequence_number, 0x1234);
//! assert_eq!(packet.header.timestamp, 0xdeadbeef);
//! assert_eq!(packet.header.ssrc, 0xcafebabe);
//! assert_eq!(packet.payload, [0x01, 0x02, 0x03, 0x04]);
//! ```

pub mod header;
pub mod interval;
pub mod octets;
pub mod packet;
pub mod rtcp;
pub mod source;

use std::array::TryFromSliceError;

use num_enum::TryFromPrimitiveError;

use crate::rtcp::{PacketKind, sdes::ItemKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A buffer is too small, a size is not a multiple of 4 where the
    /// wire requires one, an argument is out of range, or a field that
    /// must be cleared first is still occupied.
    InvalidInput,
    /// The version bits are not 2.
    UnsupportedVersion,
    /// The payload type byte is not an RTCP packet type.
    UnknownPacketKind,
    /// An SDES item type byte is not defined by RFC 3550.
    UnknownSdesKind,
    /// The packet is truncated or internally inconsistent.
    FormatError,
    /// A count field on the wire cannot represent another entry.
    Capacity,
    /// The source has not yet received enough sequential packets.
    Probation,
    /// The sequence number jump was rejected; the packet was counted
    /// but should be dropped.
    InvalidSequence,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<TryFromSliceError> for Error {
    fn from(_: TryFromSliceError) -> Self {
        Self::InvalidInput
    }
}

impl From<TryFromPrimitiveError<PacketKind>> for Error {
    fn from(_: TryFromPrimitiveError<PacketKind>) -> Self {
        Self::UnknownPacketKind
    }
}

impl From<TryFromPrimitiveError<ItemKind>> for Error {
    fn from(_: TryFromPrimitiveError<ItemKind>) -> Self {
        Self::UnknownSdesKind
    }
}

/// Randomness injected by the caller.
///
/// The crate never reads a process-wide generator: RTP header seeds and
/// the report-interval jitter both draw from an implementation of this
/// trait. Any [`rand::RngCore`] works out of the box; tests supply
/// deterministic values.
pub trait Entropy {
    /// Returns the next 32 random bits.
    fn next_u32(&mut self) -> u32;

    /// Returns a uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<T: rand::RngCore> Entropy for T {
    fn next_u32(&mut self) -> u32 {
        rand::RngCore::next_u32(self)
    }

    fn next_unit(&mut self) -> f64 {
        // 53 bits of mantissa out of a full 64-bit draw.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
