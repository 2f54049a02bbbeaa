//! ## RTP Control Protocol (RTCP)
//!
//! RTCP is based on the periodic transmission of control packets to all
//! participants in the session, using the same distribution mechanism
//! as the data packets. Each packet begins with a fixed preamble
//! similar to that of RTP data packets, followed by structured elements
//! that may be of variable length according to the packet type but
//! MUST end on a 32-bit boundary. Multiple RTCP packets are usually
//! concatenated into one compound datagram; composition stays with the
//! caller, so every encoder here appends to the output buffer and every
//! decoder consumes exactly the length its header announces.

pub mod app;
pub mod bye;
pub mod feedback;
pub mod header;
pub mod report;
pub mod rr;
pub mod sdes;
pub mod sr;

use bytes::BytesMut;
use num_enum::TryFromPrimitive;

pub use self::{
    app::App,
    bye::Bye,
    feedback::{Feedback, FirItem},
    header::Header,
    report::ReportBlock,
    rr::ReceiverReport,
    sdes::Sdes,
    sr::SenderReport,
};

use crate::Error;

/// RTCP packet type.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum PacketKind {
    /// Sender report.
    SR = 200,
    /// Receiver report.
    RR = 201,
    /// Source description.
    SDES = 202,
    /// Goodbye.
    BYE = 203,
    /// Application-defined.
    APP = 204,
    /// Transport layer feedback.
    RTPFB = 205,
    /// Payload-specific feedback.
    PSFB = 206,
}

/// Classifies a buffer by its payload type byte, without parsing.
///
/// # Test
///
/// ```
/// use rtp_codec::rtcp::{packet_kind, PacketKind};
/// use rtp_codec::Error;
///
/// assert_eq!(packet_kind(&[0x80, 0xc8, 0x00, 0x06]), Ok(PacketKind::SR));
/// assert_eq!(packet_kind(&[0x80, 0x00, 0x00, 0x00]), Err(Error::UnknownPacketKind));
/// ```
pub fn packet_kind(buf: &[u8]) -> Result<PacketKind, Error> {
    if buf.len() < 2 {
        return Err(Error::InvalidInput);
    }

    Ok(PacketKind::try_from(buf[1])?)
}

/// Any single RTCP packet, discriminated on the payload type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    SR(SenderReport),
    RR(ReceiverReport),
    SDES(Sdes),
    BYE(Bye),
    APP(App),
    FB(Feedback),
}

impl Packet {
    /// Peeks the payload type and runs the matching typed decoder.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::Packet;
    ///
    /// let buffer = [
    ///     0x80, 0xc9, 0x00, 0x01, 0x79, 0x26, 0x69, 0x55,
    /// ];
    ///
    /// let Packet::RR(rr) = Packet::decode(&buffer).unwrap() else {
    ///     unreachable!();
    /// };
    ///
    /// assert_eq!(rr.ssrc, 0x79266955);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        Ok(match packet_kind(buf)? {
            PacketKind::SR => Self::SR(SenderReport::decode(buf)?),
            PacketKind::RR => Self::RR(ReceiverReport::decode(buf)?),
            PacketKind::SDES => Self::SDES(Sdes::decode(buf)?),
            PacketKind::BYE => Self::BYE(Bye::decode(buf)?),
            PacketKind::APP => Self::APP(App::decode(buf)?),
            PacketKind::RTPFB | PacketKind::PSFB => Self::FB(Feedback::decode(buf)?),
        })
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        match self {
            Self::SR(sr) => sr.encode(bytes),
            Self::RR(rr) => rr.encode(bytes),
            Self::SDES(sdes) => sdes.encode(bytes),
            Self::BYE(bye) => bye.encode(bytes),
            Self::APP(app) => app.encode(bytes),
            Self::FB(feedback) => feedback.encode(bytes),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::SR(sr) => sr.len(),
            Self::RR(rr) => rr.len(),
            Self::SDES(sdes) => sdes.len(),
            Self::BYE(bye) => bye.len(),
            Self::APP(app) => app.len(),
            Self::FB(feedback) => feedback.len(),
        }
    }

    pub fn kind(&self) -> PacketKind {
        match self {
            Self::SR(sr) => sr.header.kind,
            Self::RR(rr) => rr.header.kind,
            Self::SDES(sdes) => sdes.header.kind,
            Self::BYE(bye) => bye.header.kind,
            Self::APP(app) => app.header.kind,
            Self::FB(feedback) => feedback.header.kind,
        }
    }
}
