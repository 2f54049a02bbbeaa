use bytes::{BufMut, BytesMut};

use super::PacketKind;
use crate::{Error, octets};

const VERSION_MASK: u8 = 0b11000000;
const PADDING_MASK: u8 = 0b00100000;
const COUNT_MASK: u8 = 0b00011111;

/// The 4-byte preamble shared by every RTCP packet.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|  count  |      PT       |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The version is not stored: it is fixed to 2 on encode and packets
/// carrying anything else are rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// If set, this individual RTCP packet contains some additional
    /// padding octets at the end which are not part of the control
    /// information but are included in the length field.
    pub padding: bool,
    /// Five bits whose meaning depends on the packet type: the report
    /// count for SR/RR, the source count for SDES/BYE, the subtype for
    /// APP and the feedback message type (FMT) for RTPFB/PSFB.
    pub count: u8,
    /// packet type (PT): 8 bits.
    pub kind: PacketKind,
    /// The length of this RTCP packet in 32-bit words minus one,
    /// including the header and any padding. The offset of one makes
    /// zero a valid length and avoids a possible infinite loop in
    /// scanning a compound RTCP packet.
    pub length: u16,
}

impl Header {
    pub fn new(kind: PacketKind, length: u16) -> Self {
        Self {
            padding: false,
            count: 0,
            kind,
            length,
        }
    }

    /// Total packet size in bytes announced by the length word.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::Header;
    ///
    /// let buffer = [
    ///     0x80, 0xc8, 0x00, 0x06, 0x79, 0x26, 0x69, 0x55,
    ///     0xe8, 0xe2, 0xe2, 0x17, 0xd4, 0x2f, 0x05, 0x91,
    ///     0x36, 0x01, 0xb0, 0xaf, 0x34, 0x85, 0x78, 0x5e,
    ///     0x2d, 0xbc, 0x2a, 0x98,
    /// ];
    ///
    /// assert_eq!(Header::peek_len(&buffer).unwrap(), 28);
    /// ```
    pub fn peek_len(buf: &[u8]) -> Result<usize, Error> {
        Ok((octets::read_u16(buf, 2)? as usize + 1) * 4)
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        bytes.put_u8((2 << 6) | ((self.padding as u8) << 5) | (self.count & COUNT_MASK));
        bytes.put_u8(self.kind as u8);
        bytes.put_u16(self.length);
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::{Header, PacketKind};
    ///
    /// let buffer = [0x81, 0xc9, 0x00, 0x07, 0x79, 0x26, 0x69, 0x55];
    /// let header = Header::decode(&buffer).unwrap();
    ///
    /// assert_eq!(header.kind, PacketKind::RR);
    /// assert_eq!(header.count, 1);
    /// assert_eq!(header.length, 7);
    /// assert!(!header.padding);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 4 {
            return Err(Error::InvalidInput);
        }

        if (buf[0] & VERSION_MASK) >> 6 != 2 {
            return Err(Error::UnsupportedVersion);
        }

        Ok(Self {
            padding: (buf[0] & PADDING_MASK) != 0,
            count: buf[0] & COUNT_MASK,
            kind: PacketKind::try_from(buf[1])?,
            length: octets::read_u16(buf, 2)?,
        })
    }
}
