use bytes::{BufMut, BytesMut};

use crate::{Entropy, Error, octets};

const VERSION_MASK: u8 = 0b11000000;
const PADDING_MASK: u8 = 0b00100000;
const EXTENSION_MASK: u8 = 0b00010000;
const CSRC_COUNT_MASK: u8 = 0b00001111;
const MARKER_MASK: u8 = 0b10000000;
const PAYLOAD_KIND_MASK: u8 = 0b01111111;

/// A profile-defined header extension: a 16-bit identifier and a list
/// of 32-bit words carried transparently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub id: u16,
    pub words: Vec<u32>,
}

/// RTP fixed header, CSRC list and optional extension.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|X|  CC   |M|     PT      |       sequence number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           synchronization source (SSRC) identifier            |
/// +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// |            contributing source (CSRC) identifiers             |
/// |                             ....                              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// If set, the packet contains one or more additional padding
    /// octets at the end which are not part of the payload.
    pub padding: bool,
    /// The interpretation of the marker is defined by a profile. It is
    /// intended to allow significant events such as frame boundaries
    /// to be marked in the packet stream.
    pub marker: bool,
    /// This field identifies the format of the RTP payload and
    /// determines its interpretation by the application. Zero is not a
    /// valid value here: it is used as a sanity check against non-RTP
    /// traffic on decode.
    pub payload_kind: u8,
    /// The sequence number increments by one for each RTP data packet
    /// sent, and may be used by the receiver to detect packet loss and
    /// to restore packet sequence. The initial value SHOULD be random
    /// to make known-plaintext attacks on encryption more difficult.
    pub sequence_number: u16,
    /// The timestamp reflects the sampling instant of the first octet
    /// in the RTP data packet.
    pub timestamp: u32,
    /// The SSRC field identifies the synchronization source. This
    /// identifier SHOULD be chosen randomly, with the intent that no
    /// two synchronization sources within the same RTP session will
    /// have the same SSRC identifier.
    pub ssrc: u32,
    /// The CSRC list identifies the contributing sources for the
    /// payload contained in this packet. CSRC identifiers are inserted
    /// by mixers, using the SSRC identifiers of contributing sources.
    /// If there are more than 15 contributing sources, only 15 can be
    /// identified.
    pub csrc_list: Vec<u32>,
    /// Profile-defined extension; the X bit on the wire is derived
    /// from its presence.
    pub extension: Option<Extension>,
}

impl Header {
    /// A fresh header for the given payload type, with the sequence
    /// number, timestamp and SSRC seeded from the caller's entropy as
    /// RFC 3550 §5.1 recommends.
    pub fn new(payload_kind: u8, entropy: &mut impl Entropy) -> Self {
        Self {
            padding: false,
            marker: false,
            payload_kind: payload_kind & PAYLOAD_KIND_MASK,
            sequence_number: entropy.next_u32() as u16,
            timestamp: entropy.next_u32(),
            ssrc: entropy.next_u32(),
            csrc_list: Vec::new(),
            extension: None,
        }
    }

    /// Header size in bytes, CSRC list and extension included.
    pub fn len(&self) -> usize {
        let mut size = 12 + self.csrc_list.len() * 4;
        if let Some(extension) = &self.extension {
            size += 4 * (1 + extension.words.len());
        }

        size
    }

    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use rtp_codec::header::Header;
    ///
    /// let header = Header {
    ///     padding: false,
    ///     marker: true,
    ///     payload_kind: 96,
    ///     sequence_number: 0x1234,
    ///     timestamp: 0xdeadbeef,
    ///     ssrc: 0xcafebabe,
    ///     csrc_list: Vec::new(),
    ///     extension: None,
    /// };
    ///
    /// let mut bytes = BytesMut::new();
    /// header.encode(&mut bytes);
    ///
    /// assert_eq!(&bytes[..], [
    ///     0x80, 0xe0, 0x12, 0x34, 0xde, 0xad, 0xbe, 0xef,
    ///     0xca, 0xfe, 0xba, 0xbe,
    /// ]);
    /// ```
    pub fn encode(&self, bytes: &mut BytesMut) {
        bytes.put_u8(
            (2 << 6)
                | ((self.padding as u8) << 5)
                | ((self.extension.is_some() as u8) << 4)
                | (self.csrc_list.len() as u8 & CSRC_COUNT_MASK),
        );

        bytes.put_u8(((self.marker as u8) << 7) | (self.payload_kind & PAYLOAD_KIND_MASK));
        bytes.put_u16(self.sequence_number);
        bytes.put_u32(self.timestamp);
        bytes.put_u32(self.ssrc);

        for csrc in &self.csrc_list {
            bytes.put_u32(*csrc);
        }

        if let Some(extension) = &self.extension {
            bytes.put_u16(extension.id);
            bytes.put_u16(extension.words.len() as u16);
            for word in &extension.words {
                bytes.put_u32(*word);
            }
        }
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::header::Header;
    ///
    /// let buffer = [
    ///     0x90, 0x72, 0x04, 0xf1, 0xf8, 0x87, 0x3f, 0xad,
    ///     0x67, 0xfe, 0x9d, 0xfc, 0xbe, 0xde, 0x00, 0x01,
    ///     0x22, 0xfa, 0x01, 0x93,
    /// ];
    ///
    /// let header = Header::decode(&buffer).unwrap();
    ///
    /// assert_eq!(header.payload_kind, 114);
    /// assert_eq!(header.sequence_number, 1265);
    /// assert_eq!(header.timestamp, 4169613229);
    /// assert_eq!(header.ssrc, 1744739836);
    ///
    /// let extension = header.extension.as_ref().unwrap();
    /// assert_eq!(extension.id, 0xbede);
    /// assert_eq!(extension.words, [0x22fa0193]);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 12 {
            return Err(Error::InvalidInput);
        }

        if (buf[0] & VERSION_MASK) >> 6 != 2 {
            return Err(Error::UnsupportedVersion);
        }

        // Sanity check against non-RTP traffic.
        let payload_kind = buf[1] & PAYLOAD_KIND_MASK;
        if payload_kind == 0 {
            return Err(Error::FormatError);
        }

        let csrc_count = (buf[0] & CSRC_COUNT_MASK) as usize;
        let has_extension = (buf[0] & EXTENSION_MASK) != 0;

        let mut offset = 12 + csrc_count * 4;
        let needed = offset + if has_extension { 4 } else { 0 };
        if buf.len() < needed {
            return Err(Error::FormatError);
        }

        let mut csrc_list = Vec::with_capacity(csrc_count);
        for i in 0..csrc_count {
            csrc_list.push(octets::read_u32(buf, 12 + i * 4)?);
        }

        let extension = if has_extension {
            let id = octets::read_u16(buf, offset)?;
            let count = octets::read_u16(buf, offset + 2)? as usize;
            offset += 4;

            if buf.len() < offset + count * 4 {
                return Err(Error::FormatError);
            }

            let mut words = Vec::with_capacity(count);
            for i in 0..count {
                words.push(octets::read_u32(buf, offset + i * 4)?);
            }

            Some(Extension { id, words })
        } else {
            None
        };

        Ok(Self {
            padding: (buf[0] & PADDING_MASK) != 0,
            marker: (buf[1] & MARKER_MASK) != 0,
            payload_kind,
            sequence_number: octets::read_u16(buf, 2)?,
            timestamp: octets::read_u32(buf, 4)?,
            ssrc: octets::read_u32(buf, 8)?,
            csrc_list,
            extension,
        })
    }

    pub fn find_csrc(&self, csrc: u32) -> Option<usize> {
        self.csrc_list.iter().position(|other| *other == csrc)
    }

    /// Rejects duplicates; the 4-bit CC field caps the list at 15
    /// entries.
    pub fn add_csrc(&mut self, csrc: u32) -> Result<(), Error> {
        if self.csrc_list.len() == 15 {
            return Err(Error::Capacity);
        }

        if self.find_csrc(csrc).is_some() {
            return Err(Error::InvalidInput);
        }

        self.csrc_list.push(csrc);
        Ok(())
    }

    /// Removing an absent CSRC is a no-op; insertion order of the rest
    /// is preserved.
    pub fn remove_csrc(&mut self, csrc: u32) {
        if let Some(index) = self.find_csrc(csrc) {
            self.csrc_list.remove(index);
        }
    }

    /// Refuses to overwrite an existing extension and rejects an empty
    /// word list.
    pub fn set_ext(&mut self, id: u16, words: &[u32]) -> Result<(), Error> {
        if self.extension.is_some() || words.is_empty() {
            return Err(Error::InvalidInput);
        }

        if words.len() > u16::MAX as usize {
            return Err(Error::Capacity);
        }

        self.extension = Some(Extension {
            id,
            words: words.to_vec(),
        });

        Ok(())
    }

    pub fn clear_ext(&mut self) {
        self.extension = None;
    }
}
