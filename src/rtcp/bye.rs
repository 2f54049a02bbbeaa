use bytes::{BufMut, BytesMut};

use super::{Header, PacketKind};
use crate::{Error, octets};

/// BYE: Goodbye RTCP packet.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|    SC   |   PT=BYE=203  |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           SSRC/CSRC                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :                              ...                              :
/// +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// |     length    |               reason for leaving            ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bye {
    /// RTCP fixed header; `count` tracks `sources.len()`.
    pub header: Header,
    /// The sources leaving the session.
    pub sources: Vec<u32>,
    /// Optional reason text, zero padded to a 32-bit boundary on the
    /// wire; empty when absent.
    pub reason: Vec<u8>,
}

impl Default for Bye {
    fn default() -> Self {
        Self::new()
    }
}

impl Bye {
    pub fn new() -> Self {
        Self {
            header: Header::new(PacketKind::BYE, 0),
            sources: Vec::new(),
            reason: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        let mut size = 4 + self.sources.len() * 4;
        if !self.reason.is_empty() {
            size += 1 + self.reason.len();
            if size % 4 > 0 {
                size += 4 - size % 4;
            }
        }

        size
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        let end = bytes.len() + self.len();

        self.header.encode(bytes);
        for source in &self.sources {
            bytes.put_u32(*source);
        }

        if !self.reason.is_empty() {
            bytes.put_u8(self.reason.len() as u8);
            bytes.extend_from_slice(&self.reason);
        }

        while bytes.len() < end {
            bytes.put_u8(0);
        }
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::Bye;
    ///
    /// let buffer = [
    ///     0x81, 0xcb, 0x00, 0x02, 0xaa, 0xbb, 0xcc, 0xdd,
    ///     0x03, 0x63, 0x79, 0x61,
    /// ];
    ///
    /// let bye = Bye::decode(&buffer).unwrap();
    ///
    /// assert_eq!(bye.sources, [0xaabbccdd]);
    /// assert_eq!(bye.reason_text(), Some("cya"));
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::BYE {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total || total < 4 + header.count as usize * 4 {
            return Err(Error::FormatError);
        }

        let mut offset = 4;
        let mut sources = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            sources.push(octets::read_u32(buf, offset)?);
            offset += 4;
        }

        let reason = if offset < total {
            let length = buf[offset] as usize;
            if offset + 1 + length > total {
                return Err(Error::FormatError);
            }

            buf[offset + 1..offset + 1 + length].to_vec()
        } else {
            Vec::new()
        };

        Ok(Self {
            header,
            sources,
            reason,
        })
    }

    pub fn find_source(&self, ssrc: u32) -> Option<usize> {
        self.sources.iter().position(|source| *source == ssrc)
    }

    /// Rejects duplicates; the 5-bit count field caps the list at 31
    /// sources.
    pub fn add_source(&mut self, ssrc: u32) -> Result<(), Error> {
        if self.sources.len() == 31 {
            return Err(Error::Capacity);
        }

        if self.find_source(ssrc).is_some() {
            return Err(Error::InvalidInput);
        }

        self.sources.push(ssrc);
        self.update_length();
        Ok(())
    }

    /// Removing an absent source is a no-op.
    pub fn remove_source(&mut self, ssrc: u32) {
        if let Some(index) = self.find_source(ssrc) {
            self.sources.remove(index);
            self.update_length();
        }
    }

    pub fn reason_text(&self) -> Option<&str> {
        if self.reason.is_empty() {
            return None;
        }

        std::str::from_utf8(&self.reason).ok()
    }

    /// Refuses to overwrite an existing reason; the length byte caps
    /// the text at 255 octets.
    pub fn set_reason(&mut self, text: &str) -> Result<(), Error> {
        if !self.reason.is_empty() {
            return Err(Error::InvalidInput);
        }

        if text.len() > 255 {
            return Err(Error::Capacity);
        }

        self.reason = text.as_bytes().to_vec();
        self.update_length();
        Ok(())
    }

    pub fn clear_reason(&mut self) {
        self.reason.clear();
        self.update_length();
    }

    fn update_length(&mut self) {
        self.header.count = self.sources.len() as u8;
        self.header.length = (self.len() / 4 - 1) as u16;
    }
}
