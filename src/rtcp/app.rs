use bytes::{BufMut, BytesMut};

use super::{Header, PacketKind};
use crate::{Error, octets};

/// APP: Application-Defined RTCP packet.
///
/// Intended for experimental use as new applications and new features
/// are developed. The subtype lives in the header's five count bits so
/// a set of APP packets can share one name.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P| subtype |   PT=APP=204  |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           SSRC/CSRC                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          name (ASCII)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   application-dependent data                ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    /// RTCP fixed header; `count` carries the subtype.
    pub header: Header,
    /// The synchronization source identifier of the packet originator.
    pub ssrc: u32,
    /// Four ASCII characters chosen by the defining application,
    /// carried as one big-endian word.
    pub name: u32,
    /// Application-dependent data, a 4-byte multiple; empty when
    /// absent.
    pub data: Vec<u8>,
}

impl App {
    pub fn new(subtype: u8) -> Self {
        let mut header = Header::new(PacketKind::APP, 2);
        header.count = subtype & 0x1f;

        Self {
            header,
            ssrc: 0,
            name: 0,
            data: Vec::new(),
        }
    }

    pub fn subtype(&self) -> u8 {
        self.header.count
    }

    pub fn len(&self) -> usize {
        12 + self.data.len()
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        bytes.put_u32(self.ssrc);
        bytes.put_u32(self.name);
        bytes.extend_from_slice(&self.data);
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::App;
    ///
    /// let buffer = [
    ///     0x85, 0xcc, 0x00, 0x02, 0x11, 0x22, 0x33, 0x44,
    ///     0x74, 0x65, 0x73, 0x74,
    /// ];
    ///
    /// let app = App::decode(&buffer).unwrap();
    ///
    /// assert_eq!(app.subtype(), 5);
    /// assert_eq!(app.ssrc, 0x11223344);
    /// assert_eq!(app.name, u32::from_be_bytes(*b"test"));
    /// assert!(app.data.is_empty());
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::APP {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total || total < 12 {
            return Err(Error::FormatError);
        }

        Ok(Self {
            header,
            ssrc: octets::read_u32(buf, 4)?,
            name: octets::read_u32(buf, 8)?,
            data: buf[12..total].to_vec(),
        })
    }

    /// Refuses to overwrite existing data; the wire requires a 4-byte
    /// multiple.
    pub fn set_data(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.data.is_empty() || data.is_empty() || data.len() % 4 != 0 {
            return Err(Error::InvalidInput);
        }

        self.data = data.to_vec();
        self.update_length();
        Ok(())
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
        self.update_length();
    }

    fn update_length(&mut self) {
        self.header.length = (self.len() / 4 - 1) as u16;
    }
}
