use bytes::BytesMut;

use crate::{Entropy, Error, header::Header};

/// An RTP data packet: the header plus the opaque payload bytes.
///
/// The payload is owned by the packet, copied in on decode or
/// [`set_payload`](Packet::set_payload) and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: Header,
    pub payload: Vec<u8>,
}

impl Packet {
    /// A fresh packet with a seeded header and no payload.
    pub fn new(payload_kind: u8, entropy: &mut impl Entropy) -> Self {
        Self {
            header: Header::new(payload_kind, entropy),
            payload: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        bytes.extend_from_slice(&self.payload);
    }

    /// Whatever follows the header becomes the payload.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::packet::Packet;
    ///
    /// let buffer = [
    ///     0x80, 0xe0, 0x12, 0x34, 0xde, 0xad, 0xbe, 0xef,
    ///     0xca, 0xfe, 0xba, 0xbe, 0x01, 0x02, 0x03, 0x04,
    /// ];
    ///
    /// let packet = Packet::decode(&buffer).unwrap();
    ///
    /// assert_eq!(packet.header.payload_kind, 96);
    /// assert_eq!(packet.payload, [0x01, 0x02, 0x03, 0x04]);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        let payload = buf[header.len()..].to_vec();

        Ok(Self { header, payload })
    }

    /// Refuses to overwrite an existing payload; clear it first.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.payload.is_empty() || data.is_empty() {
            return Err(Error::InvalidInput);
        }

        self.payload = data.to_vec();
        Ok(())
    }

    pub fn clear_payload(&mut self) {
        self.payload.clear();
    }
}
