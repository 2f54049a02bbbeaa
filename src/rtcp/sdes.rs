use bytes::{BufMut, BytesMut};

use num_enum::TryFromPrimitive;

use super::{Header, PacketKind};
use crate::{Error, octets};

/// SDES item types. Type zero is the end-of-list marker and never
/// appears as an item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum ItemKind {
    /// Canonical end-point identifier.
    Cname = 1,
    /// User name.
    Name = 2,
    /// Electronic mail address.
    Email = 3,
    /// Phone number.
    Phone = 4,
    /// Geographic user location.
    Loc = 5,
    /// Application or tool name.
    Tool = 6,
    /// Notice/status.
    Note = 7,
    /// Private extensions.
    Priv = 8,
}

/// One typed text item inside a chunk: `{type, length, data}` with the
/// data at most 255 octets and not null terminated on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub data: Vec<u8>,
}

impl Item {
    fn len(&self) -> usize {
        2 + self.data.len()
    }
}

/// An SSRC/CSRC chunk: the source identifier followed by a list of
/// items, a zero terminator and zero padding out to the next 32-bit
/// boundary. Since the identifier ends on a boundary and items are not
/// aligned, at least one terminating zero byte is always emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub ssrc: u32,
    /// At most one item of each kind, in insertion order.
    pub items: Vec<Item>,
}

impl Chunk {
    /// Chunk size on the wire, always a multiple of 4.
    pub fn len(&self) -> usize {
        let size = 4 + self.items.iter().map(Item::len).sum::<usize>();
        size + (4 - size % 4)
    }

    fn find_item(&self, kind: ItemKind) -> Option<usize> {
        self.items.iter().position(|item| item.kind == kind)
    }

    fn encode(&self, bytes: &mut BytesMut) {
        let end = bytes.len() + self.len();

        bytes.put_u32(self.ssrc);
        for item in &self.items {
            bytes.put_u8(item.kind as u8);
            bytes.put_u8(item.data.len() as u8);
            bytes.extend_from_slice(&item.data);
        }

        while bytes.len() < end {
            bytes.put_u8(0);
        }
    }

    /// Returns the chunk and the number of bytes consumed, padding
    /// included.
    fn decode(buf: &[u8]) -> Result<(Self, usize), Error> {
        let ssrc = octets::read_u32(buf, 0)?;

        let mut offset = 4;
        let mut items = Vec::new();
        loop {
            let kind = *buf.get(offset).ok_or(Error::FormatError)?;
            if kind == 0 {
                offset += 4 - offset % 4;
                break;
            }

            let kind = ItemKind::try_from(kind)?;
            let length = *buf.get(offset + 1).ok_or(Error::FormatError)? as usize;
            let data = buf
                .get(offset + 2..offset + 2 + length)
                .ok_or(Error::FormatError)?;

            let item = Item {
                kind,
                data: data.to_vec(),
            };
            if items.iter().any(|other: &Item| other.kind == kind) {
                return Err(Error::FormatError);
            }

            offset += item.len();
            items.push(item);
        }

        Ok((Self { ssrc, items }, offset))
    }
}

/// SDES: Source Description RTCP packet.
///
/// ```text
///         0                   1                   2                   3
///         0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// header |V=2|P|    SC   |  PT=SDES=202  |             length            |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// chunk  |                          SSRC/CSRC_1                          |
///   1    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                           SDES items                          |
///        |                              ...                              |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// chunk  |                          SSRC/CSRC_2                          |
///   2    +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                           SDES items                          |
///        |                              ...                              |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sdes {
    /// RTCP fixed header; `count` tracks `chunks.len()`.
    pub header: Header,
    pub chunks: Vec<Chunk>,
}

impl Default for Sdes {
    fn default() -> Self {
        Self::new()
    }
}

impl Sdes {
    pub fn new() -> Self {
        Self {
            header: Header::new(PacketKind::SDES, 0),
            chunks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        4 + self.chunks.iter().map(Chunk::len).sum::<usize>()
    }

    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use rtp_codec::rtcp::sdes::{ItemKind, Sdes};
    ///
    /// let mut sdes = Sdes::new();
    /// sdes.add_chunk(0x01020304).unwrap();
    /// sdes.set_item(0x01020304, ItemKind::Cname, "ab").unwrap();
    ///
    /// let mut bytes = BytesMut::new();
    /// sdes.encode(&mut bytes);
    ///
    /// assert_eq!(&bytes[..], [
    ///     0x81, 0xca, 0x00, 0x03, 0x01, 0x02, 0x03, 0x04,
    ///     0x01, 0x02, 0x61, 0x62, 0x00, 0x00, 0x00, 0x00,
    /// ]);
    /// ```
    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        for chunk in &self.chunks {
            chunk.encode(bytes);
        }
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::SDES {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total {
            return Err(Error::FormatError);
        }

        let mut offset = 4;
        let mut chunks = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            let (chunk, consumed) = Chunk::decode(&buf[offset..total])?;
            offset += consumed;
            chunks.push(chunk);
        }

        Ok(Self { header, chunks })
    }

    pub fn find_chunk(&self, ssrc: u32) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.ssrc == ssrc)
    }

    /// Rejects duplicate sources; the 5-bit count field caps the packet
    /// at 31 chunks.
    pub fn add_chunk(&mut self, ssrc: u32) -> Result<(), Error> {
        if self.chunks.len() == 31 {
            return Err(Error::Capacity);
        }

        if self.find_chunk(ssrc).is_some() {
            return Err(Error::InvalidInput);
        }

        self.chunks.push(Chunk {
            ssrc,
            items: Vec::new(),
        });

        self.update_length();
        Ok(())
    }

    /// Removing an absent source is a no-op.
    pub fn remove_chunk(&mut self, ssrc: u32) {
        if let Some(index) = self.chunks.iter().position(|chunk| chunk.ssrc == ssrc) {
            self.chunks.remove(index);
            self.update_length();
        }
    }

    /// Returns the raw bytes of an item, if the source carries one.
    pub fn get_item(&self, ssrc: u32, kind: ItemKind) -> Option<&[u8]> {
        let chunk = self.find_chunk(ssrc)?;
        let index = chunk.find_item(kind)?;
        Some(&chunk.items[index].data)
    }

    /// UTF-8 view of an item; items are text on the wire.
    pub fn item_text(&self, ssrc: u32, kind: ItemKind) -> Option<&str> {
        std::str::from_utf8(self.get_item(ssrc, kind)?).ok()
    }

    /// Replaces any existing item of the same kind. The source chunk
    /// must already exist and the text is capped at 255 octets by the
    /// item length byte.
    pub fn set_item(&mut self, ssrc: u32, kind: ItemKind, text: &str) -> Result<(), Error> {
        if text.len() > 255 {
            return Err(Error::Capacity);
        }

        let chunk = self
            .chunks
            .iter_mut()
            .find(|chunk| chunk.ssrc == ssrc)
            .ok_or(Error::InvalidInput)?;

        let item = Item {
            kind,
            data: text.as_bytes().to_vec(),
        };

        match chunk.find_item(kind) {
            Some(index) => chunk.items[index] = item,
            None => chunk.items.push(item),
        }

        self.update_length();
        Ok(())
    }

    /// Clearing an absent item or source is a no-op.
    pub fn clear_item(&mut self, ssrc: u32, kind: ItemKind) {
        let Some(chunk) = self.chunks.iter_mut().find(|chunk| chunk.ssrc == ssrc) else {
            return;
        };

        if let Some(index) = chunk.find_item(kind) {
            chunk.items.remove(index);
            self.update_length();
        }
    }

    fn update_length(&mut self) {
        self.header.count = self.chunks.len() as u8;
        self.header.length = (self.len() / 4 - 1) as u16;
    }
}
