use bytes::{BufMut, BytesMut};

use super::{Header, PacketKind};
use crate::{Error, octets};

/// Generic NACK, transport layer feedback (RTPFB FMT 1).
pub const RTPFB_NACK: u8 = 1;

/// Picture Loss Indication, payload-specific feedback (PSFB FMT 1).
pub const PSFB_PLI: u8 = 1;

/// Full Intra Request, payload-specific feedback (PSFB FMT 4).
pub const PSFB_FIR: u8 = 4;

/// One Full Intra Request entry: `{ssrc, seq_nr, reserved(u24)=0}`,
/// eight bytes on the wire.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FirItem {
    pub ssrc: u32,
    pub seq_nr: u8,
    pub reserved: u32,
}

/// RTCP feedback message, transport layer (RTPFB, PT 205) or payload
/// specific (PSFB, PT 206).
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|   FMT   |       PT      |             length            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                  SSRC of packet sender                        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                  SSRC of media source                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// :            Feedback Control Information (FCI)                 :
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// RTCP fixed header; `count` carries the feedback message type.
    pub header: Header,
    /// The SSRC of the originator of this feedback message.
    pub sender_ssrc: u32,
    /// The SSRC of the media source the feedback relates to.
    pub media_ssrc: u32,
    /// FMT-specific control information, a 4-byte multiple; empty when
    /// absent.
    pub fci: Vec<u8>,
}

impl Feedback {
    /// `kind` must be one of the two feedback packet types.
    pub fn new(kind: PacketKind, fmt: u8) -> Result<Self, Error> {
        if kind != PacketKind::RTPFB && kind != PacketKind::PSFB {
            return Err(Error::InvalidInput);
        }

        let mut header = Header::new(kind, 2);
        header.count = fmt & 0x1f;

        Ok(Self {
            header,
            sender_ssrc: 0,
            media_ssrc: 0,
            fci: Vec::new(),
        })
    }

    /// A Picture Loss Indication carries no FCI at all.
    pub fn pli(sender_ssrc: u32, media_ssrc: u32) -> Self {
        let mut header = Header::new(PacketKind::PSFB, 2);
        header.count = PSFB_PLI;

        Self {
            header,
            sender_ssrc,
            media_ssrc,
            fci: Vec::new(),
        }
    }

    /// The feedback message type from the header count bits.
    pub fn fmt(&self) -> u8 {
        self.header.count
    }

    pub fn len(&self) -> usize {
        12 + self.fci.len()
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        bytes.put_u32(self.sender_ssrc);
        bytes.put_u32(self.media_ssrc);
        bytes.extend_from_slice(&self.fci);
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::feedback::{Feedback, RTPFB_NACK};
    ///
    /// let buffer = [
    ///     0x81, 0xcd, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01,
    ///     0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x80, 0x00,
    /// ];
    ///
    /// let feedback = Feedback::decode(&buffer).unwrap();
    ///
    /// assert_eq!(feedback.fmt(), RTPFB_NACK);
    /// assert_eq!(feedback.sender_ssrc, 1);
    /// assert_eq!(feedback.media_ssrc, 2);
    /// assert_eq!(feedback.nack().unwrap(), (0x0001, 0x8000));
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::RTPFB && header.kind != PacketKind::PSFB {
            return Err(Error::FormatError);
        }

        if header.length < 2 {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total {
            return Err(Error::FormatError);
        }

        Ok(Self {
            header,
            sender_ssrc: octets::read_u32(buf, 4)?,
            media_ssrc: octets::read_u32(buf, 8)?,
            fci: buf[12..total].to_vec(),
        })
    }

    /// Refuses to overwrite existing FCI; the length word requires a
    /// 4-byte multiple.
    pub fn set_fci(&mut self, fci: &[u8]) -> Result<(), Error> {
        if !self.fci.is_empty() || fci.is_empty() || fci.len() % 4 != 0 {
            return Err(Error::InvalidInput);
        }

        self.fci = fci.to_vec();
        self.update_length();
        Ok(())
    }

    pub fn clear_fci(&mut self) {
        self.fci.clear();
        self.header.padding = false;
        self.update_length();
    }

    /// Writes a single generic NACK entry: the packet id of the first
    /// loss and the bitmask of the following sixteen.
    pub fn set_nack(&mut self, pid: u16, blp: u16) -> Result<(), Error> {
        let mut fci = BytesMut::with_capacity(4);
        fci.put_u16(pid);
        fci.put_u16(blp);
        self.set_fci(&fci)
    }

    /// Reads back a generic NACK entry.
    pub fn nack(&self) -> Result<(u16, u16), Error> {
        Ok((octets::read_u16(&self.fci, 0)?, octets::read_u16(&self.fci, 2)?))
    }

    /// Replaces nothing: existing FCI must be cleared first.
    pub fn set_fir_items(&mut self, items: &[FirItem]) -> Result<(), Error> {
        let mut fci = BytesMut::with_capacity(items.len() * 8);
        for item in items {
            fci.put_u32(item.ssrc);
            fci.put_u8(item.seq_nr);
            octets::put_u24(&mut fci, item.reserved);
        }

        self.set_fci(&fci)
    }

    /// Number of FIR entries, `(length - 2) / 2` words; an odd word
    /// count cannot hold whole entries and is rejected.
    pub fn fir_item_count(&self) -> Result<usize, Error> {
        if self.fci.len() % 8 != 0 {
            return Err(Error::FormatError);
        }

        Ok(self.fci.len() / 8)
    }

    pub fn fir_item(&self, index: usize) -> Result<FirItem, Error> {
        if index >= self.fir_item_count()? {
            return Err(Error::InvalidInput);
        }

        let at = index * 8;
        Ok(FirItem {
            ssrc: octets::read_u32(&self.fci, at)?,
            seq_nr: self.fci[at + 4],
            reserved: octets::read_u24(&self.fci, at + 5)?,
        })
    }

    /// Index and value of the first entry matching `ssrc`.
    pub fn find_fir_item(&self, ssrc: u32) -> Option<(usize, FirItem)> {
        for index in 0..self.fir_item_count().ok()? {
            let item = self.fir_item(index).ok()?;
            if item.ssrc == ssrc {
                return Some((index, item));
            }
        }

        None
    }

    fn update_length(&mut self) {
        self.header.length = (self.len() / 4 - 1) as u16;
    }
}
