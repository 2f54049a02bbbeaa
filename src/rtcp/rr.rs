use bytes::{BufMut, BytesMut};

use super::{Header, PacketKind, ReportBlock};
use crate::{Error, octets};

/// RR: Receiver Report RTCP packet.
///
/// The same layout as a sender report with the sender-info section
/// removed: the header word, the reporter's SSRC, zero to 31 reception
/// report blocks and an optional profile-specific extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverReport {
    /// RTCP fixed header; `count` tracks `reports.len()`.
    pub header: Header,
    /// The synchronization source identifier of the packet originator.
    pub ssrc: u32,
    /// Zero to 31 reception report blocks.
    pub reports: Vec<ReportBlock>,
    /// Profile-specific extension bytes, a 4-byte multiple; empty when
    /// absent.
    pub ext: Vec<u8>,
}

impl Default for ReceiverReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiverReport {
    pub fn new() -> Self {
        Self {
            header: Header::new(PacketKind::RR, 1),
            ssrc: 0,
            reports: Vec::new(),
            ext: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        8 + self.reports.len() * ReportBlock::LEN + self.ext.len()
    }

    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use rtp_codec::rtcp::ReceiverReport;
    ///
    /// let mut rr = ReceiverReport::new();
    /// rr.ssrc = 0x79266955;
    ///
    /// let mut bytes = BytesMut::new();
    /// rr.encode(&mut bytes);
    ///
    /// assert_eq!(
    ///     &bytes[..],
    ///     [0x80, 0xc9, 0x00, 0x01, 0x79, 0x26, 0x69, 0x55]
    /// );
    /// ```
    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        bytes.put_u32(self.ssrc);

        for report in &self.reports {
            report.encode(bytes);
        }

        bytes.extend_from_slice(&self.ext);
    }

    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::RR {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total || total < 8 + header.count as usize * ReportBlock::LEN {
            return Err(Error::FormatError);
        }

        let mut offset = 8;
        let mut reports = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            reports.push(ReportBlock::decode(&buf[offset..])?);
            offset += ReportBlock::LEN;
        }

        Ok(Self {
            header,
            ssrc: octets::read_u32(buf, 4)?,
            reports,
            ext: buf[offset..total].to_vec(),
        })
    }

    pub fn find_report(&self, ssrc: u32) -> Option<&ReportBlock> {
        self.reports.iter().find(|report| report.ssrc == ssrc)
    }

    /// Rejects duplicate SSRCs; the 5-bit count field caps the list
    /// at 31 blocks.
    pub fn add_report(&mut self, report: ReportBlock) -> Result<(), Error> {
        if self.reports.len() == 31 {
            return Err(Error::Capacity);
        }

        if self.find_report(report.ssrc).is_some() {
            return Err(Error::InvalidInput);
        }

        self.reports.push(report);
        self.update_length();
        Ok(())
    }

    /// Removing an absent SSRC is a no-op.
    pub fn remove_report(&mut self, ssrc: u32) {
        if let Some(index) = self.reports.iter().position(|report| report.ssrc == ssrc) {
            self.reports.remove(index);
            self.update_length();
        }
    }

    /// Replaces nothing: an occupied extension must be cleared first.
    pub fn set_ext(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.ext.is_empty() || data.is_empty() || data.len() % 4 != 0 {
            return Err(Error::InvalidInput);
        }

        self.ext = data.to_vec();
        self.update_length();
        Ok(())
    }

    pub fn clear_ext(&mut self) {
        self.ext.clear();
        self.update_length();
    }

    fn update_length(&mut self) {
        self.header.count = self.reports.len() as u8;
        self.header.length = (self.len() / 4 - 1) as u16;
    }
}
