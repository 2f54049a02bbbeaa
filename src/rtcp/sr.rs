use bytes::{BufMut, BytesMut};

use super::{Header, PacketKind, ReportBlock};
use crate::{Error, octets};

/// SR: Sender Report RTCP packet.
///
/// ```text
///         0                   1                   2                   3
///         0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// header |V=2|P|    RC   |   PT=SR=200   |             length            |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                         SSRC of sender                        |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// sender |              NTP timestamp, most significant word             |
/// info   +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |             NTP timestamp, least significant word             |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                         RTP timestamp                         |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                     sender's packet count                     |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///        |                      sender's octet count                     |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// report |                           blocks ...                          |
///        +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
///        |                  profile-specific extensions                  |
///        +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderReport {
    /// RTCP fixed header; `count` tracks `reports.len()`.
    pub header: Header,
    /// The synchronization source identifier for the originator of
    /// this SR packet.
    pub ssrc: u32,
    /// NTP timestamp, most significant word: the wallclock time when
    /// this report was sent.
    pub ntp_sec: u32,
    /// NTP timestamp, least significant word.
    pub ntp_frac: u32,
    /// Corresponds to the same time as the NTP timestamp, but in the
    /// same units and with the same random offset as the RTP
    /// timestamps in data packets.
    pub rtp_ts: u32,
    /// The total number of RTP data packets transmitted by the sender
    /// since starting transmission up until the time this SR packet
    /// was generated.
    pub packet_count: u32,
    /// The total number of payload octets transmitted in RTP data
    /// packets by the sender since starting transmission.
    pub byte_count: u32,
    /// Zero to 31 reception report blocks, one per source heard since
    /// the last report.
    pub reports: Vec<ReportBlock>,
    /// Profile-specific extension bytes, a 4-byte multiple; empty when
    /// absent.
    pub ext: Vec<u8>,
}

impl Default for SenderReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SenderReport {
    pub fn new() -> Self {
        Self {
            header: Header::new(PacketKind::SR, 6),
            ssrc: 0,
            ntp_sec: 0,
            ntp_frac: 0,
            rtp_ts: 0,
            packet_count: 0,
            byte_count: 0,
            reports: Vec::new(),
            ext: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        28 + self.reports.len() * ReportBlock::LEN + self.ext.len()
    }

    pub fn encode(&self, bytes: &mut BytesMut) {
        self.header.encode(bytes);
        bytes.put_u32(self.ssrc);
        bytes.put_u32(self.ntp_sec);
        bytes.put_u32(self.ntp_frac);
        bytes.put_u32(self.rtp_ts);
        bytes.put_u32(self.packet_count);
        bytes.put_u32(self.byte_count);

        for report in &self.reports {
            report.encode(bytes);
        }

        bytes.extend_from_slice(&self.ext);
    }

    /// Consumes exactly the announced length; bytes past the report
    /// blocks become the profile extension.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::SenderReport;
    ///
    /// let buffer = [
    ///     0x80, 0xc8, 0x00, 0x06, 0x79, 0x26, 0x69, 0x55,
    ///     0xe8, 0xe2, 0xe2, 0x17, 0xd4, 0x2f, 0x05, 0x91,
    ///     0x36, 0x01, 0xb0, 0xaf, 0x34, 0x85, 0x78, 0x5e,
    ///     0x2d, 0xbc, 0x2a, 0x98,
    /// ];
    ///
    /// let sr = SenderReport::decode(&buffer).unwrap();
    ///
    /// assert_eq!(sr.ssrc, 0x79266955);
    /// assert_eq!(sr.ntp_sec, 0xe8e2e217);
    /// assert_eq!(sr.ntp_frac, 0xd42f0591);
    /// assert_eq!(sr.rtp_ts, 0x3601b0af);
    /// assert_eq!(sr.packet_count, 0x3485785e);
    /// assert_eq!(sr.byte_count, 0x2dbc2a98);
    /// assert!(sr.reports.is_empty());
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        let header = Header::decode(buf)?;
        if header.kind != PacketKind::SR {
            return Err(Error::FormatError);
        }

        let total = (header.length as usize + 1) * 4;
        if buf.len() < total || total < 28 + header.count as usize * ReportBlock::LEN {
            return Err(Error::FormatError);
        }

        let mut offset = 28;
        let mut reports = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            reports.push(ReportBlock::decode(&buf[offset..])?);
            offset += ReportBlock::LEN;
        }

        Ok(Self {
            header,
            ssrc: octets::read_u32(buf, 4)?,
            ntp_sec: octets::read_u32(buf, 8)?,
            ntp_frac: octets::read_u32(buf, 12)?,
            rtp_ts: octets::read_u32(buf, 16)?,
            packet_count: octets::read_u32(buf, 20)?,
            byte_count: octets::read_u32(buf, 24)?,
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
