use bytes::{BufMut, BytesMut};

use crate::{Error, octets};

/// A reception report block, as carried by SR and RR packets.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                 SSRC_n (SSRC of the source)                   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | fraction lost |       cumulative number of packets lost       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           extended highest sequence number received           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      interarrival jitter                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         last SR (LSR)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                   delay since last SR (DLSR)                  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportBlock {
    /// The SSRC identifier of the source to which the information in
    /// this reception report block pertains.
    pub ssrc: u32,
    /// The fraction of RTP data packets from source SSRC_n lost since
    /// the previous SR or RR packet was sent, expressed as a fixed
    /// point number with the binary point at the left edge of the
    /// field, i.e. the loss fraction multiplied by 256.
    pub fraction: u8,
    /// The total number of RTP data packets from source SSRC_n that
    /// have been lost since the beginning of reception. A signed
    /// 24-bit value on the wire: late arrivals and duplicates can make
    /// it negative.
    pub lost: i32,
    /// The low 16 bits contain the highest sequence number received in
    /// an RTP data packet from source SSRC_n, and the most significant
    /// 16 bits extend that sequence number with the corresponding
    /// count of sequence number cycles.
    pub last_seq: u32,
    /// An estimate of the statistical variance of the RTP data packet
    /// interarrival time, measured in timestamp units.
    pub jitter: u32,
    /// The middle 32 bits out of 64 in the NTP timestamp of the most
    /// recent sender report.
    pub lsr: u32,
    /// The delay, expressed in units of 1/65536 seconds, between
    /// receiving the last SR packet from source SSRC_n and sending
    /// this reception report block.
    pub dlsr: u32,
}

impl ReportBlock {
    /// On-wire size of one report block.
    pub const LEN: usize = 24;

    /// Stores a loss fraction from `[0, 1]` as `min(255, floor(p * 256))`.
    pub fn set_fraction(&mut self, percent_lost: f64) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&percent_lost) {
            return Err(Error::InvalidInput);
        }

        self.fraction = ((percent_lost * 256.0) as u32).min(255) as u8;
        Ok(())
    }

    /// Returns the stored loss fraction as `fraction / 256`.
    pub fn fraction(&self) -> f64 {
        self.fraction as f64 / 256.0
    }

    /// `lost` saturates to the signed 24-bit wire range.
    pub fn encode(&self, bytes: &mut BytesMut) {
        bytes.put_u32(self.ssrc);
        bytes.put_u8(self.fraction);
        octets::put_s24(bytes, self.lost.clamp(-8388608, 8388607));
        bytes.put_u32(self.last_seq);
        bytes.put_u32(self.jitter);
        bytes.put_u32(self.lsr);
        bytes.put_u32(self.dlsr);
    }

    /// # Test
    ///
    /// ```
    /// use rtp_codec::rtcp::ReportBlock;
    ///
    /// let buffer = [
    ///     0x34, 0x85, 0x78, 0x5e, 0x40, 0xff, 0xff, 0xff,
    ///     0x00, 0x01, 0x12, 0x34, 0x00, 0x00, 0x00, 0x05,
    ///     0x2d, 0xbc, 0x2a, 0x98, 0x00, 0x00, 0x04, 0x00,
    /// ];
    ///
    /// let report = ReportBlock::decode(&buffer).unwrap();
    ///
    /// assert_eq!(report.ssrc, 0x3485785e);
    /// assert_eq!(report.fraction, 0x40);
    /// assert_eq!(report.lost, -1);
    /// assert_eq!(report.last_seq, 0x00011234);
    /// assert_eq!(report.jitter, 5);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < Self::LEN {
            return Err(Error::InvalidInput);
        }

        Ok(Self {
            ssrc: octets::read_u32(buf, 0)?,
            fraction: buf[4],
            lost: octets::read_s24(buf, 5)?,
            last_seq: octets::read_u32(buf, 8)?,
            jitter: octets::read_u32(buf, 12)?,
            lsr: octets::read_u32(buf, 16)?,
            dlsr: octets::read_u32(buf, 20)?,
        })
    }
}
