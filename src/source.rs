//! Per-source reception state.
//!
//! A receiver keeps one [`Source`] per SSRC it hears. Arriving sequence
//! numbers run through the validity checks of RFC 3550 §A.1: a new
//! source sits in probation until [`MIN_SEQUENTIAL`] packets arrive in
//! order, 16-bit wraps extend the sequence into 32 bits, and large
//! jumps are rejected once and accepted as a restart when the very next
//! number confirms them. On top of that the source accumulates the loss
//! figures of §A.3 and the interarrival jitter estimate of §A.8 that
//! feed reception report blocks.

use crate::{Error, rtcp::ReportBlock};

/// The maximum acceptable gap in sequence numbers.
pub const MAX_DROPOUT: u32 = 3000;

/// The maximum acceptable number of misordered packets.
pub const MAX_MISORDER: u32 = 100;

/// The minimum number of packets to establish a sequence.
pub const MIN_SEQUENTIAL: u32 = 2;

const RTP_SEQ_MOD: u32 = 1 << 16;

/// Per-SSRC reception statistics.
#[derive(Debug, Clone)]
pub struct Source {
    id: u32,
    max_seq: u16,
    cycles: u32,
    base_seq: u32,
    bad_seq: u32,
    probation: u32,
    received: u32,
    expected_prior: u32,
    received_prior: u32,
    transit: i32,
    jitter: f64,
    fraction: u8,
    lost: i32,
}

impl Source {
    /// A new source first heard with sequence number `seq`.
    ///
    /// `bad_seq` starts at an impossible value so the first large jump
    /// is never mistaken for a confirmed restart, and `max_seq` starts
    /// one behind `seq` so the probation counter treats `seq` itself
    /// as in order.
    pub fn new(id: u32, seq: u16) -> Self {
        Self {
            id,
            max_seq: seq.wrapping_sub(1),
            cycles: 0,
            base_seq: seq as u32,
            bad_seq: RTP_SEQ_MOD + 1,
            probation: MIN_SEQUENTIAL,
            received: 0,
            expected_prior: 0,
            received_prior: 0,
            transit: 0,
            jitter: 0.0,
            fraction: 0,
            lost: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Highest sequence number seen.
    pub fn max_seq(&self) -> u16 {
        self.max_seq
    }

    /// Shifted count of sequence number cycles.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Packets received and accepted.
    pub fn received(&self) -> u32 {
        self.received
    }

    /// The 32-bit extended highest sequence number, cycles included.
    pub fn extended_seq(&self) -> u32 {
        self.cycles.wrapping_add(self.max_seq as u32)
    }

    /// Estimated interarrival jitter, in timestamp units.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Fraction of packets lost over the last reporting interval,
    /// times 256.
    pub fn fraction(&self) -> u8 {
        self.fraction
    }

    /// Cumulative packets lost, clamped to the signed 24-bit report
    /// range.
    pub fn lost(&self) -> i32 {
        self.lost
    }

    /// Restarts the sequence bookkeeping at `seq`.
    pub fn reset(&mut self, seq: u16) {
        self.max_seq = seq;
        self.cycles = 0;
        self.base_seq = seq as u32;
        self.bad_seq = RTP_SEQ_MOD + 1;
        self.received = 0;
        self.received_prior = 0;
        self.expected_prior = 0;
    }

    /// Validates an arriving sequence number (RFC 3550 §A.1).
    ///
    /// `Err(Probation)` means the source has not yet produced
    /// [`MIN_SEQUENTIAL`] in-order packets; `Err(InvalidSequence)`
    /// means the jump was rejected until the next packet confirms it.
    /// In both cases the caller should drop the packet.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::source::Source;
    /// use rtp_codec::Error;
    ///
    /// let mut source = Source::new(0x1234, 1000);
    ///
    /// assert_eq!(source.update_seq(1001), Err(Error::Probation));
    /// assert_eq!(source.update_seq(1002), Ok(()));
    /// assert_eq!(source.received(), 1);
    /// assert_eq!(source.max_seq(), 1002);
    /// ```
    pub fn update_seq(&mut self, seq: u16) -> Result<(), Error> {
        let udelta = seq.wrapping_sub(self.max_seq) as u32;

        // A source is not valid until MIN_SEQUENTIAL packets with
        // sequential sequence numbers have been received.
        if self.probation > 0 {
            if seq == self.max_seq.wrapping_add(1) {
                self.probation -= 1;
                self.max_seq = seq;
                if self.probation == 0 {
                    self.reset(seq);
                    self.received += 1;
                    return Ok(());
                }
            } else {
                self.probation = MIN_SEQUENTIAL - 1;
                self.max_seq = seq;
            }

            return Err(Error::Probation);
        } else if udelta < MAX_DROPOUT {
            // In order, with permissible gap.
            if seq < self.max_seq {
                // Sequence number wrapped: count another 64K cycle.
                self.cycles = self.cycles.wrapping_add(RTP_SEQ_MOD);
            }

            self.max_seq = seq;
        } else if udelta <= RTP_SEQ_MOD - MAX_MISORDER {
            // The sequence number made a very large jump.
            if seq as u32 == self.bad_seq {
                // Two sequential packets: assume the other side
                // restarted without telling us, so just re-sync.
                self.reset(seq);
            } else {
                self.bad_seq = seq.wrapping_add(1) as u32;
                return Err(Error::InvalidSequence);
            }
        } else {
            // Duplicate or reordered packet.
        }

        self.received += 1;
        Ok(())
    }

    /// Updates the cumulative loss count and interval fraction
    /// (RFC 3550 §A.3). Call at most once per reporting interval,
    /// immediately before generating a report.
    pub fn update_lost(&mut self) {
        let extended = self.extended_seq();
        let expected = extended.wrapping_sub(self.base_seq).wrapping_add(1);
        self.lost = (expected as i64 - self.received as i64).clamp(-8388608, 8388607) as i32;

        // The fraction is computed over the packets expected and
        // received since the previous report.
        let expected_interval = expected.wrapping_sub(self.expected_prior);
        let received_interval = self.received.wrapping_sub(self.received_prior);
        let lost_interval = expected_interval as i64 - received_interval as i64;

        self.fraction = if expected_interval == 0 || lost_interval <= 0 {
            0
        } else {
            ((lost_interval << 8) / expected_interval as i64) as u8
        };

        self.expected_prior = expected;
        self.received_prior = self.received;
    }

    /// Folds a packet's transit time into the jitter estimate
    /// (RFC 3550 §A.8). `arrival` is the packet arrival time in the
    /// same units as the RTP timestamp `ts`.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_codec::source::Source;
    ///
    /// let mut source = Source::new(0x1234, 0);
    ///
    /// source.update_jitter(0, 0);
    /// source.update_jitter(10, 20);
    ///
    /// assert_eq!(source.jitter(), 0.625);
    /// ```
    pub fn update_jitter(&mut self, ts: u32, arrival: u32) {
        let transit = arrival.wrapping_sub(ts) as i32;
        let d = (transit as i64 - self.transit as i64).unsigned_abs() as f64;

        self.transit = transit;
        self.jitter += (d - self.jitter) / 16.0;
    }

    /// A reception report block for this source. `lsr` and `dlsr` stay
    /// zero: the sender-report clock belongs to the caller.
    pub fn report_block(&self) -> ReportBlock {
        ReportBlock {
            ssrc: self.id,
            fraction: self.fraction,
            lost: self.lost,
            last_seq: self.extended_seq(),
            jitter: self.jitter as u32,
            lsr: 0,
            dlsr: 0,
        }
    }
}
