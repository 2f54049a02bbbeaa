//! RTCP transmission interval (RFC 3550 §A.7).

use crate::Entropy;

/// Minimum average time between RTCP packets from this site, in
/// seconds. This keeps the reports from clumping when sessions are
/// small and keeps the interval from collapsing during transient
/// outages like a network partition.
const RTCP_MIN_TIME: f64 = 5.0;

/// Fraction of the RTCP bandwidth shared among active senders. Chosen
/// so that in a typical session with one or two active senders the
/// computed report time is roughly the minimum report time. The
/// receiver fraction must be one minus the sender fraction.
const RTCP_SENDER_BW_FRACTION: f64 = 0.25;
const RTCP_RCVR_BW_FRACTION: f64 = 1.0 - RTCP_SENDER_BW_FRACTION;

/// Compensates for "timer reconsideration" converging to a value below
/// the intended average (e minus 1.5).
const COMPENSATION: f64 = 2.71828 - 1.5;

/// Calculates the RTCP transmission interval in seconds.
///
/// - `members`, `senders`: current estimates for the session.
/// - `rtcp_bw`: the target RTCP bandwidth in bits/s, i.e. the total
///   control-traffic bandwidth shared by all members.
/// - `we_sent`: true if the application has sent data since the second
///   previous RTCP report was transmitted.
/// - `avg_rtcp_size`: average compound RTCP packet size in octets over
///   all RTCP packets sent and received by this participant, transport
///   headers included.
/// - `initial`: true if the application has not yet sent an RTCP
///   packet; halves the minimum so the first report converges faster.
///
/// Apart from the injected `entropy`, which spreads the result
/// uniformly over `[0.5, 1.5)` of the deterministic value, this is a
/// pure function of its inputs.
///
/// # Test
///
/// ```
/// use rtp_codec::interval::rtcp_interval;
/// use rtp_codec::Entropy;
///
/// struct Fixed(f64);
///
/// impl Entropy for Fixed {
///     fn next_u32(&mut self) -> u32 {
///         0
///     }
///
///     fn next_unit(&mut self) -> f64 {
///         self.0
///     }
/// }
///
/// let t = rtcp_interval(1, 1, 1000.0, false, 100.0, true, &mut Fixed(0.5));
///
/// // 2.5s minimum, unit random draw, reconsideration compensation.
/// assert!((t - 2.5 / (2.71828 - 1.5)).abs() < 1e-9);
/// ```
pub fn rtcp_interval(
    members: u32,
    senders: u32,
    mut rtcp_bw: f64,
    we_sent: bool,
    avg_rtcp_size: f64,
    initial: bool,
    entropy: &mut impl Entropy,
) -> f64 {
    // The very first call at application start-up uses half the
    // minimum delay for quicker notification.
    let mut rtcp_min_time = RTCP_MIN_TIME;
    if initial {
        rtcp_min_time /= 2.0;
    }

    // Dedicate a fraction of the RTCP bandwidth to senders unless
    // their number is large enough that their share is more than that
    // fraction.
    let mut n = members;
    if senders as f64 <= members as f64 * RTCP_SENDER_BW_FRACTION {
        if we_sent {
            rtcp_bw *= RTCP_SENDER_BW_FRACTION;
            n = senders;
        } else {
            rtcp_bw *= RTCP_RCVR_BW_FRACTION;
            n -= senders;
        }
    }

    // The effective number of sites times the average packet size is
    // the total number of octets sent when each site sends a report;
    // dividing by the effective bandwidth gives the average time
    // between reports, with the minimum enforced.
    let mut t = avg_rtcp_size * n as f64 / rtcp_bw;
    if t < rtcp_min_time {
        t = rtcp_min_time;
    }

    // To avoid traffic bursts from unintended synchronization with
    // other sites, pick the actual interval uniformly in [0.5t, 1.5t).
    t *= entropy.next_unit() + 0.5;
    t / COMPENSATION
}
