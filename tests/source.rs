use rtp_codec::{
    Entropy, Error,
    interval::rtcp_interval,
    source::{MIN_SEQUENTIAL, Source},
};

struct Fixed(f64);

impl Entropy for Fixed {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

const COMPENSATION: f64 = 2.71828 - 1.5;

/// Drives a fresh source through probation: one mismatch against the
/// pre-first-packet state, then sequential packets until validation.
fn valid_source(id: u32, seq: u16) -> Source {
    let mut source = Source::new(id, seq);

    let mut next = seq.wrapping_add(1);
    for _ in 0..MIN_SEQUENTIAL {
        let _ = source.update_seq(next);
        next = next.wrapping_add(1);
    }

    source
}

#[test]
fn probation() {
    let mut source = Source::new(0xcafebabe, 1000);

    // The first packet after init never matches max_seq + 1, so it
    // restarts the probation count.
    assert_eq!(source.update_seq(1001), Err(Error::Probation));

    for seq in 1002..1000 + MIN_SEQUENTIAL as u16 {
        assert_eq!(source.update_seq(seq), Err(Error::Probation));
    }

    assert_eq!(source.update_seq(1000 + MIN_SEQUENTIAL as u16), Ok(()));
    assert_eq!(source.max_seq(), 1000 + MIN_SEQUENTIAL as u16);
    assert_eq!(source.received(), 1);

    // Once validated, the next in-order packet just counts.
    assert_eq!(source.update_seq(1003), Ok(()));
    assert_eq!(source.received(), 2);
}

#[test]
fn probation_restarts_on_gap() {
    let mut source = Source::new(1, 1000);

    assert_eq!(source.update_seq(1001), Err(Error::Probation));
    // A gap during probation starts the count over.
    assert_eq!(source.update_seq(1005), Err(Error::Probation));
    assert_eq!(source.update_seq(1006), Ok(()));
    assert_eq!(source.received(), 1);
}

#[test]
fn large_jump_needs_confirmation() {
    let mut source = valid_source(1, 1000);
    assert_eq!(source.received(), 1);

    // A jump past MAX_DROPOUT is rejected once.
    assert_eq!(source.update_seq(8000), Err(Error::InvalidSequence));
    assert_eq!(source.max_seq(), 1002);

    // An unrelated sequence afterwards is rejected again.
    assert_eq!(source.update_seq(9500), Err(Error::InvalidSequence));

    // The exact successor of a rejected jump confirms the restart.
    assert_eq!(source.update_seq(9501), Ok(()));
    assert_eq!(source.max_seq(), 9501);
    assert_eq!(source.cycles(), 0);
    assert_eq!(source.received(), 1);
}

#[test]
fn sequence_wrap_extends_cycles() {
    let mut source = valid_source(1, 65533);
    assert_eq!(source.max_seq(), 65535);

    assert_eq!(source.update_seq(0), Ok(()));
    assert_eq!(source.max_seq(), 0);
    assert_eq!(source.cycles(), 1 << 16);
    assert_eq!(source.extended_seq(), 1 << 16);

    assert_eq!(source.update_seq(1), Ok(()));
    assert_eq!(source.extended_seq(), (1 << 16) + 1);
}

#[test]
fn lost_none() {
    let mut source = valid_source(1, 1000);

    source.update_lost();
    assert_eq!(source.lost(), 0);
    assert_eq!(source.fraction(), 0);
}

#[test]
fn lost_half() {
    let mut source = valid_source(1, 1000);

    // Settle the interval baseline on a fully received stream.
    source.update_lost();

    // Every second packet goes missing.
    for i in 1..=8u16 {
        assert_eq!(source.update_seq(1002 + 2 * i), Ok(()));
    }

    source.update_lost();
    assert_eq!(source.lost(), 8);
    assert_eq!(source.fraction(), 128);

    let block = source.report_block();
    assert_eq!(block.ssrc, 1);
    assert_eq!(block.lost, 8);
    assert_eq!(block.fraction, 128);
    assert_eq!(block.last_seq, 1018);

    // A fully received follow-up interval reports zero again.
    for i in 1..=4u16 {
        assert_eq!(source.update_seq(1018 + i), Ok(()));
    }

    source.update_lost();
    assert_eq!(source.fraction(), 0);
    assert_eq!(source.lost(), 8);
}

#[test]
fn jitter_recursion() {
    let mut source = Source::new(1, 0);

    source.update_jitter(0, 0);
    assert_eq!(source.jitter(), 0.0);

    source.update_jitter(10, 20);
    assert_eq!(source.jitter(), 0.625);

    source.update_jitter(20, 40);
    assert_eq!(source.jitter(), 0.625 + (10.0 - 0.625) / 16.0);

    // A perfectly paced stream decays the estimate towards zero.
    let before = source.jitter();
    source.update_jitter(30, 50);
    assert!(source.jitter() < before);
}

#[test]
fn interval_deterministic() {
    // With the random draw pinned to 0.5 the multiplier is exactly 1.
    let t = rtcp_interval(1, 1, 1000.0, false, 100.0, true, &mut Fixed(0.5));
    assert!((t - 2.5 / COMPENSATION).abs() < 1e-9);

    // Senders get their bandwidth fraction when we_sent is set.
    let t = rtcp_interval(10, 2, 1000.0, true, 100.0, false, &mut Fixed(0.5));
    assert!((t - 5.0 / COMPENSATION).abs() < 1e-9);

    // Above the minimum the interval is bandwidth proportional.
    let t = rtcp_interval(1000, 0, 1000.0, false, 100.0, false, &mut Fixed(0.5));
    assert!((t - (100.0 * 1000.0 / 750.0) / COMPENSATION).abs() < 1e-9);
}

#[test]
fn interval_randomization_range() {
    let mut rng = rand::thread_rng();

    for _ in 0..1000 {
        let t = rtcp_interval(1, 1, 1000.0, false, 100.0, true, &mut rng);
        assert!(t >= 2.5 * 0.5 / COMPENSATION);
        assert!(t < 2.5 * 1.5 / COMPENSATION);
    }
}
