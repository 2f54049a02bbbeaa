use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rtp_codec::{packet::Packet, rtcp};

#[rustfmt::skip]
mod samples {
    pub const RTP: &[u8] = &[
        0x80, 0xe0, 0x12, 0x34, 0xde, 0xad, 0xbe, 0xef,
        0xca, 0xfe, 0xba, 0xbe, 0x01, 0x02, 0x03, 0x04,
        0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
    ];

    pub const SENDER_REPORT: &[u8] = &[
        0x80, 0xc8, 0x00, 0x06, 0x79, 0x26, 0x69, 0x55,
        0xe8, 0xe2, 0xe2, 0x17, 0xd4, 0x2f, 0x05, 0x91,
        0x36, 0x01, 0xb0, 0xaf, 0x34, 0x85, 0x78, 0x5e,
        0x2d, 0xbc, 0x2a, 0x98,
    ];

    pub const RECEIVER_REPORT: &[u8] = &[
        0x80, 0xc9, 0x00, 0x01, 0x79, 0x26, 0x69, 0x55,
    ];

    pub const SOURCE_DESCRIPTION: &[u8] = &[
        0x81, 0xca, 0x00, 0x03, 0x01, 0x02, 0x03, 0x04,
        0x01, 0x02, 0x61, 0x62, 0x00, 0x00, 0x00, 0x00,
    ];

    pub const GENERIC_NACK: &[u8] = &[
        0x81, 0xcd, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x80, 0x00,
    ];
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut rtcp_samples = [
        samples::SENDER_REPORT,
        samples::RECEIVER_REPORT,
        samples::SOURCE_DESCRIPTION,
        samples::GENERIC_NACK,
    ]
    .into_iter()
    .cycle();

    let mut codec_criterion = c.benchmark_group("codec");
    codec_criterion.throughput(Throughput::Elements(1));

    codec_criterion.bench_function("decode_rtp", |bencher| {
        bencher.iter(|| {
            Packet::decode(samples::RTP).unwrap();
        })
    });

    codec_criterion.bench_function("decode_rtcp_samples", |bencher| {
        bencher.iter(|| {
            rtcp::Packet::decode(rtcp_samples.next().unwrap()).unwrap();
        })
    });

    codec_criterion.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
