use anyhow::Result;
use bytes::BytesMut;
use rtp_codec::{Entropy, Error, header::Header, packet::Packet};

struct Seeds(Vec<u32>);

impl Entropy for Seeds {
    fn next_u32(&mut self) -> u32 {
        self.0.remove(0)
    }

    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

#[test]
fn header_wire_image() -> Result<()> {
    let header = Header {
        padding: false,
        marker: true,
        payload_kind: 96,
        sequence_number: 0x1234,
        timestamp: 0xdeadbeef,
        ssrc: 0xcafebabe,
        csrc_list: Vec::new(),
        extension: None,
    };

    let mut bytes = BytesMut::new();
    header.encode(&mut bytes);

    assert_eq!(bytes.len(), header.len());
    assert_eq!(&bytes[..2], [0x80, 0xe0]);
    assert_eq!(
        &bytes[2..],
        [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef, 0xca, 0xfe, 0xba, 0xbe]
    );

    assert_eq!(Header::decode(&bytes)?, header);
    Ok(())
}

#[test]
fn header_seeded_from_entropy() {
    let mut seeds = Seeds(vec![0x00051234, 0xaabbccdd, 0x11223344]);
    let header = Header::new(96, &mut seeds);

    assert_eq!(header.payload_kind, 96);
    assert_eq!(header.sequence_number, 0x1234);
    assert_eq!(header.timestamp, 0xaabbccdd);
    assert_eq!(header.ssrc, 0x11223344);
}

#[test]
fn csrc_operations() -> Result<()> {
    let mut seeds = Seeds(vec![0, 0, 0]);
    let mut header = Header::new(96, &mut seeds);

    header.add_csrc(1)?;
    header.add_csrc(2)?;
    header.add_csrc(3)?;
    assert_eq!(header.len(), 24);
    assert_eq!(header.find_csrc(2), Some(1));

    // Duplicates are rejected without mutation.
    assert_eq!(header.add_csrc(2), Err(Error::InvalidInput));
    assert_eq!(header.csrc_list, [1, 2, 3]);

    // Removal preserves insertion order; absent entries are a no-op.
    header.remove_csrc(2);
    assert_eq!(header.csrc_list, [1, 3]);
    header.remove_csrc(99);
    assert_eq!(header.csrc_list, [1, 3]);

    let mut bytes = BytesMut::new();
    header.encode(&mut bytes);
    assert_eq!(bytes[0], 0x80 | 2);
    assert_eq!(Header::decode(&bytes)?.csrc_list, [1, 3]);

    Ok(())
}

#[test]
fn csrc_capacity() -> Result<()> {
    let mut seeds = Seeds(vec![0, 0, 0]);
    let mut header = Header::new(96, &mut seeds);

    for csrc in 0..15 {
        header.add_csrc(csrc)?;
    }

    assert_eq!(header.add_csrc(15), Err(Error::Capacity));
    assert_eq!(header.csrc_list.len(), 15);
    Ok(())
}

#[test]
fn extension_round_trip() -> Result<()> {
    let mut seeds = Seeds(vec![1, 2, 3]);
    let mut header = Header::new(111, &mut seeds);

    header.set_ext(0xbede, &[0xcafef00d, 0x01020304])?;
    assert_eq!(header.len(), 24);

    // Occupied extensions must be cleared before being replaced.
    assert_eq!(header.set_ext(0x0001, &[0]), Err(Error::InvalidInput));
    assert_eq!(header.set_ext(0x0001, &[]), Err(Error::InvalidInput));

    let mut bytes = BytesMut::new();
    header.encode(&mut bytes);
    assert_eq!(bytes.len(), 24);
    assert_eq!(bytes[0] & 0x10, 0x10);

    let decoded = Header::decode(&bytes)?;
    assert_eq!(decoded, header);

    header.clear_ext();
    assert!(header.extension.is_none());
    assert_eq!(header.len(), 12);
    header.set_ext(0x0001, &[0])?;

    Ok(())
}

#[test]
fn packet_round_trip() -> Result<()> {
    let mut seeds = Seeds(vec![7, 8, 9]);
    let mut packet = Packet::new(96, &mut seeds);

    packet.header.add_csrc(0x01020304)?;
    packet.set_payload(&[0xde, 0xad, 0xbe, 0xef, 0x01])?;
    assert_eq!(packet.len(), 16 + 5);

    // The payload is exclusive: clear before replacing.
    assert_eq!(packet.set_payload(&[1]), Err(Error::InvalidInput));
    packet.clear_payload();
    packet.set_payload(&[0xaa])?;

    let mut bytes = BytesMut::new();
    packet.encode(&mut bytes);
    assert_eq!(bytes.len(), packet.len());
    assert_eq!(Packet::decode(&bytes)?, packet);

    Ok(())
}

#[test]
fn decode_rejects_junk() {
    // Too short for a fixed header.
    assert_eq!(Header::decode(&[0x80; 11]), Err(Error::InvalidInput));

    // Wrong version bits.
    let mut buf = [0u8; 12];
    buf[0] = 0x40;
    buf[1] = 96;
    assert_eq!(Header::decode(&buf), Err(Error::UnsupportedVersion));

    // A zero payload type is not RTP.
    buf[0] = 0x80;
    buf[1] = 0;
    assert_eq!(Header::decode(&buf), Err(Error::FormatError));

    // The CSRC count promises more data than the buffer holds.
    buf[0] = 0x82;
    buf[1] = 96;
    assert_eq!(Header::decode(&buf), Err(Error::FormatError));

    // The extension word count overruns the buffer.
    let buf = [
        0x90, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x00, 0x01, 0x00,
        0x04,
    ];
    assert_eq!(Header::decode(&buf), Err(Error::FormatError));
}
