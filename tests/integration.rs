//! Integration tests for packetizer.
//!
//! These tests verify the integration between different modules.

use bytes::Bytes;
use packetizer::{
    ChannelSink, FramingMode, FramingStrategy, HeaderFraming, LengthCodec, Packetizer,
    PacketizerConfig, PacketizerError, VecSink,
};
use tokio::io::AsyncWriteExt;

/// Test a JSON options document driving header+payload framing end to end.
#[test]
fn test_config_document_to_packets() {
    let config: PacketizerConfig = serde_json::from_str(
        r#"{
            "mode": "header-payload",
            "headerSize": 4,
            "payloadSizeIndex": 0,
            "readDataLength": "u16-be",
            "maxDataLength": 256
        }"#,
    )
    .unwrap();

    let layout = HeaderFraming {
        header_size: 4,
        length_offset: 0,
        length_codec: LengthCodec::U16Be,
        max_payload: Some(256),
    };

    let mut packetizer = Packetizer::from_config(&config, VecSink::new()).unwrap();
    let mut stream = layout.encode_frame(b"alpha").unwrap();
    stream.extend(layout.encode_frame(b"beta").unwrap());
    packetizer.append(&stream);

    assert_eq!(packetizer.sink().packets().len(), 2);
    assert_eq!(&packetizer.sink().packets()[0][4..], b"alpha");
    assert_eq!(&packetizer.sink().packets()[1][4..], b"beta");
    assert!(packetizer.is_empty());
}

/// Test the default options document: fixed-size framing at 500 bytes.
#[test]
fn test_default_config_is_fixed_500() {
    let config: PacketizerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.mode, FramingMode::FixedSize);

    let mut packetizer = Packetizer::from_config(&config, VecSink::new()).unwrap();
    packetizer.append(&[0xCD; 1200]);

    assert_eq!(packetizer.sink().packets().len(), 2);
    assert_eq!(packetizer.sink().packets()[0].len(), 500);
    assert_eq!(packetizer.len(), 200);
}

/// Test that encoded frames parse back byte-identically, even one byte
/// at a time.
#[test]
fn test_encode_then_parse_byte_at_a_time() {
    let layout = HeaderFraming {
        header_size: 6,
        length_offset: 2,
        length_codec: LengthCodec::U32Be,
        max_payload: Some(1 << 20),
    };

    let payloads: [&[u8]; 3] = [b"short", b"", b"a somewhat longer payload"];
    let mut stream = Vec::new();
    for payload in payloads {
        stream.extend(layout.encode_frame(payload).unwrap());
    }

    let mut packetizer =
        Packetizer::new(FramingStrategy::header(layout), VecSink::new()).unwrap();
    for byte in &stream {
        packetizer.append(&[*byte]);
    }

    let packets = packetizer.sink().packets();
    assert_eq!(packets.len(), 3);
    for (packet, payload) in packets.iter().zip(payloads) {
        assert_eq!(&packet[6..], payload);
    }
    assert!(packetizer.is_empty());
}

/// Test the channel sink: packets and errors land on separate receivers.
#[test]
fn test_channel_sink_flow() {
    let (sink, mut packet_rx, mut error_rx) = ChannelSink::channel();
    let layout = HeaderFraming {
        max_payload: Some(8),
        ..HeaderFraming::default()
    };
    let mut packetizer = Packetizer::new(FramingStrategy::header(layout), sink).unwrap();

    packetizer.append(&layout.encode_frame(b"fits").unwrap());
    // Header declaring 9 bytes against a cap of 8.
    let mut oversized = layout.encode_frame(&[0u8; 9]).unwrap();
    oversized.truncate(7);
    packetizer.append(&oversized);

    assert_eq!(&packet_rx.try_recv().unwrap()[7..], b"fits");
    assert!(packet_rx.try_recv().is_err());
    assert!(matches!(
        error_rx.try_recv().unwrap(),
        PacketizerError::OversizedPayload { declared: 9, max: 8 }
    ));
}

/// Test pumping a duplex stream into a packetizer under forced
/// fragmentation.
#[tokio::test]
async fn test_pump_duplex_end_to_end() {
    let layout = HeaderFraming::default();
    let mut stream = Vec::new();
    for i in 0u8..5 {
        let payload = vec![i; usize::from(i) * 3];
        stream.extend(layout.encode_frame(&payload).unwrap());
    }

    let (mut client, server) = tokio::io::duplex(16);
    let writer = tokio::spawn(async move {
        client.write_all(&stream).await.unwrap();
    });

    let mut packetizer =
        Packetizer::new(FramingStrategy::header(layout), VecSink::new()).unwrap();
    packetizer::source::pump(server, &mut packetizer).await.unwrap();
    writer.await.unwrap();

    let packets = packetizer.sink().packets();
    assert_eq!(packets.len(), 5);
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(packet.len(), 7 + i * 3);
        assert!(packet[7..].iter().all(|&b| usize::from(b) == i));
    }
}

/// Test that the same byte stream segments differently under the two
/// strategies.
#[test]
fn test_strategy_selection_changes_segmentation() {
    let layout = HeaderFraming {
        header_size: 3,
        length_offset: 0,
        length_codec: LengthCodec::U8,
        max_payload: None,
    };
    // One 3+6 frame; also exactly three 3-byte fixed packets.
    let stream = [0x06, 0x00, 0x00, b'p', b'a', b'y', b'l', b'o', b'a'];

    let mut by_header =
        Packetizer::new(FramingStrategy::header(layout), VecSink::new()).unwrap();
    by_header.append(&stream);
    assert_eq!(by_header.sink().packets().len(), 1);
    assert_eq!(by_header.sink().packets()[0].len(), 9);

    let mut by_size = Packetizer::new(FramingStrategy::fixed(3), VecSink::new()).unwrap();
    by_size.append(&stream);
    assert_eq!(by_size.sink().packets().len(), 3);
    assert_eq!(&by_size.sink().packets()[0][..], &stream[..3]);
}

/// Test that a boxed sink slots in where a concrete one does.
#[test]
fn test_boxed_sink_integration() {
    let (sink, mut packet_rx, _error_rx) = ChannelSink::channel();
    let boxed: Box<dyn packetizer::PacketSink> = Box::new(sink);
    let mut packetizer = Packetizer::new(FramingStrategy::fixed(2), boxed).unwrap();
    packetizer.append(b"abcd");

    assert_eq!(&packet_rx.try_recv().unwrap()[..], b"ab");
    assert_eq!(&packet_rx.try_recv().unwrap()[..], b"cd");
    assert!(packetizer.is_empty());
}

/// Test recovering leftover bytes after EOF for diagnostics.
#[tokio::test]
async fn test_pump_reports_truncated_tail() {
    let layout = HeaderFraming::default();
    let frame = layout.encode_frame(b"complete").unwrap();

    let (mut client, server) = tokio::io::duplex(64);
    let truncated = frame[..frame.len() - 3].to_vec();
    let writer = tokio::spawn(async move {
        client.write_all(&frame).await.unwrap();
        client.write_all(&truncated).await.unwrap();
    });

    let mut packetizer =
        Packetizer::new(FramingStrategy::header(layout), VecSink::new()).unwrap();
    packetizer::source::pump(server, &mut packetizer).await.unwrap();
    writer.await.unwrap();

    assert_eq!(packetizer.sink().packets().len(), 1);
    assert_eq!(packetizer.len(), 12);
}

/// Test that packets survive the packetizer being consumed.
#[test]
fn test_packets_outlive_packetizer() {
    let mut packetizer = Packetizer::new(FramingStrategy::fixed(4), VecSink::new()).unwrap();
    packetizer.append(b"keepmearound");

    let (packets, _errors) = packetizer.into_sink().into_parts();
    let kept: Vec<Bytes> = packets;
    assert_eq!(kept.len(), 3);
    assert_eq!(&kept[0][..], b"keep");
    assert_eq!(&kept[2][..], b"ound");
}
