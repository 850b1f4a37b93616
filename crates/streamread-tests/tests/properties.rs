//! End-to-end checks of the exact-read guarantees.
//!
//! Each test drives a `StreamReader` over a real source and asserts one
//! observable property:
//!
//! - **Exactness**: `read(n)` returns precisely the next `n` bytes and
//!   moves the offset by `n`, whether the bytes were preloaded or trickled
//!   in across many chunks.
//!
//! - **Closure**: reading past the end of a closed source fails with
//!   `StreamClosed` and consumes nothing.
//!
//! - **Wire contracts**: the 7-bit integer and length-prefixed string
//!   layouts decode bit-exactly.

use streamread_decoder::{Endian, ReadError, StreamReader, decode_7bit_int};
use streamread_source::{Delivery, Pull, SingleShotSource, Source};
use streamread_tests::{PayloadBuilder, fragmented_source};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

// ── Exactness ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preloaded_read_returns_bytes_in_order() {
    for n in [0, 1, 2, 7, 64, 1000] {
        let bytes = payload(n + 5);
        let mut reader = StreamReader::from_bytes(bytes.clone());

        let got = reader.read(n).await.unwrap();
        assert_eq!(&got[..], &bytes[..n], "read({n})");
        assert_eq!(reader.offset(), n as u64);
    }
}

#[tokio::test]
async fn sequential_reads_never_overlap() {
    let mut reader = StreamReader::from_bytes(vec![10, 11, 12, 13, 14]);
    assert_eq!(&reader.read(2).await.unwrap()[..], &[10, 11]);
    assert_eq!(&reader.read(3).await.unwrap()[..], &[12, 13, 14]);
    assert_eq!(reader.offset(), 5);
}

#[tokio::test]
async fn fragmented_delivery_is_reassembled() {
    let bytes = payload(300);
    for chunk in [1, 3, 7, 64] {
        let (source, producer) = fragmented_source(bytes.clone(), chunk);
        let mut reader = StreamReader::new(source);

        let first = reader.read(100).await.unwrap();
        let second = reader.read(200).await.unwrap();
        assert_eq!(&first[..], &bytes[..100], "chunk size {chunk}");
        assert_eq!(&second[..], &bytes[100..], "chunk size {chunk}");
        assert_eq!(reader.offset(), 300);

        producer.await.unwrap();
        assert!(reader.read(1).await.unwrap_err().is_stream_closed());
    }
}

#[tokio::test]
async fn typed_reads_over_fragmented_source() {
    let bytes = PayloadBuilder::new()
        .bytes(&0xDEAD_BEEFu32.to_be_bytes())
        .string("streamed")
        .bytes(&(-1.25f64).to_le_bytes())
        .bytes(&[1])
        .build();
    let (source, producer) = fragmented_source(bytes, 3);
    let mut reader = StreamReader::new(source);

    assert_eq!(reader.read_u32(Endian::Big).await.unwrap(), 0xDEAD_BEEF);
    assert_eq!(reader.read_string(None, None).await.unwrap(), "streamed");
    assert_eq!(reader.read_f64(Endian::Little).await.unwrap(), -1.25);
    assert!(reader.read_bool().await.unwrap());
    assert_eq!(reader.offset(), 4 + 1 + 8 + 8 + 1);
    producer.await.unwrap();
}

#[tokio::test]
async fn u32_round_trip_both_orders() {
    let values = [0, 1, 127, 128, 0xFFFF, 0x0001_0000, 0x7FFF_FFFF, 0x8000_0000, u32::MAX];
    let mut bytes = Vec::new();
    for value in values {
        bytes.extend_from_slice(&value.to_be_bytes());
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    let mut reader = StreamReader::from_bytes(bytes);
    for value in values {
        assert_eq!(reader.read_u32(Endian::Big).await.unwrap(), value);
        assert_eq!(reader.read_u32(Endian::Little).await.unwrap(), value);
    }
}

// ── Closure ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reading_past_single_shot_end_fails() {
    let mut reader = StreamReader::from_bytes(vec![1, 2, 3]);
    let err = reader.read(4).await.unwrap_err();

    assert!(matches!(err, ReadError::StreamClosed { requested: 4, offset: 0 }));
    assert!(reader.is_closed());
    assert_eq!(reader.offset(), 0);
}

#[tokio::test]
async fn exhausting_then_overreading_fails() {
    let mut reader = StreamReader::from_bytes(vec![1, 2, 3]);
    reader.read(3).await.unwrap();
    assert!(matches!(
        reader.read(1).await,
        Err(ReadError::StreamClosed { requested: 1, offset: 3 })
    ));
}

#[tokio::test]
async fn empty_single_shot_never_hangs() {
    let mut reader = StreamReader::from_bytes(Vec::new());
    assert!(reader.read(0).await.unwrap().is_empty());
    assert!(reader.read(1).await.unwrap_err().is_stream_closed());
}

#[test]
fn single_shot_delivery_contract() {
    let mut source = SingleShotSource::new(vec![4, 5, 6]);
    assert!(matches!(source.deliver(), Delivery::Chunk(chunk) if chunk[..] == [4, 5, 6]));
    for _ in 0..3 {
        assert_eq!(source.deliver(), Delivery::End);
    }

    let mut empty = SingleShotSource::new(Vec::new());
    assert_eq!(empty.deliver(), Delivery::End);
    assert_eq!(empty.pull(1).unwrap(), Pull::Insufficient);
    assert!(empty.is_closed());
}

// ── Wire contracts ────────────────────────────────────────────────────────────

#[tokio::test]
async fn seven_bit_integer_uses_six_bit_mask_and_seven_bit_shift() {
    let mut reader = StreamReader::from_bytes(vec![0x81, 0x05]);
    assert_eq!(reader.read_7bit_encoded_int().await.unwrap(), 133);
    assert_eq!(reader.offset(), 2);

    // A standard LEB128 reader would produce 1 + (5 << 7) = 641.
    assert_ne!(decode_7bit_int(&[0x81, 0x05]).unwrap().0, 641);
}

#[tokio::test]
async fn async_and_sync_seven_bit_decoders_agree() {
    let cases: [&[u8]; 6] = [
        &[0x00],
        &[0x7F],
        &[0xC1, 0x3F],
        &[0xBF, 0xBF, 0x3F],
        &[0x88, 0x80, 0x80, 0x80, 0x00],
        &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01],
    ];
    for case in cases {
        let (expected, consumed) = decode_7bit_int(case).unwrap();
        let mut reader = StreamReader::from_bytes(case.to_vec());
        assert_eq!(reader.read_7bit_encoded_int().await.unwrap(), expected, "{case:02x?}");
        assert_eq!(reader.offset(), consumed as u64);
    }
}

#[tokio::test]
async fn length_prefixed_string() {
    let mut reader = StreamReader::from_bytes(b"\x05hello".to_vec());
    assert_eq!(reader.read_string(None, None).await.unwrap(), "hello");
    assert_eq!(reader.offset(), 6);
}

#[tokio::test]
async fn long_string_needs_multi_byte_prefix() {
    // 130 = (1 << 7) + 2
    let text = "x".repeat(130);
    let bytes = PayloadBuilder::new().string(&text).build();
    assert_eq!(&bytes[..2], &[0x81, 0x02]);

    let mut reader = StreamReader::from_bytes(bytes);
    assert_eq!(reader.read_string(None, None).await.unwrap(), text);
    assert_eq!(reader.offset(), 132);
}
