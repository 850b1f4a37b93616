#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamread_decoder::{Endian, StreamReader};
use streamread_source::channel;

#[derive(Arbitrary, Debug)]
enum Op {
    Read(u8),
    Byte,
    SevenBit,
    Str,
    U32(bool),
    F64(bool),
    Int(u8, bool),
}

#[derive(Arbitrary, Debug)]
struct Plan {
    chunks: Vec<Vec<u8>>,
    ops: Vec<Op>,
}

fn endian(big: bool) -> Endian {
    if big { Endian::Big } else { Endian::Little }
}

// Fuzz target: run an arbitrary sequence of typed reads over an arbitrary
// chunking of the input.
//
// Checks that:
// - no read panics or hangs once the source is closed
// - the offset never moves on a failed read of a fixed-width value
// - the offset never exceeds the number of bytes fed in
fuzz_target!(|plan: Plan| {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    runtime.block_on(async {
        let total: usize = plan.chunks.iter().map(Vec::len).sum();
        let (feeder, source) = channel();
        for chunk in plan.chunks {
            feeder.push(chunk).unwrap();
        }
        drop(feeder);

        let mut reader = StreamReader::new(source);
        for op in plan.ops {
            let before = reader.offset();
            let fixed = match op {
                Op::Read(n) => reader.read(usize::from(n)).await.is_err(),
                Op::Byte => reader.read_byte().await.is_err(),
                Op::U32(big) => reader.read_u32(endian(big)).await.is_err(),
                Op::F64(big) => reader.read_f64(endian(big)).await.is_err(),
                Op::Int(len, big) => reader.read_int(usize::from(len % 8), endian(big)).await.is_err(),
                Op::SevenBit => {
                    let _ = reader.read_7bit_encoded_int().await;
                    false
                }
                Op::Str => {
                    let _ = reader.read_string(None, None).await;
                    false
                }
            };
            if fixed {
                assert_eq!(reader.offset(), before);
            }
            assert!(reader.offset() <= total as u64);
        }
    });
});
