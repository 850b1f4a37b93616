#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: decode_7bit_int on raw bytes.
//
// Catches bugs in:
// - Zero-length input
// - Long continuation runs (the accumulator must wrap, never overflow)
// - Consumed length disagreeing with the terminating byte
fuzz_target!(|data: &[u8]| {
    if let Ok((_, consumed)) = streamread_decoder::decode_7bit_int(data) {
        assert!(consumed >= 1 && consumed <= data.len());
        assert_eq!(data[consumed - 1] & 0x80, 0);
    }
});
