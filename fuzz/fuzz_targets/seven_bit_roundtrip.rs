#![no_main]

use libfuzzer_sys::fuzz_target;
use streamread_decoder::{decode_7bit_int, encode_7bit_int, MAX_7BIT_ENCODED_LEN};

// Fuzz target: 7-bit integer encode->decode roundtrip.
//
// Takes 4 bytes of fuzz input as a u32. Values the scheme cannot carry
// must be rejected; every accepted value must decode back unchanged.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let value = u32::from_le_bytes(data[..4].try_into().unwrap());

    let mut buf = [0u8; MAX_7BIT_ENCODED_LEN];
    let Ok(encoded_len) = encode_7bit_int(value, &mut buf) else {
        return;
    };

    let (decoded, decoded_len) = decode_7bit_int(&buf[..encoded_len]).unwrap();
    assert_eq!(decoded, i64::from(value));
    assert_eq!(decoded_len, encoded_len);
});
