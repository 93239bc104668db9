#![no_main]

use bitstream::BitCursor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cursor = BitCursor::new(data);
    let mut idx = 0usize;

    // Input bytes drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 9;
        idx += 1;

        match op {
            0 => {
                let _ = cursor.read_bit();
            }
            1 => {
                let bits = data[idx - 1] % 65;
                let _ = cursor.read_bits(bits);
            }
            2 => cursor.flush_bits(),
            3 => {
                let _ = cursor.read_u32();
            }
            4 => {
                let _ = cursor.read_u64();
            }
            5 => {
                let _ = cursor.read_cstring();
            }
            6 => {
                let _ = cursor.read_xor_byte(data[idx - 1]);
            }
            7 => {
                let len = usize::from(data[idx - 1] % 32);
                let _ = cursor.read_fixed_string(len);
            }
            _ => {
                let size = usize::from(data[idx - 1]) * 16;
                let _ = cursor.inflate(size);
            }
        }
    }
});
