use bitstream::{BitCursor, BitError, BitWriter};

#[test]
fn bit_region_then_bytes() {
    let mut writer = BitWriter::new();
    writer.write_bits(0b1_0110, 5).unwrap();
    writer.write_u32(0xDEAD_BEEF);
    writer.write_bits(3, 2).unwrap();
    writer.write_f32(1.5);
    let bytes = writer.finish();
    assert_eq!(bytes.len(), 1 + 4 + 1 + 4);

    let mut cursor = BitCursor::new(&bytes);
    assert_eq!(cursor.read_bits(5).unwrap(), 0b1_0110);
    assert_eq!(cursor.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(cursor.read_bits(2).unwrap(), 3);
    assert!((cursor.read_f32().unwrap() - 1.5).abs() < f32::EPSILON);
    assert!(cursor.is_at_end());
}

#[test]
fn strings_and_xor_bytes() {
    let mut writer = BitWriter::new();
    writer.write_cstring(b"Thrall");
    writer.write_bits(6, 4).unwrap();
    writer.write_bytes(b"Jaina");
    writer.write_u8(0x5A);
    let bytes = writer.finish();

    let mut cursor = BitCursor::new(&bytes);
    assert_eq!(cursor.read_cstring().unwrap(), b"Thrall");
    let len = cursor.read_bits(4).unwrap();
    assert_eq!(len, 6);
    assert_eq!(cursor.read_fixed_string(5).unwrap(), b"Jaina");
    assert_eq!(cursor.read_xor_byte(0).unwrap(), 0x5A);
    assert!(cursor.is_at_end());
}

#[test]
fn exhausted_buffer_reports_out_of_data() {
    let mut writer = BitWriter::new();
    writer.write_u16(7);
    let bytes = writer.finish();

    let mut cursor = BitCursor::new(&bytes);
    assert_eq!(cursor.read_u16().unwrap(), 7);
    let err = cursor.read_i32().unwrap_err();
    assert!(err.is_out_of_data());
    assert!(matches!(cursor.read_bit(), Err(BitError::OutOfData { .. })));
}

#[test]
fn owned_cursor_matches_borrowed() {
    let mut writer = BitWriter::new();
    writer.write_bit(true);
    writer.write_u64(u64::MAX - 1);
    let bytes = writer.finish();

    let mut borrowed = BitCursor::new(&bytes);
    let mut owned = BitCursor::from_vec(bytes.clone());
    assert_eq!(borrowed.read_bit().unwrap(), owned.read_bit().unwrap());
    assert_eq!(borrowed.read_u64().unwrap(), owned.read_u64().unwrap());
    assert_eq!(borrowed.bit_position(), owned.bit_position());
}
