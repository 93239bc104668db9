#![no_main]

use codec::{catalogue, decode_message, CodecLimits, InMemoryState, RecordTree};
use libfuzzer_sys::fuzz_target;
use protocol::{Opcode, ProtocolBuild};
use wire::RawMessage;

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let Ok(registry) = catalogue() else {
        return;
    };

    let opcode = Opcode::ALL[usize::from(data[0]) % Opcode::ALL.len()];
    let build = ProtocolBuild::new(u32::from_le_bytes([data[1], data[2], data[3], data[4]]) % 20_000);
    let payload = &data[5..];

    let state = InMemoryState::new();
    let mut records = RecordTree::new();
    let message = RawMessage::new(opcode, build, payload);
    let result = decode_message(
        &registry,
        &message,
        &mut records,
        state.handles(),
        &wire::Limits::for_testing(),
        &CodecLimits::for_testing(),
    );

    // Failed decodes close every list they opened.
    assert!(records.is_balanced());
    if result.is_err() {
        assert!(records.is_incomplete() || records.is_empty());
    }
});
