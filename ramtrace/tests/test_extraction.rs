use ramtrace::fixture;
use ramtrace::snapshot::CoreDump;
use ramtrace::symbols::SymbolFile;
use ramtrace::{extract_ring_buffer, ExtractError, RingBufferControl, SegmentSource, Stage};
use std::path::{Path, PathBuf};

const CONTROL_ADDR: u32 = 0x2000_0040;
const ARRAY_ADDR: u32 = 0x2000_1000;

fn control(get_head: i32, get_base: i32, put_tail: i32, capacity: u32) -> RingBufferControl {
    RingBufferControl {
        buffer: ARRAY_ADDR,
        put_head: put_tail,
        put_tail,
        put_base: get_base,
        get_head,
        get_tail: get_head,
        get_base,
        capacity,
    }
}

/// Sixteen distinct byte values
fn known_array() -> Vec<u8> {
    (0..16u8).map(|i| 0xC0 | i).collect()
}

fn write_inputs(dir: &Path, core: &[u8], symbols: &[u8]) -> (PathBuf, PathBuf) {
    let core_path = dir.join("core.elf");
    let symbols_path = dir.join("zephyr.elf");
    std::fs::write(&core_path, core).unwrap();
    std::fs::write(&symbols_path, symbols).unwrap();
    (core_path, symbols_path)
}

fn load(dir: &Path, core: &[u8]) -> (SymbolFile, CoreDump) {
    let symbols = fixture::symbol_file(&[("_kernel", 0x2000_0000), ("ram_trace_buf", CONTROL_ADDR)]);
    let (core_path, symbols_path) = write_inputs(dir, core, &symbols);
    (SymbolFile::open(symbols_path).unwrap(), CoreDump::open(core_path).unwrap())
}

#[test]
fn test_wrapped_buffer_round_trip_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control(28, 16, 38, 16), &known_array());
    let (symbols, dump) = load(dir.path(), &core);

    let extraction = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap();

    let array = known_array();
    let expected: Vec<u8> = array[12..16].iter().chain(&array[0..6]).copied().collect();
    assert_eq!(extraction.data, expected);
    assert_eq!(extraction.stored_size(), 10);
    assert!(extraction.wrapped);
}

#[test]
fn test_contiguous_buffer_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control(20, 16, 30, 16), &known_array());
    let (symbols, dump) = load(dir.path(), &core);

    let extraction = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap();
    assert_eq!(extraction.data, known_array()[4..14].to_vec());
    assert!(!extraction.wrapped);
}

#[test]
fn test_empty_buffer_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control(25, 16, 25, 16), &known_array());
    let (symbols, dump) = load(dir.path(), &core);

    let extraction = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap();
    assert!(extraction.data.is_empty());
}

#[test]
fn test_control_structure_inside_larger_segment() {
    // Control structure and array share one RAM segment, as on a real target
    let base = 0x2000_0000u32;
    let mut ram = vec![0u8; 0x2000];
    let ctrl = RingBufferControl { buffer: base + 0x1000, ..control(100, 96, 110, 64) };
    ram[0x40..0x60].copy_from_slice(&ctrl.encode());
    for (i, byte) in ram[0x1000..0x1040].iter_mut().enumerate() {
        *byte = u8::try_from(i).unwrap();
    }
    let core = fixture::core_dump(&[(0x0000_0000, &[0xFF; 64][..]), (base, &ram[..])]);

    let dir = tempfile::tempdir().unwrap();
    let (symbols, dump) = load(dir.path(), &core);
    assert_eq!(dump.segments().len(), 2);

    let extraction = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap();
    assert_eq!(extraction.data, (4u8..14).collect::<Vec<_>>());
}

#[test]
fn test_missing_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control(20, 16, 30, 16), &known_array());
    let (symbols, dump) = load(dir.path(), &core);

    let err = extract_ring_buffer("nrf_modem_trace_buf", &symbols, &dump).unwrap_err();
    assert!(matches!(err, ExtractError::SymbolNotFound { .. }));
}

#[test]
fn test_backing_array_missing_from_dump() {
    let dir = tempfile::tempdir().unwrap();
    let ctrl = control(20, 16, 30, 16);
    let core = fixture::core_dump(&[(CONTROL_ADDR, &ctrl.encode()[..])]);
    let (symbols, dump) = load(dir.path(), &core);

    let err = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap_err();
    assert!(matches!(err, ExtractError::AddressNotMapped { stage: Stage::BackingArray, .. }));
    assert!(err.to_string().contains("0x20001000"));
}

#[test]
fn test_corrupt_cursors_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let core = fixture::ring_buffer_core(CONTROL_ADDR, &control(16, 16, 40, 16), &known_array());
    let (symbols, dump) = load(dir.path(), &core);

    let err = extract_ring_buffer("ram_trace_buf", &symbols, &dump).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidRingBufferState { .. }));
    assert_eq!(err.stage(), Some(Stage::SliceComputation));
}

#[test]
fn test_non_elf_snapshot_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("core.bin");
    std::fs::write(&path, b"#CD:BEGIN#").unwrap();

    let err = CoreDump::open(&path).unwrap_err();
    assert!(matches!(err, ExtractError::Parse { .. }));
    assert!(err.to_string().contains("core.bin"));
}
