use ramtrace::{fixture, RingBufferControl};
use std::path::Path;
use std::process::{Command, Output};

const CONTROL_ADDR: u32 = 0x2000_0040;

fn control(get_head: i32, put_tail: i32) -> RingBufferControl {
    RingBufferControl {
        buffer: 0x2000_1000,
        put_head: put_tail,
        put_tail,
        put_base: 16,
        get_head,
        get_tail: get_head,
        get_base: 16,
        capacity: 16,
    }
}

fn setup(dir: &Path, ctrl: &RingBufferControl) {
    let array: Vec<u8> = (b'a'..=b'p').collect();
    std::fs::write(dir.join("core.elf"), fixture::ring_buffer_core(CONTROL_ADDR, ctrl, &array))
        .unwrap();
    std::fs::write(dir.join("zephyr.elf"), fixture::symbol_file(&[("ram_trace_buf", CONTROL_ADDR)]))
        .unwrap();
}

fn ramtrace(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ramtrace"))
        .current_dir(dir)
        .args(["-c", "core.elf", "-s", "zephyr.elf", "-o", "trace.bin"])
        .args(extra)
        .output()
        .expect("Failed to run ramtrace")
}

#[test]
fn test_cli_writes_trace_and_reports_size() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(28, 38));

    let out = ramtrace(dir.path(), &[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("modem trace buffer contained 10 bytes."));
    assert_eq!(std::fs::read(dir.path().join("trace.bin")).unwrap(), b"mnopabcdef");
}

#[test]
fn test_cli_quiet_suppresses_status() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(20, 30));

    let out = ramtrace(dir.path(), &["--quiet"]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert_eq!(std::fs::read(dir.path().join("trace.bin")).unwrap(), b"efghijklmn");
}

#[test]
fn test_cli_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(28, 38));

    let out = ramtrace(dir.path(), &["--report", "trace.json"]);
    assert!(out.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("trace.json")).unwrap()).unwrap();
    assert_eq!(report["symbol"], "ram_trace_buf");
    assert_eq!(report["stored_size"], 10);
    assert_eq!(report["wrapped"], true);
}

#[test]
fn test_cli_unknown_symbol_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(28, 38));

    let out = ramtrace(dir.path(), &["--symbol", "missing_buf"]);
    assert_eq!(out.status.code(), Some(65));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing_buf"));
    assert!(!dir.path().join("trace.bin").exists());
}

#[test]
fn test_cli_unwritable_report_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(28, 38));

    let out = ramtrace(dir.path(), &["--report", "missing/dir/r.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing/dir"));
    assert!(!dir.path().join("trace.bin").exists());
}

#[test]
fn test_cli_corrupt_buffer_keeps_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    setup(dir.path(), &control(16, 40));
    std::fs::write(dir.path().join("trace.bin"), b"previous").unwrap();

    let out = ramtrace(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(65));
    assert!(String::from_utf8_lossy(&out.stderr).contains("slice computation"));
    assert_eq!(std::fs::read(dir.path().join("trace.bin")).unwrap(), b"previous");
}

#[test]
fn test_cli_missing_coredump() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("zephyr.elf"), fixture::symbol_file(&[])).unwrap();

    let out = ramtrace(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(66));
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn test_cli_requires_output_argument() {
    let out = Command::new(env!("CARGO_BIN_EXE_ramtrace"))
        .args(["-c", "core.elf", "-s", "zephyr.elf"])
        .output()
        .expect("Failed to run ramtrace");
    assert!(!out.status.success());
}
