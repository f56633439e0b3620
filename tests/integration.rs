use slurpbuf::{SlurpBuilder, SlurpError, Slurper, with_local};
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

// Tests in this binary share one process, and `test_process_wide_defaults`
// changes the process defaults. Everything else here either uses explicit
// options or sticks to ASCII content, which decodes identically under any
// default charset.

fn utf8_slurper() -> Slurper {
    Slurper::with_options(SlurpBuilder::new().charset(encoding_rs::UTF_8).build())
}

#[test]
fn test_read_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let content: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    fs::write(&path, &content).unwrap();

    let mut slurper = utf8_slurper();
    assert_eq!(slurper.read_file_bytes(&path).unwrap(), content);

    let text_path = dir.path().join("data.txt");
    fs::write(&text_path, "line one\nline two\n").unwrap();
    assert_eq!(
        slurper.read_file_string(&text_path).unwrap(),
        "line one\nline two\n"
    );
    assert_eq!(
        slurper
            .read_file_chars(&text_path)
            .unwrap()
            .iter()
            .collect::<String>(),
        "line one\nline two\n"
    );
}

#[test]
fn test_read_file_with_bom() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.txt");
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(b"hello");
    fs::write(&path, &content).unwrap();

    let mut slurper = utf8_slurper();
    assert_eq!(slurper.read_file_string(&path).unwrap(), "hello");
}

#[test]
fn test_missing_file_error_carries_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.txt");
    let mut slurper = utf8_slurper();
    match slurper.read_file_bytes(&path) {
        Err(SlurpError::File { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected File error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_large_file_reuses_cache() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big.txt");
    let content = "0123456789abcdef".repeat(4096); // 64 KiB
    fs::write(&path, &content).unwrap();

    let mut slurper = utf8_slurper();
    for _ in 0..3 {
        assert_eq!(slurper.read_file_string(&path).unwrap(), content);
    }

    let stats = slurper.stats();
    assert!(stats.byte_capacity >= content.len());
    // Later passes are served from the already-grown scratch.
    let settled = stats.byte_resizes;
    slurper.read_file_string(&path).unwrap();
    assert_eq!(slurper.stats().byte_resizes, settled);
}

#[test]
fn test_with_local_per_thread_instances() {
    let first = with_local(|s| s.read_bytes(Cursor::new(b"main thread")).unwrap());
    assert_eq!(first, b"main thread");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let payload = format!("worker {}", i).into_bytes();
                let out = with_local(|s| s.read_bytes(Cursor::new(&payload)).unwrap());
                assert_eq!(out, payload);
                with_local(|s| s.stats().byte_reads)
            })
        })
        .collect();
    for handle in handles {
        // Each thread's instance saw only its own reads.
        assert_eq!(handle.join().unwrap(), 1);
    }
}

#[test]
fn test_process_wide_defaults() {
    // First override wins and applies to instances constructed afterwards.
    assert!(slurpbuf::set_default_chunk_size(1234));
    assert!(!slurpbuf::set_default_chunk_size(4321));
    assert_eq!(Slurper::new().options().chunk_size, 1234);

    assert!(slurpbuf::set_default_charset(encoding_rs::WINDOWS_1252));
    assert!(!slurpbuf::set_default_charset(encoding_rs::UTF_8));
    assert_eq!(Slurper::new().options().charset, encoding_rs::WINDOWS_1252);

    // Explicit options are unaffected.
    let explicit = SlurpBuilder::new().chunk_size(64).build();
    assert_eq!(explicit.chunk_size, 64);
}
