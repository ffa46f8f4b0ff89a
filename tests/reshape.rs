//! Column-layout conversion against real files.

use std::io::{Read, Write};

use agglom::ConversionStream;
use tempfile::NamedTempFile;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file
}

fn convert(source: &str, target: &str) -> String {
    let source = temp_file(source);
    let target = temp_file(target);
    let mut stream = ConversionStream::new(source.path(), target.path()).expect("open stream");
    let mut out = String::new();
    stream.read_to_string(&mut out).expect("read stream");
    out
}

#[test]
fn test_reorders_and_drops_columns() {
    let source = "alpha\tbeta\tgamma\n1\t2\t3\n4\t5\t6\n";
    let target = "gamma\talpha\nx\ty\n";
    assert_eq!(convert(source, target), "gamma\talpha\n3\t1\n6\t4\n");
}

#[test]
fn test_missing_columns_get_default() {
    let source = "alpha\tbeta\n1\t2\n";
    let target = "alpha\tdelta\tbeta\nx\ty\tz\n";
    assert_eq!(convert(source, target), "alpha\tdelta\tbeta\n1\t0.0\t2\n");
}

#[test]
fn test_custom_default_value() {
    let source = temp_file("a\n1\n");
    let target = temp_file("a\tmissing\nx\ty\n");
    let mut stream =
        ConversionStream::with_default(source.path(), target.path(), "NA").expect("open stream");
    let mut out = String::new();
    stream.read_to_string(&mut out).expect("read stream");
    assert_eq!(out, "a\tmissing\n1\tNA\n");
}

#[test]
fn test_empty_source_emits_header_only() {
    let source = "alpha\tbeta\n";
    let target = "beta\nx\n";
    assert_eq!(convert(source, target), "beta\n");
}

#[test]
fn test_small_buffer_reads() {
    // The stream must survive arbitrarily small read requests.
    let source = temp_file("a\tb\n1\t2\n3\t4\n");
    let target = temp_file("b\ta\nx\ty\n");
    let mut stream = ConversionStream::new(source.path(), target.path()).expect("open stream");
    let mut out = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte).expect("read byte") {
            0 => break,
            n => out.extend_from_slice(&byte[..n]),
        }
    }
    assert_eq!(String::from_utf8(out).unwrap(), "b\ta\n2\t1\n4\t3\n");
}
