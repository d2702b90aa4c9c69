//! Trace Parsing Tests.

use cachesim_core::common::{AccessType, TraceError};
use cachesim_core::sim::{TraceReader, TraceRecord, parse_line};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::plain_read("r ffe04540", AccessType::Read, 0xffe0_4540)]
#[case::prefixed_write("w 0x1f80", AccessType::Write, 0x1f80)]
#[case::upper_case("R 0XABCD", AccessType::Read, 0xabcd)]
#[case::underscores("w 0000_1f80", AccessType::Write, 0x1f80)]
#[case::surrounding_space("  r\t40  ", AccessType::Read, 0x40)]
fn parses_valid_records(#[case] line: &str, #[case] op: AccessType, #[case] address: u32) {
    assert_eq!(
        parse_line(1, line).unwrap(),
        Some(TraceRecord { op, address })
    );
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   \t")]
#[case::comment("# r 40")]
fn skips_non_records(#[case] line: &str) {
    assert_eq!(parse_line(1, line).unwrap(), None);
}

#[test]
fn rejects_missing_address() {
    let err = parse_line(7, "r").unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 7, .. }));
}

#[test]
fn rejects_trailing_fields() {
    let err = parse_line(2, "r 40 extra").unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 2, .. }));
}

#[test]
fn rejects_unknown_operation() {
    let err = parse_line(3, "x 40").unwrap_err();
    assert!(matches!(err, TraceError::UnknownOperation { line: 3, ref op } if op == "x"));
    assert_eq!(err.to_string(), "line 3: unknown operation \"x\"");
}

#[rstest]
#[case::not_hex("r 0xzz")]
#[case::too_wide("w 1_0000_0000")]
#[case::bare_prefix("r 0x")]
fn rejects_bad_addresses(#[case] line: &str) {
    let err = parse_line(5, line).unwrap_err();
    assert!(matches!(err, TraceError::InvalidAddress { line: 5, .. }), "{err}");
}

#[test]
fn reader_numbers_lines_including_skipped_ones() {
    let input = "# trace\n\nr 0\nw 20\nr\n";
    let mut reader = TraceReader::new(input.as_bytes());

    assert_eq!(
        reader.next().unwrap().unwrap(),
        TraceRecord {
            op: AccessType::Read,
            address: 0
        }
    );
    assert_eq!(
        reader.next().unwrap().unwrap(),
        TraceRecord {
            op: AccessType::Write,
            address: 0x20
        }
    );
    assert!(matches!(
        reader.next().unwrap(),
        Err(TraceError::Malformed { line: 5, .. })
    ));
    assert!(reader.next().is_none());
}
