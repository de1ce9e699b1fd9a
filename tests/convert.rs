use std::io::Cursor;

use ccros_rs::layout::LineError;
use ccros_rs::store::StoreError;
use ccros_rs::{ConvertConfig, ConvertError, Converter, Strictness};
use pretty_assertions::assert_eq;

fn record(addr: &str, version: &str) -> String {
    format!(
        " {addr}  F3 0001 0001 110 01 ???? ?? 0010 0110 000 00 00 000 0000 ? 0 0 1 # QA001:C2 {version}"
    )
}

fn run(cfg: ConvertConfig, input: &str) -> Result<(Vec<u16>, ccros_rs::ConvertStats), ConvertError> {
    let (store, stats) = Converter::new(cfg).convert(Cursor::new(input.as_bytes().to_vec()))?;
    Ok((store.iter().map(|w| w.address()).collect(), stats))
}

#[test]
fn comments_and_unlisted_versions_are_skipped() {
    let input = [
        "#AAA  CN CH   CL   CM  CU CA   CB CK   CD   CF  CG CV CC  CS   AAASAKPK".to_string(),
        record("102", "   "),
        record("103", "999"),
        record("104", "A20"),
        "# trailing comment".to_string(),
        record("105", "004"),
    ]
    .join("\n");
    let (addrs, stats) = run(ConvertConfig::default(), &input).unwrap();
    assert_eq!(addrs, vec![0x102, 0x104, 0x105]);
    assert_eq!(stats.comments, 2);
    assert_eq!(stats.unlisted, 1);
    assert_eq!(stats.records, 3);
    assert_eq!(stats.lines, 6);
}

#[test]
fn version_tags_must_match_exactly() {
    // "4|0" is a substring of the historical tag list but not a tag
    let input = [record("102", "4|0"), record("103", "00")].join("\n");
    let (addrs, _) = run(ConvertConfig::default(), &input).unwrap();
    assert_eq!(addrs, Vec::<u16>::new());
}

#[test]
fn short_version_tag_is_blank_padded() {
    let mut cfg = ConvertConfig::default();
    cfg.accepted_versions.insert("X  ");
    let (addrs, _) = run(cfg, &record("1AB", "X")).unwrap();
    assert_eq!(addrs, vec![0x1AB]);
}

#[test]
fn crlf_input_is_accepted() {
    let input = format!("{}\r\n{}\r\n", record("010", ""), record("011", "014"));
    let (addrs, _) = run(ConvertConfig::default(), &input).unwrap();
    assert_eq!(addrs, vec![0x010, 0x011]);
}

#[test]
fn format_error_is_fatal_and_echoes_line() {
    let bad = record("102", "").replacen("  F3", " xF3", 1);
    let input = [record("100", ""), bad.clone(), record("101", "")].join("\n");
    let err = run(ConvertConfig::default(), &input).unwrap_err();
    match err {
        ConvertError::Format { line_number, line } => {
            assert_eq!(line_number, 2);
            assert_eq!(line, bad);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn short_and_empty_lines_are_format_errors() {
    for input in ["", " 102  F3 0001"] {
        let text = format!("{}\n{input}\n", record("100", ""));
        assert!(matches!(
            run(ConvertConfig::default(), &text),
            Err(ConvertError::Format { line_number: 2, .. })
        ));
    }
}

#[test]
fn capacity_overflow_fails_explicitly() {
    let cfg = ConvertConfig { capacity: 2, ..ConvertConfig::default() };
    let input = [record("001", ""), record("002", ""), record("003", "")].join("\n");
    match run(cfg, &input) {
        Err(ConvertError::Capacity { line_number, source }) => {
            assert_eq!(line_number, 3);
            assert_eq!(source, StoreError::CapacityExceeded { limit: 2 });
        }
        other => panic!("expected capacity error, got {other:?}"),
    }
}

#[test]
fn strict_mode_rejects_bad_digits() {
    let cfg = ConvertConfig { strictness: Strictness::Strict, ..ConvertConfig::default() };
    let err = run(cfg.clone(), &record("1?2", "")).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::InvalidField { line_number: 1, source: LineError::InvalidField { name: "ADDR", .. } }
    ));

    let bad_bits = record("102", "").replacen("0001 0001", "0002 0001", 1);
    let err = run(cfg.clone(), &bad_bits).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::InvalidField { source: LineError::InvalidField { name: "CH", .. }, .. }
    ));

    // wildcards are fine in bit groups
    let (addrs, _) = run(cfg, &record("102", "")).unwrap();
    assert_eq!(addrs, vec![0x102]);
}

#[test]
fn lenient_mode_keeps_truncated_values() {
    let (addrs, _) = run(ConvertConfig::default(), &record("1?2", "")).unwrap();
    assert_eq!(addrs, vec![0x1]);
}

#[test]
fn duplicates_keep_input_order() {
    let input = [record("200", ""), record("100", ""), record("200", "")].join("\n");
    let (addrs, _) = run(ConvertConfig::default(), &input).unwrap();
    assert_eq!(addrs, vec![0x200, 0x100, 0x200]);
}
