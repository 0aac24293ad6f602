use texpreview_log::LogParser;

#[test]
fn test_many_distinct_errors_keep_order() {
    let mut log = String::new();
    for i in 1..=500u32 {
        log.push_str(&format!("! Undefined control sequence.\nl.{} \\cmd{}\n\n", i + 8, i));
    }

    let records = LogParser::with_offset(8).parse(&log);

    assert_eq!(records.len(), 500);
    for (idx, record) in records.iter().enumerate() {
        assert_eq!(record.line, Some(idx as u32 + 1));
    }
}

#[test]
fn test_repeated_error_collapses_to_first() {
    let mut log = String::new();
    for i in 0..200 {
        log.push_str(&format!("! Missing number, treated as zero.\nl.42 attempt {}\n\n", i));
    }

    let records = LogParser::new().parse(&log);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].context, "l.42 attempt 0");
}

#[test]
fn test_marker_at_end_of_input() {
    let records = LogParser::new().parse("(./input.tex\n! Emergency stop.");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].context, "");
}

#[test]
fn test_huge_line_number_does_not_panic() {
    let records = LogParser::new().parse("! X.\nl.99999999999999999999 y\n");
    assert_eq!(records[0].raw_line, None);
}
