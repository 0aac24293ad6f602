use texpreview_log::LogParser;

const TEMPLATE_OFFSET: u32 = 8;

#[test]
fn test_tikz_snippet_log() {
    let input = include_str!("fixtures/tikz_undefined.log");
    let records = LogParser::with_offset(TEMPLATE_OFFSET).parse(input);

    for record in &records {
        println!("{:?}", record);
    }

    // The repeated "Undefined control sequence" summary at l.11 is dropped.
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].message, "Undefined control sequence.");
    assert_eq!(records[0].raw_line, Some(11));
    assert_eq!(records[0].line, Some(3));
    assert!(records[0].context.starts_with("l.11 \\drwa (0,0) -- (1,1);"));

    assert!(records[1].message.starts_with("Package pgfkeys Error"));
    assert_eq!(records[1].raw_line, None);
    assert_eq!(records[1].line, None);
    assert!(records[1].context.starts_with("ignore it."));
}

#[test]
fn test_tikz_snippet_log_as_full_document() {
    let input = include_str!("fixtures/tikz_undefined.log");
    let records = LogParser::new().parse(input);

    assert_eq!(records[0].line, Some(11));
    assert_eq!(records[0].line, records[0].raw_line);
}

#[test]
fn test_context_never_exceeds_limit() {
    let input = include_str!("fixtures/tikz_undefined.log");
    for record in LogParser::new().parse(input) {
        assert!(record.context.chars().count() <= texpreview_log::parser::CONTEXT_LIMIT);
    }
}
