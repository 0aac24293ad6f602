#![no_main]
use libfuzzer_sys::fuzz_target;
use texpreview_log::LogParser;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    for record in LogParser::with_offset(8).parse(&s) {
        assert!(record.line.is_none_or(|line| line >= 1));
        assert!(record.context.chars().count() <= texpreview_log::parser::CONTEXT_LIMIT);
    }
});
