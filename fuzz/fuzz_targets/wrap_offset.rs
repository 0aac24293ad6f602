#![no_main]
use libfuzzer_sys::fuzz_target;
use texpreview_build::template;

// User line 1 of a wrapped snippet must sit right after the header.
fuzz_target!(|data: &[u8]| {
    let code = String::from_utf8_lossy(data);
    let wrapped = template::wrap(&code);
    if wrapped.offset == 0 {
        assert!(template::is_full_document(&code));
        assert_eq!(wrapped.source, code.as_ref());
    } else {
        assert_eq!(wrapped.offset, template::header_line_offset());
        let body = &wrapped.source[template::TEMPLATE_HEADER.len()..];
        assert!(body.starts_with(code.as_ref()));
    }
});
