#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut memory = vec![0u8; fld::estimate_memory(text)];
    match fld::parse(text, &mut memory) {
        Ok(doc) => {
            assert!(doc.bytes_used() <= doc.capacity());
            for field in doc.iter_recursive() {
                let value = doc.get_path(&field.path());
                if field.path().len() <= fld::MAX_PATH_LENGTH {
                    assert!(value.is_some());
                }
            }
        }
        Err(err) => {
            assert!(err.line >= 1 && err.column >= 1);
            assert!(err.span.end as usize <= text.len());
        }
    }
});
