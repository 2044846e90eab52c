#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        for stub in vcast_si_core::extract_identifiers_from_str(content) {
            assert!(!stub.is_empty());
            assert!(!stub.starts_with(char::is_whitespace));
            assert!(!stub.ends_with(char::is_whitespace));
            assert!(!stub.contains('\n'));
        }
    }
});
