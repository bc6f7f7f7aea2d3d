#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlmap::beautify;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = beautify(s);
        assert_eq!(beautify(&once), once);
    }
});
