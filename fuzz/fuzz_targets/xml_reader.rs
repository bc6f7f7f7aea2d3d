#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlmap::{from_xml, to_xml, Value, ROOT};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(map) = from_xml(s) {
            let root = map
                .get(ROOT)
                .and_then(Value::as_scalar)
                .unwrap_or("root")
                .to_string();
            let _ = to_xml(&Value::Mapping(map), &root);
        }
    }
});
