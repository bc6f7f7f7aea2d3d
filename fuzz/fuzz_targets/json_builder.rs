#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlmap::{from_xml_with_config, to_xml, ParseConfig, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<Value>(data) {
        if let Ok(xml) = to_xml(&value, "root") {
            // whatever the builder writes must read back
            assert!(from_xml_with_config(&xml, ParseConfig::unlimited()).is_ok());
        }
    }
});
