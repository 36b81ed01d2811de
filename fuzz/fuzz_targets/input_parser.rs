#![no_main]

use libfuzzer_sys::fuzz_target;
use bootsig::data::{parse_csv, parse_json};

fuzz_target!(|data: &[u8]| {
    // Prediction files come from other tools; malformed input must error, not panic
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_csv::<String>(input);
        let _ = parse_csv::<f64>(input);
        let _ = parse_json::<String>(input);
        let _ = parse_json::<f64>(input);
    }
});
