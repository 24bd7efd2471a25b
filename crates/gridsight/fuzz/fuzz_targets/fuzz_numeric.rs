//! Fuzz target for the numeric cell parser.
//!
//! This fuzzer checks that the parser:
//! 1. Never panics on arbitrary text
//! 2. Only returns finite numbers
//! 3. Agrees with itself on surrounding whitespace

#![no_main]

use gridsight::parse_numeric;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if data.len() > 10_000 {
        return;
    }

    let parsed = parse_numeric(data);
    if let Some(value) = parsed {
        assert!(value.is_finite());
    }

    let padded = format!("  {}\t", data);
    assert_eq!(parse_numeric(&padded), parsed);
});
