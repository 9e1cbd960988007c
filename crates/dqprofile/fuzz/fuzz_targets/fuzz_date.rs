//! Fuzz target for date parsing and type inference.
//!
//! The date parser runs on every text cell during inference, so it must
//! never panic on pathological input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use dqprofile::dates::{is_date, parse_datetime};
use dqprofile::{Column, TypeInferrer, Value};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = parse_datetime(&lossy);
    let _ = is_date(&lossy);

    // One value per line
    let values: Vec<Value> = lossy.lines().take(50).map(Value::from).collect();
    let column = Column::new("fuzzed", values);
    let _ = TypeInferrer::new().infer(&column);
});
