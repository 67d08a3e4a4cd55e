#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = handlecheck::arbitrary::arbtests::analyze_layer(&mut Unstructured::new(data));
});
