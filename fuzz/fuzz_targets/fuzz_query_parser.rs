#![no_main]

use hiscore::query::QuerySet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Neither single expressions nor whole query files may panic
    let _ = hiscore::query::compile_expression(data);
    if let Ok(set) = data.parse::<QuerySet>() {
        assert!(set.min_score() <= 0.0);
        assert!(set.max_score() >= 0.0);
    }
});
