//! Fuzz target for the `--distribution` flag parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use synthvoc::InstanceCountDistribution;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(dist) = raw.parse::<InstanceCountDistribution>() {
        // Anything accepted must parse again from its display form.
        let _ = dist
            .to_string()
            .parse::<InstanceCountDistribution>()
            .expect("displayed distribution parses");
    }
});
