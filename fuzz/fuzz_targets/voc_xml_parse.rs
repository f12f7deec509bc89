//! Fuzz target for annotation XML parsing.
//!
//! Feeds arbitrary bytes to the reader used by `synthvoc verify`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use synthvoc::ir::io_voc_xml::from_voc_xml_slice;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_voc_xml_slice(data);
});
