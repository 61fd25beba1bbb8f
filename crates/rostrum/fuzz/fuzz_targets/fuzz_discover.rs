//! Fuzz target for table discovery and cleaning.
//!
//! This fuzzer tests that page extraction:
//! 1. Never panics on malformed markup
//! 2. Only reports NoTableFound or success from discovery
//! 3. Always emits the canonical columns after cleaning

#![no_main]

use libfuzzer_sys::fuzz_target;
use rostrum::{Pipeline, RostrumConfig, RostrumError, SourceChain};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(pipeline) = Pipeline::with_source(&RostrumConfig::default(), SourceChain::new()) else {
        return;
    };

    match pipeline.extract(data) {
        Ok(extraction) => {
            assert!(extraction.selected < extraction.candidates.len());
            assert_eq!(extraction.clean.table.columns.len(), 12);
        }
        Err(RostrumError::NoTableFound) => {}
        Err(e) => panic!("unexpected error: {}", e),
    }
});
