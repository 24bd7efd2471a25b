//! Fuzz target for HTML table ingestion and analysis.
//!
//! Arbitrary markup must load into a document and analyze without panics.

#![no_main]

use gridsight::{Document, GridSight};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let mut document = Document::parse_html(data);
    let mut grid_sight = GridSight::new();
    for id in grid_sight.initialize(&mut document) {
        let _ = grid_sight.affordances(&document, id);
    }
});
