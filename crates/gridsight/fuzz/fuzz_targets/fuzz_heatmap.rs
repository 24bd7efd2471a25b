//! Fuzz target for heatmap layering.
//!
//! Applies an arbitrary sequence of toggles to a generated table, then
//! removes everything and checks the table is back to its original state.

#![no_main]

use arbitrary::Arbitrary;
use gridsight::{Document, HeatmapEngine, Table, Target};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Row(u8),
    Column(u8),
    Table,
}

#[derive(Debug, Arbitrary)]
struct Input {
    cells: Vec<Vec<String>>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.cells.len() > 32 || input.ops.len() > 64 {
        return;
    }

    let mut table = Table::new().with_head(["h"]);
    for row in input.cells.iter().take(32) {
        table = table.with_body_row(row.iter().take(16).cloned());
    }

    let mut document = Document::new();
    let id = document.append_table(table);
    let before = document.table(id).cloned();
    let mut engine = HeatmapEngine::new();

    for op in &input.ops {
        let target = match op {
            Op::Row(r) => Target::Row(*r as usize % 34),
            Op::Column(c) => Target::Column(*c as usize % 18),
            Op::Table => Target::Table,
        };
        let _ = engine.toggle_heatmap(&mut document, id, target);
    }

    engine.remove_heatmap(&mut document, id, None).unwrap();
    assert_eq!(document.table(id).cloned(), before);
});
