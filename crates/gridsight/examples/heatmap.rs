//! Example: detect column types and layer heatmaps on a sales table.
//!
//! Usage:
//!   cargo run --example heatmap

use gridsight::enrich::format_statistics;
use gridsight::{CellPos, Document, GridSight, ListenerScope, Target};

const PAGE: &str = r#"
<table id="sales">
  <thead>
    <tr><th>Product</th><th>Q1</th><th>Q2</th><th>Q3</th><th>Region</th></tr>
  </thead>
  <tbody>
    <tr><td>Widget A</td><td>$1,200</td><td>$1,450</td><td>$990</td><td>North</td></tr>
    <tr><td>Widget B</td><td>$860</td><td>$1,020</td><td>$1,310</td><td>South</td></tr>
    <tr><td>Widget C</td><td>$2,040</td><td>$1,870</td><td>$2,210</td><td>East</td></tr>
    <tr><td>Widget D</td><td>$450</td><td>$610</td><td>$580</td><td>North</td></tr>
  </tbody>
</table>
"#;

fn main() -> gridsight::Result<()> {
    let mut document = Document::parse_html(PAGE);
    document.add_event_listener(ListenerScope::Document, |event| {
        println!("  event: {}", event.name());
    });

    let mut grid_sight = GridSight::new();
    let tables = grid_sight.initialize(&mut document);

    let separator = "=".repeat(60);
    for &id in &tables {
        println!("{}", separator);
        println!("Table {}", id);
        println!("{}", separator);

        if let Some(analysis) = grid_sight.analysis(id) {
            for (col, column_type) in analysis.column_types.iter().enumerate() {
                println!("  column {}: {}", col, column_type);
            }
            println!("  suitable: {}", analysis.is_suitable);
        }

        println!("\nMenus:");
        for affordance in grid_sight.affordances(&document, id)? {
            let names: Vec<&str> = affordance.enrichments.iter().map(|e| e.as_str()).collect();
            println!("  {}: {}", affordance.target, names.join(", "));
        }

        println!("\nActivating and layering heatmaps:");
        grid_sight.activate(&mut document, id)?;
        grid_sight.toggle_heatmap(&mut document, id, Target::Column(2))?;
        grid_sight.toggle_heatmap(&mut document, id, Target::Row(3))?;

        if let Some(table) = document.table(id) {
            println!("\nCell styles:");
            for row in 1..table.row_count() {
                for col in 1..=3 {
                    if let Some(cell) = table.cell(CellPos::new(row, col)) {
                        println!(
                            "  ({}, {}) {:>8}  {}",
                            row,
                            col,
                            cell.trimmed_text(),
                            cell.style.css_text()
                        );
                    }
                }
            }
        }

        println!("\nQ3 statistics:");
        let stats = grid_sight.statistics(&document, id, Target::Column(3))?;
        for line in format_statistics(&stats).lines() {
            println!("  {}", line);
        }

        if let Some(entries) = grid_sight.toggle_frequency(&mut document, id, Target::Column(4))? {
            println!("\nRegion frequencies:");
            for entry in entries {
                println!("  {:<8} {:>3} {:>5.1}%", entry.value, entry.count, entry.percent);
            }
        }

        grid_sight.clear_enrichments(&mut document, id)?;
    }

    Ok(())
}
