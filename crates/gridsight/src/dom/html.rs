//! Loading tables from HTML markup.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::table::{CellKind, ClassList, Section, Style, Table};

static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());

/// Extract every `<table>` in the markup, in document order.
///
/// Nested tables are returned as separate entries; their rows never leak
/// into the enclosing table.
pub fn parse_tables(markup: &str) -> Vec<Table> {
    let html = Html::parse_fragment(markup);
    html.select(&TABLE_SELECTOR).map(convert_table).collect()
}

fn convert_table(element: ElementRef<'_>) -> Table {
    let mut table = Table::new();

    for (name, value) in element.value().attrs() {
        if name == "class" {
            table.classes = ClassList::parse(value);
        } else {
            table.set_attribute(name, value);
        }
    }

    for child in element.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "thead" => push_row_group(&mut table, child, Section::Head),
            "tbody" => push_row_group(&mut table, child, Section::Body),
            "tfoot" => push_row_group(&mut table, child, Section::Foot),
            "tr" => push_row(&mut table, child, Section::Body),
            _ => {}
        }
    }

    table
}

fn push_row_group(table: &mut Table, group: ElementRef<'_>, section: Section) {
    for tr in group
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
    {
        push_row(table, tr, section);
    }
}

fn push_row(table: &mut Table, tr: ElementRef<'_>, section: Section) {
    let row = table.insert_row(section);

    for element in tr.children().filter_map(ElementRef::wrap) {
        let kind = match element.value().name() {
            "th" => CellKind::Header,
            "td" => CellKind::Data,
            _ => continue,
        };

        let text: String = element.text().collect();
        let cell = row.insert_cell(kind, text);

        for (name, value) in element.value().attrs() {
            match name {
                "class" => cell.classes = ClassList::parse(value),
                "style" => cell.style = Style::parse(value),
                _ => cell.set_attribute(name, value),
            }
        }
    }
}
