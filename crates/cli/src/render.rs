//! Item rows and text-table rendering for the grid.

use curio_grid::{CellValue, Column, DataGrid, GridRow, PageControl, RowId};
use curio_model::Item;

/// An [`Item`] adapted to the grid's row abstraction.
pub struct ItemRow(pub Item);

impl GridRow for ItemRow {
    fn id(&self) -> RowId {
        self.0.id
    }

    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => CellValue::Int(self.0.id),
            "title" => CellValue::from(self.0.title.as_str()),
            "description" => CellValue::opt(self.0.description.as_deref()),
            "owner_id" => CellValue::Int(self.0.owner_id),
            "created_at" => CellValue::from(self.0.created_at),
            "updated_at" => CellValue::opt(self.0.updated_at),
            _ => CellValue::Empty,
        }
    }
}

/// Standard column set for item listings.
pub fn item_columns() -> Vec<Column<ItemRow>> {
    vec![
        Column::new("id", "ID"),
        Column::new("title", "Title"),
        Column::new("description", "Description")
            .not_sortable()
            .with_render(|r: &ItemRow| truncate(r.0.description.as_deref().unwrap_or(""), 40)),
        Column::new("owner_id", "Owner"),
        Column::new("created_at", "Created"),
    ]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Print the grid's current page as an aligned text table, followed by
/// the summary line and (when there are multiple pages) the page strip.
pub fn print_table(grid: &DataGrid<ItemRow>) {
    let headers: Vec<String> = grid.columns().iter().map(|c| c.label().to_string()).collect();
    let body = grid.render_page();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line);
    println!("{}", "-".repeat(header_line.chars().count()));

    if body.is_empty() {
        println!("No data available");
    }
    for row in &body {
        let line = row
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }

    println!();
    println!("{}", grid.summary());
    if grid.total_pages() > 1 {
        println!("{}", page_strip(grid));
    }
}

/// Page controls as a one-line strip, e.g. `1 … 4 [5] 6 … 10`.
fn page_strip(grid: &DataGrid<ItemRow>) -> String {
    grid.page_controls()
        .iter()
        .map(|control| match control {
            PageControl::Ellipsis => "…".to_string(),
            PageControl::Page(p) if *p == grid.current_page() => format!("[{}]", p),
            PageControl::Page(p) => p.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print one item in long form.
pub fn print_item(item: &Item) {
    println!("ID:          {}", item.id);
    println!("Title:       {}", item.title);
    if let Some(description) = &item.description {
        println!("Description: {}", description);
    }
    println!("Owner:       {}", item.owner_id);
    println!("Created:     {}", item.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(updated) = item.updated_at {
        println!("Updated:     {}", updated.format("%Y-%m-%d %H:%M"));
    }
}
