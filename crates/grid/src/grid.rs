//! The grid engine: view state over an arbitrary dataset.
//!
//! View state is private to the grid; all cross-component influence goes
//! through the methods here. The dataset itself is never reordered —
//! sorting produces an index permutation per render, so the input order
//! stays available as the tiebreaker for equal keys.

use std::collections::BTreeSet;

use crate::column::Column;
use crate::value::{CellValue, GridRow, RowId};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Current sort state: one column at most.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// One entry of the pagination control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Page(u32),
    Ellipsis,
}

/// One body row as presented: display cells plus selection state.
/// Placeholder rows (loading) carry no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: Option<RowId>,
    pub selected: bool,
    pub cells: Vec<String>,
}

type SelectionListener = Box<dyn FnMut(&[RowId]) + Send>;

/// Dataset-agnostic table engine: sorted, paginated, optionally
/// selectable, entirely in-memory.
pub struct DataGrid<R: GridRow> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    page_size: usize,
    selectable: bool,
    loading: bool,

    current_page: u32,
    sort: Option<SortState>,
    selected: BTreeSet<RowId>,
    last_reported: BTreeSet<RowId>,
    on_selection_change: Option<SelectionListener>,
    on_row_click: Option<Box<dyn FnMut(&R) + Send>>,
}

impl<R: GridRow> DataGrid<R> {
    pub fn new(columns: Vec<Column<R>>, page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            columns,
            page_size: page_size.max(1),
            selectable: false,
            loading: false,
            current_page: 1,
            sort: None,
            selected: BTreeSet::new(),
            last_reported: BTreeSet::new(),
            on_selection_change: None,
            on_row_click: None,
        }
    }

    /// Enable row selection.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Register the selection listener. It fires only when the selected
    /// id set's value actually changes.
    pub fn set_selection_listener(&mut self, f: impl FnMut(&[RowId]) + Send + 'static) {
        self.on_selection_change = Some(Box::new(f));
    }

    /// Register the row-click listener.
    pub fn set_row_click_listener(&mut self, f: impl FnMut(&R) + Send + 'static) {
        self.on_row_click = Some(Box::new(f));
    }

    // ── Dataset ─────────────────────────────────────────────────────

    /// Replace the dataset. The selection is always cleared — even when
    /// the new rows equal the old ones — so no selected id can outlive
    /// the rows it referred to. Sort and current page are preserved.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.selected.clear();
        self.report_selection();
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// While loading, interactions are inert and the body renders
    /// placeholder rows. The dataset and view state are untouched.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ── Sorting ─────────────────────────────────────────────────────

    /// Sort on a column: a repeat click on the currently-ascending
    /// column flips to descending; any other sortable column starts
    /// ascending. Non-sortable or unknown keys are ignored.
    pub fn sort_on(&mut self, key: &str) {
        if self.loading {
            return;
        }
        let Some(col) = self.columns.iter().find(|c| c.key() == key) else {
            return;
        };
        if !col.sortable() {
            return;
        }

        let direction = match &self.sort {
            Some(s) if s.key == key && s.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortState { key: key.to_string(), direction });
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    // ── Pagination ──────────────────────────────────────────────────

    pub fn total_pages(&self) -> u32 {
        self.rows.len().div_ceil(self.page_size) as u32
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to a page, clamped to the valid range. Pages beyond the end
    /// are not reachable, mirroring disabled navigation controls.
    pub fn go_to_page(&mut self, page: u32) {
        if self.loading {
            return;
        }
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        let next = self.current_page.saturating_add(1);
        self.go_to_page(next);
    }

    pub fn prev_page(&mut self) {
        let prev = self.current_page.saturating_sub(1).max(1);
        self.go_to_page(prev);
    }

    /// Page control strip: always page 1 and the last page, the ±1
    /// neighborhood of the current page, and ellipsis markers for gaps.
    /// A single page (or none) renders as just `[1]`.
    pub fn page_controls(&self) -> Vec<PageControl> {
        let total = self.total_pages();
        if total <= 1 {
            return vec![PageControl::Page(1)];
        }

        let current = self.current_page;
        let mut pages = vec![1u32];
        let lo = current.saturating_sub(1).max(2);
        let hi = (current + 1).min(total - 1);
        for p in lo..=hi {
            pages.push(p);
        }
        pages.push(total);

        let mut controls = Vec::new();
        let mut prev = 0u32;
        for page in pages {
            if page - prev > 1 {
                controls.push(PageControl::Ellipsis);
            }
            controls.push(PageControl::Page(page));
            prev = page;
        }
        controls
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Toggle one row's selection by id.
    pub fn toggle_row(&mut self, id: RowId) {
        if self.loading || !self.selectable {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.report_selection();
    }

    /// Select exactly the rows visible on the current rendered page, or
    /// clear the selection when every visible row is already selected.
    /// The toggle checks id containment, not counts, so a selection
    /// carried over from another page of the same size replaces rather
    /// than clears.
    pub fn select_all(&mut self) {
        if self.loading || !self.selectable {
            return;
        }
        let page_ids = self.current_page_ids();
        let page_fully_selected =
            !page_ids.is_empty() && page_ids.iter().all(|id| self.selected.contains(id));
        if page_fully_selected {
            self.selected.clear();
        } else {
            self.selected = page_ids.into_iter().collect();
        }
        self.report_selection();
    }

    /// Page-scoped "all selected" indicator: the selection count equals
    /// the current page's visible row count. Computed on demand so sort
    /// and page changes are reflected without clearing the selection.
    pub fn all_selected(&self) -> bool {
        let page_len = self.current_page_indices().len();
        page_len > 0 && self.selected.len() == page_len
    }

    /// Currently selected ids, ascending.
    pub fn selection(&self) -> Vec<RowId> {
        self.selected.iter().copied().collect()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    fn report_selection(&mut self) {
        if self.selected == self.last_reported {
            return;
        }
        self.last_reported = self.selected.clone();
        let ids: Vec<RowId> = self.selected.iter().copied().collect();
        if let Some(listener) = self.on_selection_change.as_mut() {
            listener(&ids);
        }
    }

    /// Report a click on the nth visible row of the current page.
    /// Inert while loading or when the index is past the page's rows.
    pub fn click_row(&mut self, index: usize) {
        if self.loading {
            return;
        }
        let Some(&row_idx) = self.current_page_indices().get(index) else {
            return;
        };
        if let Some(listener) = self.on_row_click.as_mut() {
            listener(&self.rows[row_idx]);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// The current page's rows in sorted order.
    pub fn current_page_rows(&self) -> Vec<&R> {
        self.current_page_indices().into_iter().map(|i| &self.rows[i]).collect()
    }

    /// Body rows as presented. While loading this is `page_size`
    /// placeholder rows with the configured column count.
    pub fn render_page(&self) -> Vec<RenderedRow> {
        if self.loading {
            return (0..self.page_size)
                .map(|_| RenderedRow {
                    id: None,
                    selected: false,
                    cells: vec![String::new(); self.columns.len()],
                })
                .collect();
        }

        self.current_page_indices()
            .into_iter()
            .map(|i| {
                let row = &self.rows[i];
                RenderedRow {
                    id: Some(row.id()),
                    selected: self.selected.contains(&row.id()),
                    cells: self.columns.iter().map(|c| c.display(row)).collect(),
                }
            })
            .collect()
    }

    /// "Showing X to Y of Z entries" for the current view.
    pub fn summary(&self) -> String {
        let len = self.rows.len();
        let page = self.current_page as usize;
        let first = ((page - 1) * self.page_size + 1).min(len);
        let last = (page * self.page_size).min(len);
        format!("Showing {} to {} of {} entries", first, last, len)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Sorted view order as an index permutation over `rows`. The sort
    /// is stable, so equal keys keep their relative input order in both
    /// directions.
    fn sorted_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        if let Some(sort) = &self.sort {
            let keys: Vec<CellValue> = self.rows.iter().map(|r| r.cell(&sort.key)).collect();
            match sort.direction {
                SortDirection::Ascending => order.sort_by(|&a, &b| keys[a].cmp(&keys[b])),
                SortDirection::Descending => order.sort_by(|&a, &b| keys[b].cmp(&keys[a])),
            }
        }
        order
    }

    /// Row indices of the current page, in view order. A current page
    /// past the end of the dataset yields an empty slice.
    fn current_page_indices(&self) -> Vec<usize> {
        let order = self.sorted_indices();
        let start = (self.current_page as usize - 1) * self.page_size;
        if start >= order.len() {
            return Vec::new();
        }
        let end = (start + self.page_size).min(order.len());
        order[start..end].to_vec()
    }

    fn current_page_ids(&self) -> Vec<RowId> {
        self.current_page_indices().into_iter().map(|i| self.rows[i].id()).collect()
    }
}
