//! Declarative column schema.

use crate::value::GridRow;

/// Per-column rendering override.
type RenderFn<R> = Box<dyn Fn(&R) -> String + Send + Sync>;

/// A column descriptor, immutable for the lifetime of a grid instance.
///
/// `key` addresses the row's field through [`GridRow::cell`]; `render`
/// optionally replaces the default cell formatting with an arbitrary
/// row-to-string projection (the render-prop pattern, made explicit).
pub struct Column<R> {
    key: String,
    label: String,
    sortable: bool,
    render: Option<RenderFn<R>>,
}

impl<R: GridRow> Column<R> {
    /// A sortable column with default rendering.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), sortable: true, render: None }
    }

    /// Opt this column out of sorting.
    pub fn not_sortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Replace default rendering with a custom projection.
    pub fn with_render(mut self, f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Box::new(f));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sortable(&self) -> bool {
        self.sortable
    }

    /// Presentation for one cell: the custom projection when set,
    /// otherwise the raw field value formatted.
    pub fn display(&self, row: &R) -> String {
        match &self.render {
            Some(f) => f(row),
            None => row.cell(&self.key).to_string(),
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("render", &self.render.is_some())
            .finish()
    }
}
