//! Data grid engine — sort, paginate, and select over any in-memory
//! dataset.
//!
//! The grid knows nothing about where its rows came from and cannot fail
//! at runtime: it consumes a flat `Vec` of rows plus a declarative column
//! schema and owns the view state (one sort column, current page,
//! selected ids). Dataset replacement clears the selection; sort and
//! page survive it.
//!
//! Key invariants:
//! - Sorting is stable: equal keys keep their input order
//! - Select-all is page-scoped, never dataset-scoped
//! - Selection changes are reported only on value change
//! - While loading, no interaction mutates view state

mod column;
mod grid;
mod value;

pub use column::Column;
pub use grid::{DataGrid, PageControl, RenderedRow, SortDirection, SortState};
pub use value::{CellValue, GridRow, RowId};
