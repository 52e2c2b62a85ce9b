//! Terminal dashboard: table list with row counts, matching summary panel and a paginated,
//! column-configurable data grid.

pub mod app;
pub mod columns;
mod components;
pub mod format;
pub mod preferences;
pub mod state;

pub use app::run;
