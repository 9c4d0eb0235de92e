//! Scan filter compiler for widecol
//!
//! Callers describe what a scan should keep with a [`FilterSpec`] tree;
//! [`FilterCompiler`] validates it into a [`ScanFilter`] that the backend
//! applies on its scan path.
//!
//! # Retention rules
//!
//! 1. Row-level filters keep or drop whole rows; a kept row is returned
//!    with all of its families and qualifiers
//! 2. Cell-level filters keep or drop individual cells
//! 3. `All` keeps a cell only if every child keeps it
//! 4. `Any` keeps a cell if some child keeps it
//! 5. A row left with no cells is not returned

mod compiler;
mod scan_filter;
mod spec;

pub use compiler::FilterCompiler;
pub use scan_filter::ScanFilter;
pub use spec::FilterSpec;
