pub mod error;
pub mod workbook;

pub use error::ExportError;
pub use workbook::{export_products, ExportSummary};
