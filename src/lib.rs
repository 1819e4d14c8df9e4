pub mod chart;
pub mod config;
pub mod console;
pub mod error;
pub mod field_parsers;
pub mod formatters;
pub mod models;
pub mod persistence;
pub mod stats;
pub mod store;

// Re-export commonly used items
pub use chart::render_status_pie;
pub use config::LedgerConfig;
pub use console::Shell;
pub use error::{ChartError, LedgerError, LedgerResult, PersistenceError, ValidationError};
pub use models::{derive_status, derive_stock_value, Product, ProductStatus};
pub use persistence::{load, save, save_on_exit, DataFiles, LoadOutcome, LoadSource, StorageFormat};
pub use stats::{compute_status_counts, StatusCounts};
pub use store::{Inventory, SortCriterion};
