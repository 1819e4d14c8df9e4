use crate::chart::DEFAULT_CHART_PATH;
use crate::persistence::DataFiles;
use std::path::PathBuf;

/// Runtime settings of a ledger session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub files: DataFiles,
    /// Where the status pie chart is written
    pub chart_path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            files: DataFiles::default(),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
        }
    }
}
