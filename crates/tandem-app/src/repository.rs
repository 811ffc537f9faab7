//! Repository adapters for persistence layer

use std::path::PathBuf;

use tandem_infra::report::ReportGenerator;
use tandem_store::Store;
use tandem_types::Result;

use crate::config::Config;

/// Open the store configured for this installation
pub fn open_store(config: &Config) -> Result<Store> {
    let db_path = config.database_path()?;
    Store::open(db_path)
}

/// Open a store file at a custom location
pub fn open_store_at(db_path: PathBuf) -> Result<Store> {
    Store::open(db_path)
}

/// Document generator writing into the configured reports directory
pub fn open_report_generator(config: &Config) -> Result<ReportGenerator> {
    Ok(ReportGenerator::new(
        config.reports_dir()?,
        config.report_options(),
    ))
}
