//! Getting files into the pipeline and tables out of them.
//!
//! - **router**: copy uploaded files into the folder layout by extension
//! - **extract**: CSV/JSON to a table with snake_case, flattened columns
//! - **records**: JSON document shapes and per-column dtype inference
//! - **discovery**: listing data files in pipeline directories
//! - **config**: the folder layout itself

pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod naming;
pub mod reader;
pub mod records;
pub mod router;

pub use config::PipelineConfig;
pub use discovery::{list_data_files, walk_files};
pub use error::{IngestError, Result};
pub use extract::{SourceTable, extract_file, load_file};
pub use naming::{flatten_record, to_snake_case};
pub use reader::read_csv_table;
pub use records::{Record, aligned_records, first_value_kinds, json_records, records_to_frame};
pub use router::{
    BatchStatus, ROUTER_LOG_HEADER, RouteKind, RouteOutcome, RouteStatus, RouteSummary, Router,
    RouterConfig,
};
