pub mod cast;
pub mod config;
pub mod error;
pub mod mapping;
pub mod transforms;

pub use cast::{rewrite_filters, rewrite_sorts};
pub use config::{ColumnTarget, MappingConfig};
pub use error::MappingError;
pub use mapping::{CastMappingTable, CastMappingTableBuilder, ColumnMapping, ColumnMappingBuilder};
pub use transforms::ValueTransform;
