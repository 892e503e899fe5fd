pub mod batch;
pub mod error;
pub mod filter;
pub mod query;
pub mod sort;

pub use batch::filter_in_batches;
pub use error::{BuildError, Cancelled};
pub use filter::{Predicate, build_predicate, build_predicate_str};
pub use query::CompiledQuery;
pub use sort::{Comparator, build_comparator, build_comparator_str};
