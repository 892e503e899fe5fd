//! Textual grammar and data model for filter and sort criteria.
//!
//! ```text
//! status:eq(active),or(age:lt(18),age:gt(65)),name:John
//! salary:desc,name:asc
//! ```

pub mod ast;
pub mod builder;
pub mod errors;
pub mod escape;
pub mod split;

pub use ast::{
    collection::{FilterCollection, FilterCollectionBuilder, SortCollection, SortCollectionBuilder},
    criterion::{Combinator, Condition, FilterCriterion, Group},
    literal::Literal,
    operator::{Arity, Operator},
    path::ColumnPath,
    sort::{SortCriterion, SortDirection},
};
pub use builder::{ParseOptions, parse_filters, parse_filters_with, parse_sorts, parse_sorts_with};
pub use errors::SyntaxError;
