pub mod collection;
pub mod criterion;
pub mod literal;
pub mod operator;
pub mod path;
pub mod sort;
