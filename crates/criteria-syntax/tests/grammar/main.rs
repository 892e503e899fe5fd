//! Grammar-level tests: how criterion text maps onto the AST.

mod errors;
mod filters;
mod sorts;
