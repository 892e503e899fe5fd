pub mod core;
pub mod shape;
pub mod transform;
