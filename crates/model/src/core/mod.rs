pub mod coercion;
pub mod kind;
pub mod value;
