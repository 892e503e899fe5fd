//! Canonical serialization and collection-level behaviour.

mod collections;
mod round_trip;
