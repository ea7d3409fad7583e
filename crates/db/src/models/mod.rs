//! Domain model structs and DTOs.
//!
//! Each submodule contains `FromRow` + `Serialize` entity structs matching
//! database rows, plus `Deserialize` create DTOs for inserts.

pub mod reference;
pub mod sample;
