//! Core of the laboratory result importer.
//!
//! Row types, the reference vocabulary cache, the fixed rule set and the
//! row validator. Storage is reached only through the collaborator traits
//! in [`validation::reference`] and [`validation::validator`].

pub mod error;
pub mod types;
pub mod validation;
