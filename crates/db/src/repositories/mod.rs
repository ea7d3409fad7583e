//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod health_center_repo;
pub mod lab_test_repo;
pub mod sample_repo;
pub mod sample_source_repo;

pub use health_center_repo::HealthCenterRepo;
pub use lab_test_repo::LabTestRepo;
pub use sample_repo::SampleRepo;
pub use sample_source_repo::SampleSourceRepo;
