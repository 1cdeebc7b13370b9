//! Assessment report domain

mod entity;

pub use entity::{AssessmentReport, CareerMatch, CareerPaths, SalaryRange};
