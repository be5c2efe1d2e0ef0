//! Use cases (application services)

pub mod stage_batch;
pub mod stage_case;
