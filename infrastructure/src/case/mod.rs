//! Case file adapters for the [`CaseLoader`](tnm_application::CaseLoader) port.

mod json_loader;

pub use json_loader::JsonCaseLoader;
