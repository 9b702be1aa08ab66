pub mod shape;
pub mod validator;

pub use shape::{check_activity_document, check_metrics_document};
pub use validator::{validate, IntegrityCheck, IntegrityPolicy, ValidationResult, Violation};
