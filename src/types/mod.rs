pub mod error;
pub mod record;
pub mod unit;

pub use error::{DocgenError, ErrorCategory, ErrorClassifier, LlmError, Result};
pub use record::{
    ClassRecord, ComplexityMetrics, FunctionRecord, ImportKind, ImportRecord, MethodSummary,
};
pub use unit::{GenerationRequest, GenerationResult, UnitId, UnitKind};
