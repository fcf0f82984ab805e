mod variant;
mod request;
mod window;
mod summary;
mod error;

pub use variant::Variant;
pub use request::{RequestId, RequestRecord};
pub use window::{WindowAssignment, WindowMetric};
pub use summary::ExperimentSummary;
pub use error::{SwitchbackError, Result};
