pub mod documents;
pub mod http;

pub use documents::DocumentStore;
pub use http::{ApiState, ErrorResponse};
