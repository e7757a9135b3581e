pub mod config;
pub mod error;
pub mod flowchart;
pub mod providers;


pub use config::*;
pub use error::*;
pub use flowchart::FlowchartGenerator;
pub use providers::ChatProvider;
