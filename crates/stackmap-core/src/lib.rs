pub mod analyze;
pub mod cost;
pub mod error;
pub mod rules;
pub mod stack;
pub mod summary;
pub mod tool;

pub use analyze::analyze_stack;
pub use error::StackmapError;
pub use summary::{summarize, StackSummary};
pub use tool::{Action, AnalyzedItem, CostInfo, CostMap, CostSource, ToolInput};
