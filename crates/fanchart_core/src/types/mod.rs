//! Identity and calendar types shared across the workspace.

mod error;
mod ids;
mod quarters;

pub use error::{CoreError, QuarterError};
pub use ids::{CondType, InputType, OutputVar, Product, VariableClass};
pub use quarters::Quarter;
