#![warn(clippy::pedantic)]

pub mod buffer;
pub mod step;

pub use buffer::IoBuffer;
pub use step::{StepDecode, StepError, StepStatus};
