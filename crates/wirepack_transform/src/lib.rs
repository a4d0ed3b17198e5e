mod pipeline;
mod transform;

pub use crate::pipeline::TransformPipeline;
pub use crate::transform::{JsonTransform, Transform, TransformRegistry};
