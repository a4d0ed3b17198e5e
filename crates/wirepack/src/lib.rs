mod bundler;
mod emit_stage;
mod graph_stage;
mod html_stage;
mod types;
mod utils;

pub use crate::bundler::Bundler;
pub use crate::types::bundle_output::BundleOutput;

pub use wirepack_common::*;
pub use wirepack_error::{BuildError, BuildErrorKind, BuildResult};
pub use wirepack_fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use wirepack_transform::{Transform, TransformRegistry};
