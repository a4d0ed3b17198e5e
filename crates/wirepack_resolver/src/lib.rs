// Maps import specifiers to absolute file paths by trying the configured
// extension list, with an index-file fallback for directory imports.

mod resolver;

pub use crate::resolver::{Resolution, Resolver};
