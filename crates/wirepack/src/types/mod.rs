pub mod bundle_output;

use std::sync::Arc;

use wirepack_common::NormalizedBundlerOptions;
use wirepack_resolver::Resolver;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedResolver<F> = Arc<Resolver<F>>;
