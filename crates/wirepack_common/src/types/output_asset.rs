/// A finished output file, fully constructed in memory before anything is
/// written to disk.
#[derive(Debug, Clone)]
pub struct OutputAsset {
  pub filename: String,
  pub content: String,
  /// Content hash, present when the output filename template asks for one.
  pub hash: Option<String>,
}
