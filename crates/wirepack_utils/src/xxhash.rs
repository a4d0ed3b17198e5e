use xxhash_rust::xxh3::xxh3_64;

/// Content hash used for cache-busting `[hash]` substitution in output
/// filenames. Eight hex characters are plenty for that purpose.
pub fn xxhash_hex(input: &[u8]) -> String {
  let hash = xxh3_64(input);
  format!("{:08x}", hash >> 32)
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello").len(), 8);
  assert_eq!(xxhash_hex(b"hello"), xxhash_hex(b"hello"));
  assert_ne!(xxhash_hex(b"hello"), xxhash_hex(b"hello!"));
}
