use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a compiled predicate.
///
/// Identity fields:
/// - unknown collection (e.g. `data.users`)
/// - the where clause text
pub fn fingerprint_for_predicate(unknown: &str, where_sql: &str) -> String {
    let canonical = [unknown, where_sql].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
