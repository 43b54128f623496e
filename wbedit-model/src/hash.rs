use sha2::{Digest, Sha256};

/// Hex SHA-256 over a sequence of canonical parts, each length-prefixed so
/// adjacent parts cannot run together.
pub(crate) fn content_hash<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
