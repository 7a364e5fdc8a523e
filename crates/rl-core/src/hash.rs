use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `input`.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint of a weighted word list.
///
/// Entries are sorted by word before hashing so the digest does not depend on
/// map iteration order. Weights are rendered with four decimals.
pub fn weights_fingerprint<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut rows: Vec<(&str, f64)> = entries.into_iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    for (word, weight) in rows {
        hasher.update(word.as_bytes());
        hasher.update(b"\t");
        hasher.update(format!("{weight:.4}").as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_known_vector() {
        // SHA-256("") = e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        let digest = sha256_hex("");
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_ignores_order() {
        let a = weights_fingerprint(vec![("good", 1.9), ("bad", -2.5)]);
        let b = weights_fingerprint(vec![("bad", -2.5), ("good", 1.9)]);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_changes_with_weight() {
        let a = weights_fingerprint(vec![("boring", -1.3)]);
        let b = weights_fingerprint(vec![("boring", -3.0)]);
        assert_ne!(a, b);
    }
}
