//! BLAKE3 content hashing for embedding memoization.

/// Hashes a text to a 32-byte key for the embedding cache.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_text_determinism() {
        let text = "Photosynthesis converts light energy into chemical energy.";

        let hash1 = hash_text(text);
        let hash2 = hash_text(text);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_text_uniqueness() {
        let texts = [
            "Photosynthesis converts light energy into chemical energy.",
            "photosynthesis converts light energy into chemical energy.",
            "Photosynthesis converts light energy into chemical energy. ",
            "Respiration releases chemical energy.",
        ];

        let hashes: Vec<_> = texts.iter().map(|t| hash_text(t)).collect();
        let unique: HashSet<_> = hashes.iter().collect();

        assert_eq!(unique.len(), texts.len());
    }

    #[test]
    fn test_hash_text_empty_string() {
        let hash = hash_text("");
        assert!(!hash.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_hash_text_unicode() {
        let hash = hash_text("la photosynthèse transforme l'énergie lumineuse");
        assert_eq!(hash.len(), 32);
    }
}
