use std::io;
use std::path::Path;
use tokenizers::Tokenizer;

/// Loads a tokenizer from an explicit `tokenizer.json` path.
pub fn load_tokenizer(tokenizer_path: &Path) -> io::Result<Tokenizer> {
    Tokenizer::from_file(tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer with truncation enabled for a maximum sequence length.
///
/// BERT encoders have a fixed maximum input length; answers exceeding
/// `max_len` tokens are truncated to fit.
pub fn load_tokenizer_with_truncation(
    tokenizer_path: &Path,
    max_len: usize,
) -> io::Result<Tokenizer> {
    use tokenizers::TruncationParams;

    let mut tokenizer = load_tokenizer(tokenizer_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}
