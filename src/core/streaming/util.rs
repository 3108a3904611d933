//! Small helpers shared by both wire-format translators.

use rand::Rng;

/// A token-count estimate of 4 characters per token (spec.md's explicit
/// non-goal: this is never "improved" to a real tokenizer).
pub fn estimate_tokens(text: &str) -> u64 {
    estimate_tokens_for_len(text.chars().count())
}

/// Same estimate, given a character count directly (e.g. summed across
/// several messages for `/v1/messages/count_tokens`).
pub fn estimate_tokens_for_len(char_count: usize) -> u64 {
    char_count.div_ceil(4) as u64
}

/// `n` random lowercase hex characters, for synthetic IDs like
/// `"chatcmpl-" ++ 24 hex` or `"msg_" ++ 24 hex`.
pub fn random_hex(n: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

/// Unix seconds, used for `created` timestamps in completion objects.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
