use xxhash_rust::xxh64::xxh64;

const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a u64 value as a base62 string (11 chars, zero-padded).
fn base62_encode(mut value: u64) -> String {
    if value == 0 {
        return "0".repeat(11);
    }
    let mut result = Vec::with_capacity(11);
    while value > 0 {
        let idx = (value % 62) as usize;
        result.push(BASE62_CHARS[idx]);
        value /= 62;
    }
    // Pad to 11 chars
    while result.len() < 11 {
        result.push(b'0');
    }
    result.reverse();
    String::from_utf8(result).expect("base62 chars are valid UTF-8")
}

/// Compute the fingerprint for an issue.
///
/// fingerprint = base62(xxhash64(code + file + line + target))
///
/// The fingerprint is stable across runs for the same finding, so it can be
/// used to deduplicate reports and to reference issues in suppression hints.
pub fn issue_fingerprint(code: &str, file: &str, line: u32, target: &str) -> String {
    let mut input = String::with_capacity(code.len() + file.len() + target.len() + 12);
    input.push_str(code);
    input.push('\0'); // separator
    input.push_str(file);
    input.push('\0'); // separator
    input.push_str(&line.to_string());
    input.push('\0'); // separator
    input.push_str(target);

    let hash_value = xxh64(input.as_bytes(), 0);
    base62_encode(hash_value)
}
