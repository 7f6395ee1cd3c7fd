/// Strip a leading `http://` or `https://` from `url`.
///
/// Matching is purely positional: anything starting with `https` loses its first eight characters
/// and anything starting with `http` loses its first seven. No validation happens here, so a
/// malformed prefix such as `http:/x` is sliced all the same.
pub fn strip_schema(url: &str) -> &str {
    if url.starts_with("https") {
        skip_chars(url, 8)
    } else if url.starts_with("http") {
        skip_chars(url, 7)
    } else {
        url
    }
}

/// `s` without its first `n` characters; empty if it is shorter than that.
fn skip_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map(|(i, _)| &s[i..]).unwrap_or("")
}
