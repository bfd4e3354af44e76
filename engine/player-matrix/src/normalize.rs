/// Canonicalize a display name into the key used to join sources.
///
/// Leading and trailing whitespace is dropped and every inner run of
/// whitespace collapses to one space. No other rewriting happens: suffixes,
/// punctuation and case are kept as the source wrote them.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
