// Dot/bracket path lookup over parsed JSON.

use serde_json::Value;

/// Resolve a field path against a JSON value.
///
/// Paths are dot-separated object keys; a segment may carry one numeric
/// index, as in `data.rates[1].usd`. The empty path returns `value`
/// itself. Missing keys, out-of-range indexes, and lookups into
/// non-containers all resolve to `None` -- absence, not an error.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = match parse_indexed(segment) {
            Some((key, index)) => current.get(key)?.get(index)?,
            None => current.get(segment)?,
        };
    }
    Some(current)
}

/// Split a `key[index]` segment into its parts.
///
/// Returns `None` for bare keys and for segments that merely resemble the
/// form (unclosed bracket, non-numeric index) -- those are looked up as
/// literal keys.
fn parse_indexed(segment: &str) -> Option<(&str, usize)> {
    let open = segment.find('[')?;
    let key = segment.get(..open)?;
    let index = segment
        .get(open + 1..)?
        .strip_suffix(']')?
        .parse::<usize>()
        .ok()?;
    Some((key, index))
}
