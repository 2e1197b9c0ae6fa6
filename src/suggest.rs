//! Turns provider labels into kebab-case filename suggestions.

/// Build up to 3 candidate filenames from an ordered label list.
///
/// Suggestion `i` joins the sliding window `labels[i..i+3]` (shorter near the
/// end of the list) with hyphens, lowercased and reduced to `[a-z0-9-]`, with
/// the extension appended. Labels that repeat produce repeated suggestions;
/// that is accepted rather than deduplicated.
pub fn suggestions_from_labels(labels: &[String], extension: &str) -> Vec<String> {
    let count = labels.len().min(3);
    (0..count)
        .map(|i| {
            let window = &labels[i..labels.len().min(i + 3)];
            let stem = kebab_case(&window.join("-"));
            format!("{}.{}", stem, extension)
        })
        .collect()
}

/// Lowercase and map every run of characters outside `[a-z0-9]` to a single
/// hyphen, trimming hyphens at the edges. The result is either empty or
/// matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
