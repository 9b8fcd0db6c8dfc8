use crate::core::search::fuzzy::FuzzyMatch;

/// Best completion for `query`: the top match, but only when it extends the
/// typed text as a case-insensitive prefix.
pub fn suggest(query: &str, matches: &[FuzzyMatch], candidates: &[String]) -> Option<String> {
    if query.trim().is_empty() {
        return None;
    }

    let query = query.to_lowercase();
    matches
        .iter()
        .filter_map(|entry| candidates.get(entry.index))
        .find(|candidate| candidate.to_lowercase().starts_with(&query))
        .cloned()
}

/// Characters still to be typed for `query` to become `completion`.
///
/// The typed part is compared char by char, so case folding cannot shift
/// where the suffix starts.
pub fn completion_suffix(completion: &str, query: &str) -> Option<String> {
    let mut rest = completion.chars();
    for typed in query.chars() {
        let next = rest.next()?;
        if !chars_match(next, typed) {
            return None;
        }
    }
    let suffix: String = rest.collect();
    (!suffix.is_empty()).then_some(suffix)
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
