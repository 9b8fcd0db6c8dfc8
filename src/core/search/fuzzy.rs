#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub index: usize,
    pub score: i32,
}

/// Ranks `candidates` against `query`, best first. Ties keep candidate order.
///
/// An empty query matches everything with score zero.
pub fn ranked_matches(query: &str, candidates: &[String]) -> Vec<FuzzyMatch> {
    let query = query.trim();
    let mut matches: Vec<FuzzyMatch> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            if query.is_empty() {
                return Some(FuzzyMatch { index, score: 0 });
            }
            let indices = match_indices(query, candidate)?;
            Some(FuzzyMatch {
                index,
                score: score_match(candidate, &indices),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    matches
}

pub fn ranked_matches_limited(query: &str, candidates: &[String], limit: usize) -> Vec<FuzzyMatch> {
    let mut matches = ranked_matches(query, candidates);
    matches.truncate(limit);
    matches
}

fn match_indices(query: &str, candidate: &str) -> Option<Vec<usize>> {
    let query_chars: Vec<char> = query.chars().map(|c| c.to_ascii_lowercase()).collect();
    let candidate_chars: Vec<char> = candidate.chars().map(|c| c.to_ascii_lowercase()).collect();

    // A contiguous hit beats scattered subsequence letters.
    if query_chars.len() <= candidate_chars.len() {
        let window = query_chars.len();
        if let Some(start) = candidate_chars
            .windows(window)
            .position(|slice| slice == query_chars.as_slice())
        {
            return Some((start..start + window).collect());
        }
    }

    let mut indices = Vec::with_capacity(query_chars.len());
    let mut remaining = query_chars.iter().peekable();
    for (pos, ch) in candidate_chars.iter().enumerate() {
        match remaining.peek() {
            Some(wanted) if *wanted == ch => {
                indices.push(pos);
                remaining.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    remaining.peek().is_none().then_some(indices)
}

fn score_match(candidate: &str, indices: &[usize]) -> i32 {
    let Some(&first) = indices.first() else {
        return 0;
    };
    let chars: Vec<char> = candidate.chars().collect();
    let mut score = indices.len() as i32 * 10;

    if first == 0 {
        score += 60;
    }

    for pair in indices.windows(2) {
        if pair[1] == pair[0] + 1 {
            score += 8;
        } else {
            score -= (pair[1] - pair[0] - 1) as i32 * 2;
        }
    }

    for &idx in indices {
        if idx > 0 && is_word_boundary(chars[idx - 1]) {
            score += 12;
        }
    }

    score - chars.len() as i32 / 2
}

fn is_word_boundary(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '-' | '.' | '\'' | ',')
}
