/// Minimum Dice coefficient for a candidate to count as a match at all.
pub const MATCH_THRESHOLD: f64 = 0.4;

/// Fuzzy product-name matching errors. Ambiguity is an error, never a
/// silent pick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("No product matched '{0}'")]
    NoMatch(String),

    #[error("Multiple products matched '{0}' equally well")]
    MultipleMatches(String),
}

fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Sorensen-Dice coefficient over character bigram multisets,
/// case-insensitive. 1.0 for identical strings, 0.0 for no shared bigrams.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return 1.0;
    }

    let a_bigrams = bigrams(&a);
    let b_bigrams = bigrams(&b);
    if a_bigrams.is_empty() || b_bigrams.is_empty() {
        return 0.0;
    }
    let total = a_bigrams.len() + b_bigrams.len();

    let mut remaining = b_bigrams;
    let mut matches = 0usize;
    for bigram in &a_bigrams {
        if let Some(pos) = remaining.iter().position(|other| other == bigram) {
            remaining.swap_remove(pos);
            matches += 1;
        }
    }

    2.0 * matches as f64 / total as f64
}

/// Picks the candidate whose name best matches the query.
///
/// Errors when no candidate clears the threshold, or when the best score is
/// shared by more than one candidate.
pub fn find_best_match<'a, T>(
    query: &str,
    candidates: &'a [T],
    name_of: impl Fn(&T) -> &str,
) -> Result<&'a T, MatchError> {
    let scored: Vec<(f64, &T)> = candidates
        .iter()
        .map(|c| (dice_coefficient(query, name_of(c)), c))
        .collect();

    let best_score = scored
        .iter()
        .map(|(score, _)| *score)
        .fold(0.0_f64, f64::max);

    if best_score < MATCH_THRESHOLD {
        return Err(MatchError::NoMatch(query.to_string()));
    }

    let mut best: Vec<&T> = scored
        .iter()
        .filter(|(score, _)| (best_score - score).abs() < 1e-9)
        .map(|(_, c)| *c)
        .collect();

    match (best.len(), best.pop()) {
        (1, Some(winner)) => Ok(winner),
        _ => Err(MatchError::MultipleMatches(query.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(dice_coefficient("Red Shirt", "red shirt"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(dice_coefficient("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_match_picks_closest_candidate() {
        let candidates = vec![
            (101, "Blue Pants".to_string()),
            (102, "Red Shirt".to_string()),
        ];
        let winner = find_best_match("red shirt", &candidates, |c| &c.1)
            .expect("should match");
        assert_eq!(winner.0, 102);
    }

    #[test]
    fn test_tied_candidates_are_an_error() {
        let candidates = vec![
            (101, "Red Shirt".to_string()),
            (102, "Red Shirt".to_string()),
        ];
        assert_eq!(
            find_best_match("red shirt", &candidates, |c| &c.1),
            Err(MatchError::MultipleMatches("red shirt".to_string()))
        );
    }

    #[test]
    fn test_sub_threshold_is_no_match() {
        let candidates = vec![(101, "Espresso Machine".to_string())];
        assert_eq!(
            find_best_match("red shirt", &candidates, |c| &c.1),
            Err(MatchError::NoMatch("red shirt".to_string()))
        );
    }

    #[test]
    fn test_empty_candidate_list_is_no_match() {
        let candidates: Vec<(i64, String)> = Vec::new();
        assert!(matches!(
            find_best_match("anything", &candidates, |c| &c.1),
            Err(MatchError::NoMatch(_))
        ));
    }
}
