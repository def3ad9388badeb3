//! Closest-match suggestion for unknown stems, by Levenshtein edit distance.
//!
//! Spec.md §4.1: "If no stem matches, the engine computes the closest known
//! stem by edit distance and returns it as `suggestion`."

/// Classic dynamic-programming Levenshtein distance over bytes, which is
/// sufficient here since every candidate stem is plain ASCII Latin.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<u8> = a.bytes().collect();
    let b: Vec<u8> = b.bytes().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;
            let substitution = prev_diag + cost;
            prev_diag = row[j + 1];
            row[j + 1] = deletion.min(insertion).min(substitution);
        }
    }

    row[b.len()]
}

/// Returns the candidate with the smallest edit distance to `word`, ties
/// broken by first occurrence in `candidates`.
pub fn closest<'a>(word: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (candidate, levenshtein(word, candidate)))
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(levenshtein("puella", "puella"), 0);
    }

    #[test]
    fn closest_picks_the_nearest_candidate() {
        let candidates = ["puell", "domin", "serv"];
        assert_eq!(closest("puela", candidates).as_deref(), Some("puell"));
    }

    #[test]
    fn empty_candidate_list_yields_no_suggestion() {
        assert_eq!(closest("puela", std::iter::empty()), None);
    }
}
