//! Closest-match name suggestions for misspelled field and enum value names.

/// Collect the declared names closest to `input`, best match first.
///
/// A candidate qualifies when its edit distance to `input` stays within a
/// threshold proportional to the input length, so short names do not match
/// wildly different short names.
pub(crate) fn suggestion_list<'a>(
    input: &str,
    options: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let threshold = input.len() * 2 / 5 + 1;
    let mut scored: Vec<(usize, String)> = options
        .filter_map(|option| {
            let distance = edit_distance(input, option);
            let limit = threshold.max(option.len() * 2 / 5 + 1);
            (distance <= limit).then(|| (distance, option.to_string()))
        })
        .collect();
    scored.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.cmp(b)));
    scored.into_iter().map(|(_, option)| option).collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    // A case-only mismatch is one edit no matter how long the name, so
    // `NEWHOPE` still suggests `newhope`.
    if a.eq_ignore_ascii_case(b) && a != b {
        return 1;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("same", "same"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("FOO", "foo"), 1);
    }

    #[test]
    fn suggests_close_names_only() {
        let options = ["x", "y", "horizontal", "vertical"];
        assert_eq!(
            suggestion_list("z", options.iter().copied()),
            vec!["x".to_string(), "y".to_string()]
        );
        assert_eq!(
            suggestion_list("horizntal", options.iter().copied()),
            vec!["horizontal".to_string()]
        );
        assert!(suggestion_list("unrelated_name", ["x", "y"].iter().copied()).is_empty());
    }

    #[test]
    fn best_match_first() {
        let options = ["newhope", "newhopes", "jedi"];
        let suggestions = suggestion_list("newhope", options.iter().copied());
        assert_eq!(suggestions.first().map(String::as_str), Some("newhope"));
    }
}
