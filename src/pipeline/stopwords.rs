use crate::models::Surgery;

/// Administrative procedure terms that never describe a surgery.
///
/// Matched case-insensitively as substrings of the procedure name.
const STOP_WORDS: &[&str] = &[
    "screen",
    "medication",
    "examination",
    "assess",
    "development",
    "notification",
    "clarification",
    "discussion ",
    "option",
    "review",
    "evaluation",
    "management",
    "consultation",
    "referral",
    "interpretation",
    "discharge",
    "certification",
    "preparation",
];

/// Does `haystack` contain any of `needles` as a substring?
pub fn contains_any(haystack: &str, needles: &[impl AsRef<str>]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_ref()))
}

/// Drop records whose lowercased name matches an administrative term.
/// Order-preserving.
pub fn stopword_filter(surgeries: Vec<Surgery>) -> Vec<Surgery> {
    surgeries
        .into_iter()
        .filter(|s| !contains_any(&s.name.to_lowercase(), STOP_WORDS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Surgery> {
        names.iter().map(|n| Surgery::new(*n)).collect()
    }

    #[test]
    fn removes_administrative_entries() {
        let input = named(&[
            "Mammography (procedure)",
            "Certification procedure (procedure)",
            "Transplant of kidney (procedure)",
        ]);
        let output = stopword_filter(input);
        let names: Vec<&str> = output.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Mammography (procedure)", "Transplant of kidney (procedure)"]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let output = stopword_filter(named(&["Depression SCREENING (procedure)"]));
        assert!(output.is_empty());
    }

    #[test]
    fn preserves_order_and_identity() {
        let input = named(&["Appendectomy", "Hip replacement", "Colonoscopy"]);
        let ids: Vec<_> = input.iter().map(|s| s.id).collect();
        let output = stopword_filter(input);
        assert_eq!(output.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(stopword_filter(Vec::new()).is_empty());
    }
}
