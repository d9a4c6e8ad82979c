// Profanity matching against the admin-managed filter list.
//
// Matching is whole-word and case-insensitive: "hell" matches "Hell no" but
// not "hello". Multi-word filters must appear as a contiguous run of words.

use super::moderation_models::{ProfanityFilter, Severity};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfanityHit {
    pub found_word: String,
    pub severity: Severity,
    pub auto_delete: bool,
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn contains_phrase(haystack: &[String], phrase: &[String]) -> bool {
    if phrase.is_empty() || phrase.len() > haystack.len() {
        return false;
    }
    haystack.windows(phrase.len()).any(|window| window == phrase)
}

/// Find the worst filter that matches `text`.
///
/// Highest severity wins; among equal severities an auto-delete filter wins.
pub fn find_profanity(text: &str, filters: &[ProfanityFilter]) -> Option<ProfanityHit> {
    let message_words = words(text);
    if message_words.is_empty() {
        return None;
    }

    filters
        .iter()
        .filter(|f| contains_phrase(&message_words, &words(&f.word_or_phrase)))
        .max_by_key(|f| (f.severity, f.auto_delete))
        .map(|f| ProfanityHit {
            found_word: f.word_or_phrase.clone(),
            severity: f.severity,
            auto_delete: f.auto_delete,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn filter(id: i64, word: &str, severity: Severity, auto_delete: bool) -> ProfanityFilter {
        ProfanityFilter {
            id,
            word_or_phrase: word.to_string(),
            severity,
            auto_delete,
            added_by_admin_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_clean_message_has_no_hit() {
        let filters = vec![filter(1, "darn", Severity::Low, false)];
        assert_eq!(find_profanity("Great game tonight, Owls!", &filters), None);
    }

    #[test]
    fn test_matching_is_whole_word_and_case_insensitive() {
        let filters = vec![filter(1, "hell", Severity::Low, false)];
        assert!(find_profanity("Hello everyone", &filters).is_none());

        let hit = find_profanity("What the HELL was that call?!", &filters).unwrap();
        assert_eq!(hit.found_word, "hell");
        assert_eq!(hit.severity, Severity::Low);
    }

    #[test]
    fn test_phrases_must_be_contiguous() {
        let filters = vec![filter(1, "trash team", Severity::Medium, false)];
        assert!(find_profanity("team is not trash", &filters).is_none());
        assert!(find_profanity("what a Trash   team", &filters).is_some());
    }

    #[test]
    fn test_worst_severity_wins() {
        let filters = vec![
            filter(1, "darn", Severity::Low, false),
            filter(2, "slur", Severity::High, true),
            filter(3, "bad", Severity::Medium, false),
        ];
        let hit = find_profanity("darn bad slur", &filters).unwrap();
        assert_eq!(hit.found_word, "slur");
        assert!(hit.auto_delete);
    }

    #[test]
    fn test_auto_delete_breaks_severity_ties() {
        let filters = vec![
            filter(1, "alpha", Severity::High, true),
            filter(2, "beta", Severity::High, false),
        ];
        let hit = find_profanity("beta alpha", &filters).unwrap();
        assert_eq!(hit.found_word, "alpha");
    }
}
