//! Keyword extraction from OCR text.
//!
//! Deliberately simple: tokenise on word boundaries, lowercase, drop a fixed
//! stopword set and anything two characters or shorter, dedup, cap at 20.
//! No language model is wired in, so the entity list is always empty — the
//! field exists because every store schema carries it.
//!
//! The pass is a pure function of its input: running it twice on the same
//! text yields the same keyword set.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Maximum number of keywords kept per document.
const MAX_KEYWORDS: usize = 20;

/// Tokens dropped regardless of frequency.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "will", "with", "this", "but",
        "not", "have",
    ]
    .into_iter()
    .collect()
});

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Extract `(entities, keywords)` from arbitrary text.
///
/// Keywords are lowercase tokens longer than two characters that are not in
/// the stopword set, deduplicated in first-seen order and truncated to 20.
/// Entities are always empty (no NER model is integrated). Empty or
/// whitespace-only input yields two empty lists.
pub fn extract_entities_and_keywords(text: &str) -> (Vec<String>, Vec<String>) {
    if text.trim().is_empty() {
        return (Vec::new(), Vec::new());
    }

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for m in RE_WORD.find_iter(&text.to_lowercase()) {
        let word = m.as_str();
        if word.chars().count() <= 2 || STOPWORDS.contains(word) {
            continue;
        }
        if seen.insert(word.to_string()) {
            keywords.push(word.to_string());
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
        }
    }

    (Vec::new(), keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_lists() {
        let (entities, keywords) = extract_entities_and_keywords("");
        assert!(entities.is_empty());
        assert!(keywords.is_empty());
    }

    #[test]
    fn whitespace_only_yields_empty_lists() {
        let (entities, keywords) = extract_entities_and_keywords("  \n\t  ");
        assert!(entities.is_empty());
        assert!(keywords.is_empty());
    }

    #[test]
    fn stopwords_and_short_tokens_dropped() {
        let (_, keywords) =
            extract_entities_and_keywords("The cat sat on an ox at noon with purpose");
        assert!(keywords.contains(&"cat".to_string()));
        assert!(keywords.contains(&"sat".to_string()));
        assert!(keywords.contains(&"noon".to_string()));
        assert!(keywords.contains(&"purpose".to_string()));
        // "the", "on", "an", "at", "with" are stopwords; "ox" is too short
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"ox".to_string()));
    }

    #[test]
    fn short_tokens_measured_in_characters_not_bytes() {
        // "né" is two characters but three bytes; it must be dropped like
        // any other two-character token.
        let (_, keywords) = extract_entities_and_keywords("né stands alone");
        assert!(!keywords.contains(&"né".to_string()));
        assert!(keywords.contains(&"stands".to_string()));
        assert!(keywords.contains(&"alone".to_string()));
    }

    #[test]
    fn tokens_are_lowercased_and_deduplicated() {
        let (_, keywords) = extract_entities_and_keywords("Invoice INVOICE invoice Total total");
        assert_eq!(keywords.len(), 2);
        assert!(keywords.contains(&"invoice".to_string()));
        assert!(keywords.contains(&"total".to_string()));
    }

    #[test]
    fn capped_at_twenty() {
        let text: String = (0..50).map(|i| format!("word{i:02} ")).collect();
        let (_, keywords) = extract_entities_and_keywords(&text);
        assert_eq!(keywords.len(), 20);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Quarterly revenue grew despite supply constraints in the quarter";
        let (_, first) = extract_entities_and_keywords(text);
        let (_, second) = extract_entities_and_keywords(text);
        let a: HashSet<_> = first.iter().collect();
        let b: HashSet<_> = second.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn entities_always_empty() {
        let (entities, _) = extract_entities_and_keywords("Alice went to Paris with Bob");
        assert!(entities.is_empty());
    }
}
