// src/bot/matching.rs - Deny-list matching policies

use log::debug;

/// Substring policy for free text and captions: the first stored phrase that
/// occurs contiguously in the message (case-insensitive) wins.
///
/// Returns the stored phrase in its literal form so callers can report what
/// tripped the check. Pure; never mutates the list.
pub fn find_substring_match<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    let text_lower = text.to_lowercase();
    for phrase in phrases {
        let needle = phrase.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if text_lower.contains(&needle) {
            debug!("Substring match: {:?}", phrase);
            return Some(phrase);
        }
    }
    None
}

/// All-words-present policy for OCR-extracted text: a stored phrase-line
/// matches only if every one of its whitespace-delimited words occurs
/// somewhere in the text as a substring. Word order and adjacency are not
/// required; OCR output routinely scrambles both. The first fully satisfied
/// line wins.
pub fn find_all_words_match<'a>(extracted: &str, phrase_lines: &'a [String]) -> Option<&'a str> {
    let text_lower = extracted.to_lowercase();
    for line in phrase_lines {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if words.all(|word| text_lower.contains(&word.to_lowercase())) {
            debug!("All-words match: {:?}", line);
            return Some(line);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substring_matches_contiguous_phrase() {
        let phrases = list(&["cheap watches"]);
        assert_eq!(
            find_substring_match("buy cheap watches now", &phrases),
            Some("cheap watches")
        );
    }

    #[test]
    fn substring_requires_contiguity() {
        let phrases = list(&["cheap watches"]);
        assert_eq!(find_substring_match("watches are cheap", &phrases), None);
    }

    #[test]
    fn substring_is_case_insensitive_both_ways() {
        let phrases = list(&["ChEaP WaTcHeS"]);
        assert!(find_substring_match("BUY CHEAP WATCHES NOW", &phrases).is_some());
    }

    #[test]
    fn substring_first_match_wins() {
        let phrases = list(&["free money", "cheap watches"]);
        assert_eq!(
            find_substring_match("cheap watches and free money", &phrases),
            Some("free money")
        );
    }

    #[test]
    fn substring_ignores_empty_entries() {
        let phrases = list(&["", "   ", "spam"]);
        assert_eq!(find_substring_match("no spam here", &phrases), Some("spam"));
        assert_eq!(find_substring_match("clean message", &phrases), None);
    }

    #[test]
    fn all_words_tolerates_reordered_noisy_text() {
        let lines = list(&["cheap watches"]);
        assert_eq!(
            find_all_words_match("watches!! buy s0me cheap ones", &lines),
            Some("cheap watches")
        );
    }

    #[test]
    fn all_words_does_not_bridge_split_ocr_tokens() {
        // OCR broke "watches" into "watche s": "watches" is no longer a
        // substring of the extracted text, so the line must not match.
        let lines = list(&["cheap watches"]);
        assert_eq!(find_all_words_match("s0me cheap watche s here", &lines), None);
    }

    #[test]
    fn all_words_requires_every_word() {
        let lines = list(&["crypto pump signal"]);
        assert_eq!(find_all_words_match("crypto pump incoming", &lines), None);
        assert_eq!(
            find_all_words_match("signal: crypto pump at noon", &lines),
            Some("crypto pump signal")
        );
    }

    #[test]
    fn all_words_skips_empty_lines() {
        let lines = list(&["", "casino"]);
        assert_eq!(find_all_words_match("best casino bonus", &lines), Some("casino"));
        assert_eq!(find_all_words_match("", &lines), None);
    }

    #[test]
    fn all_words_is_case_insensitive() {
        let lines = list(&["Cheap WATCHES"]);
        assert!(find_all_words_match("CHEAP imitation watches", &lines).is_some());
    }

    #[test]
    fn all_words_single_word_line_is_substring_containment() {
        let lines = list(&["scam"]);
        // Substring containment per policy, even inside a larger token.
        assert_eq!(find_all_words_match("totally scammy offer", &lines), Some("scam"));
    }
}
