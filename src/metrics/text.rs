use super::lexicon::STOPWORDS;
use std::collections::HashSet;

/// Lowercased word tokens. Apostrophes inside a word are kept so that
/// contractions like "don't" survive as one token.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|w| w.trim_matches(|c: char| c == '\'' || c == '\u{2019}'))
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('\u{2019}', "'").to_lowercase())
        .collect()
}

/// Number of sentences: runs of terminal punctuation close a sentence, and a
/// trailing fragment with any word characters counts as one more.
pub fn sentence_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_sentence = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            while matches!(chars.peek(), Some('.' | '!' | '?')) {
                chars.next();
            }
            if in_sentence {
                count += 1;
                in_sentence = false;
            }
        } else if c.is_alphanumeric() {
            in_sentence = true;
        }
    }
    if in_sentence {
        count += 1;
    }
    count
}

pub fn syllable_count(word: &str) -> usize {
    let word: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if word.is_empty() {
        return 0;
    }
    if word.len() <= 3 {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0;
    let mut prev_vowel = false;
    for &c in &word {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }

    let n = word.len();
    // silent final e, but "-le" after a consonant keeps its syllable
    if word[n - 1] == 'e' && !(word[n - 2] == 'l' && !is_vowel(word[n - 3])) && groups > 1 {
        groups -= 1;
    }
    groups.max(1)
}

/// Flesch reading ease, or `None` when the text has no words.
pub fn flesch_reading_ease(text: &str) -> Option<f64> {
    let words = words(text);
    if words.is_empty() {
        return None;
    }
    let sentences = sentence_count(text).max(1) as f64;
    let word_count = words.len() as f64;
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();
    Some(206.835 - 1.015 * (word_count / sentences) - 84.6 * (syllables as f64 / word_count))
}

/// Salient content words: alphabetic non-stopwords of three or more letters,
/// singularized so that "refunds" and "refund" meet.
pub fn content_words(text: &str) -> HashSet<String> {
    words(text)
        .into_iter()
        .filter(|w| w.len() >= 3 && w.chars().all(|c| c.is_alphabetic()))
        .filter(|w| !STOPWORDS.contains(w.as_str()))
        .map(|w| singularize(&w))
        .collect()
}

fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies")
        && stem.len() >= 2
    {
        return format!("{stem}y");
    }
    for suffix in ["ches", "shes", "sses", "xes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_keeps_contractions() {
        assert_eq!(
            words("I don't know, MAYBE later!"),
            vec!["i", "don't", "know", "maybe", "later"]
        );
        assert_eq!(words("it\u{2019}s fine"), vec!["it's", "fine"]);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("Hello there. How are you?"), 2);
        assert_eq!(sentence_count("Wait... what?!"), 2);
        assert_eq!(sentence_count("no punctuation at all"), 1);
        assert_eq!(sentence_count("?!"), 0);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn test_syllable_count() {
        assert_eq!(syllable_count("cat"), 1);
        assert_eq!(syllable_count("make"), 1);
        assert_eq!(syllable_count("table"), 2);
        assert_eq!(syllable_count("reading"), 2);
        assert_eq!(syllable_count("beautiful"), 3);
    }

    #[test]
    fn test_flesch_orders_simple_above_dense() {
        let simple = flesch_reading_ease("The cat sat on the mat. It was warm.").unwrap();
        let dense = flesch_reading_ease(
            "Notwithstanding considerable organizational complexity, the \
             implementation necessitates comprehensive administrative authorization.",
        )
        .unwrap();
        assert!(simple > 90.0, "simple = {simple}");
        assert!(dense < 0.0, "dense = {dense}");
        assert_eq!(flesch_reading_ease("!!!"), None);
    }

    #[test]
    fn test_content_words_drop_stopwords_and_singularize() {
        let words = content_words("Can you refund the charges on my accounts?");
        assert!(words.contains("refund"));
        assert!(words.contains("charge"));
        assert!(words.contains("account"));
        assert!(!words.contains("you"));
        assert!(!words.contains("the"));
    }
}
