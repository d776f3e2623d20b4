//! Derive selection inputs from raw text

use crate::analyzers::language::guess_language;
use crate::analyzers::statistics::TextStatistics;
use textsense_core::TextCharacteristics;

/// Words the language guess looks at
const LANGUAGE_SAMPLE_WORDS: usize = 500;

/// Depth used for the sentence count behind complexity
const CHARACTERIZE_DEPTH: u8 = 2;

/// Structure tag for running prose
pub const STRUCTURE_PLAIN: &str = "plain";
/// Structure tag for bulleted or numbered lists
pub const STRUCTURE_LIST: &str = "list";
/// Structure tag for quoted or speaker-prefixed turns
pub const STRUCTURE_DIALOGUE: &str = "dialogue";
/// Structure tag for HTML/XML or Markdown headings
pub const STRUCTURE_MARKUP: &str = "markup";

/// Describe `text` for strategy selection
///
/// Complexity is the mean of three unit-scaled signals: mean word length
/// (3 to 8 characters), mean sentence length (5 to 30 words) and lexical
/// diversity.
pub fn characterize(text: &str, domain: &str) -> TextCharacteristics {
    let stats = TextStatistics::compute(text, CHARACTERIZE_DEPTH);
    let (language, _) = guess_language(text, Some(LANGUAGE_SAMPLE_WORDS));

    let complexity = if stats.words == 0 {
        0.0
    } else {
        let word_length = ((stats.mean_word_length - 3.0) / 5.0).clamp(0.0, 1.0);
        let sentence_length = ((stats.mean_sentence_length - 5.0) / 25.0).clamp(0.0, 1.0);
        (word_length + sentence_length + stats.lexical_diversity) / 3.0
    };

    TextCharacteristics::new(stats.chars, language.code, domain, complexity)
        .with_structure(detect_structure(text))
}

fn is_list_item(line: &str) -> bool {
    if ["- ", "* ", "+ ", "• "].iter().any(|b| line.starts_with(b)) {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && matches!(line[digits..].chars().next(), Some('.' | ')'))
}

fn is_dialogue_turn(line: &str) -> bool {
    if line.starts_with(['"', '“', '「', '—']) {
        return true;
    }
    // "Speaker: words"
    match line.split_once(':') {
        Some((speaker, rest)) => {
            !speaker.is_empty()
                && speaker.chars().count() <= 20
                && speaker.chars().all(|c| c.is_alphanumeric() || c == ' ')
                && speaker.chars().next().is_some_and(char::is_uppercase)
                && !rest.trim().is_empty()
        }
        None => false,
    }
}

fn tag_count(text: &str) -> usize {
    text.match_indices('<')
        .filter(|(idx, _)| {
            text[idx + 1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '/')
        })
        .count()
}

/// Classify the layout of `text`
pub fn detect_structure(text: &str) -> &'static str {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if tag_count(text) >= 2 || lines.iter().any(|l| l.starts_with("# ") || l.starts_with("## ")) {
        return STRUCTURE_MARKUP;
    }
    if lines.len() < 2 {
        return STRUCTURE_PLAIN;
    }

    let majority = |count: usize| count * 2 >= lines.len();
    if majority(lines.iter().filter(|l| is_list_item(l)).count()) {
        STRUCTURE_LIST
    } else if majority(lines.iter().filter(|l| is_dialogue_turn(l)).count()) {
        STRUCTURE_DIALOGUE
    } else {
        STRUCTURE_PLAIN
    }
}
