//! Sentence segmentation

use crate::lexicon;
use serde::{Deserialize, Serialize};
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

/// One sentence with its byte span in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Sentence text, trimmed
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…' | '。' | '！' | '？')
}

fn is_cjk_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}' | '」' | '』' | '）'
    )
}

#[derive(Debug, Default)]
struct Enclosure {
    nesting: u32,
    in_quote: bool,
}

impl Enclosure {
    fn track(&mut self, c: char) {
        match c {
            '(' | '[' | '\u{201C}' | '「' | '『' | '（' => self.nesting += 1,
            ')' | ']' | '\u{201D}' | '」' | '』' | '）' => {
                self.nesting = self.nesting.saturating_sub(1)
            }
            '"' => self.in_quote = !self.in_quote,
            _ => {}
        }
    }

    fn is_open(&self) -> bool {
        self.nesting > 0 || self.in_quote
    }
}

/// Whether the period at byte `dot` ends an abbreviation or an initial
fn ends_abbreviation(text: &str, sentence_start: usize, dot: usize) -> bool {
    let token = text[sentence_start..dot]
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = token.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        if first.is_uppercase() {
            return true;
        }
    }
    lexicon::is_abbreviation(&token.to_lowercase())
}

fn push_trimmed(sentences: &mut Vec<Sentence>, text: &str, start: usize, end: usize) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    sentences.push(Sentence {
        text: trimmed.to_string(),
        start: start + lead,
        end: start + lead + trimmed.len(),
    });
}

/// Split `text` into sentences at the given processing depth
///
/// A terminator run (terminators plus trailing closing quotes and
/// brackets) ends a sentence when whitespace or the end of text follows;
/// CJK terminators always end one. Depth 2 and up keep abbreviations and
/// initials attached; depth 3 and up never split inside quotes or
/// brackets.
pub(crate) fn split_sentences(text: &str, depth: u8) -> Vec<Sentence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut enclosure = Enclosure::default();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, c) = chars[i];
        enclosure.track(c);
        if !is_terminator(c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
            enclosure.track(chars[j].1);
            j += 1;
        }
        let at_end = j >= chars.len();
        let end = if at_end { text.len() } else { chars[j].0 };

        let mut boundary = at_end || chars[j].1.is_whitespace() || is_cjk_terminator(c);
        if boundary && !at_end && depth >= 2 && c == '.' && ends_abbreviation(text, start, pos) {
            boundary = false;
        }
        if boundary && depth >= 3 && enclosure.is_open() {
            boundary = false;
        }

        if boundary {
            push_trimmed(&mut sentences, text, start, end);
            start = end;
        }
        i = j;
    }

    if start < text.len() {
        push_trimmed(&mut sentences, text, start, text.len());
    }
    sentences
}

fn ends_with_terminator(sentence: &str) -> bool {
    sentence
        .trim_end_matches(is_closer)
        .chars()
        .next_back()
        .is_some_and(is_terminator)
}

/// Segment text into sentences, reporting work into `probe`
pub fn segment_sentences(
    text: &str,
    params: &StrategyParameters,
    probe: &CostProbe,
) -> (Vec<Sentence>, QualityRecord) {
    let sentences = split_sentences(text, params.depth);
    probe.add_steps(text.chars().count() as u64);
    probe.checkpoint("segmented");

    let accuracy = match params.depth {
        0 | 1 => 0.75,
        2 => 0.85,
        _ => 0.92,
    };
    if sentences.is_empty() {
        return (sentences, QualityRecord::new(accuracy, 0.0, 0.0));
    }

    let terminated = sentences
        .iter()
        .filter(|s| ends_with_terminator(&s.text))
        .count();
    let confidence = terminated as f64 / sentences.len() as f64;

    (sentences, QualityRecord::new(accuracy, confidence, 1.0))
}
