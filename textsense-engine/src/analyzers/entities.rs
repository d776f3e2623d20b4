//! Pattern-based entity extraction

use crate::error::Result;
use crate::lexicon;
use regex::Regex;
use serde::{Deserialize, Serialize};
use textsense_core::strategy::StrategyParameters;
use textsense_core::{CostProbe, QualityRecord};

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";
const URL_PATTERN: &str = r#"\bhttps?://[^\s<>"]+|\bwww\.[^\s<>"]+"#;
const DATE_PATTERN: &str = r"\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.? \d{1,2}(?:, \d{4})?)\b";
const PERCENT_PATTERN: &str = r"\b\d+(?:\.\d+)?%";
const NUMBER_PATTERN: &str = r"\b\d+(?:[.,]\d+)*\b";
const NAME_PATTERN: &str = r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+\b";

/// Entity categories, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Email address
    Email,
    /// Web address
    Url,
    /// Calendar date
    Date,
    /// Percentage
    Percent,
    /// Other number
    Number,
    /// Run of capitalized words, depth 2 and up
    Name,
}

impl EntityKind {
    /// How much a match of this kind can be trusted
    fn precision(&self) -> f64 {
        match self {
            EntityKind::Email | EntityKind::Url | EntityKind::Date | EntityKind::Percent => 1.0,
            EntityKind::Number => 0.9,
            EntityKind::Name => 0.6,
        }
    }
}

/// One extracted entity with its byte span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Category
    pub kind: EntityKind,
    /// Matched text
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: Vec<(EntityKind, Regex)>,
    names: Regex,
}

impl EntityExtractor {
    /// Compile the built-in patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            patterns: vec![
                (EntityKind::Email, Regex::new(EMAIL_PATTERN)?),
                (EntityKind::Url, Regex::new(URL_PATTERN)?),
                (EntityKind::Date, Regex::new(DATE_PATTERN)?),
                (EntityKind::Percent, Regex::new(PERCENT_PATTERN)?),
                (EntityKind::Number, Regex::new(NUMBER_PATTERN)?),
            ],
            names: Regex::new(NAME_PATTERN)?,
        })
    }

    fn candidates(&self, text: &str, with_names: bool, probe: &CostProbe) -> Vec<Entity> {
        let mut found = Vec::new();
        for (kind, regex) in &self.patterns {
            probe.increment_steps();
            for m in regex.find_iter(text) {
                let matched = if *kind == EntityKind::Url {
                    m.as_str()
                        .trim_end_matches(['.', ',', ')', ';', ':', '!', '?'])
                } else {
                    m.as_str()
                };
                found.push(Entity {
                    kind: *kind,
                    text: matched.to_string(),
                    start: m.start(),
                    end: m.start() + matched.len(),
                });
            }
        }

        if with_names {
            probe.increment_steps();
            for m in self.names.find_iter(text) {
                if let Some(entity) = trim_leading_stopwords(m.as_str(), m.start()) {
                    found.push(entity);
                }
            }
        }
        found
    }

    /// Extract entities, reporting work into `probe`
    ///
    /// When spans overlap, the higher-priority kind wins: a date is not
    /// also reported as three numbers.
    pub fn extract(
        &self,
        text: &str,
        params: &StrategyParameters,
        probe: &CostProbe,
    ) -> (Vec<Entity>, QualityRecord) {
        let mut accepted: Vec<Entity> = Vec::new();
        // candidates arrive grouped by priority
        for candidate in self.candidates(text, params.depth >= 2, probe) {
            probe.increment_steps();
            let overlaps = accepted
                .iter()
                .any(|e| candidate.start < e.end && e.start < candidate.end);
            if !overlaps {
                accepted.push(candidate);
            }
        }
        accepted.sort_by_key(|e| (e.start, e.kind));

        let accuracy = if params.depth >= 2 { 0.8 } else { 0.7 };
        let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();
        if accepted.is_empty() || non_whitespace == 0 {
            return (accepted, QualityRecord::new(accuracy, 0.0, 0.0));
        }

        let confidence = accepted.iter().map(|e| e.kind.precision()).sum::<f64>()
            / accepted.len() as f64;
        let entity_chars: usize = accepted
            .iter()
            .map(|e| e.text.chars().filter(|c| !c.is_whitespace()).count())
            .sum();
        let coverage = (entity_chars as f64 / non_whitespace as f64).min(1.0);

        (accepted, QualityRecord::new(accuracy, confidence, coverage))
    }
}

/// Drop sentence-initial stopwords ("The", "In") from a capitalized run
fn trim_leading_stopwords(matched: &str, offset: usize) -> Option<Entity> {
    let mut rest = matched;
    let mut start = offset;
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if !lexicon::is_stopword(&word.to_lowercase()) {
            break;
        }
        let skipped = rest[word_end..].trim_start();
        start += rest.len() - skipped.len();
        rest = skipped;
    }

    if rest.split_whitespace().count() < 2 {
        return None;
    }
    Some(Entity {
        kind: EntityKind::Name,
        text: rest.to_string(),
        start,
        end: start + rest.len(),
    })
}
