use crate::histogram::HistogramPair;
use serde::{Deserialize, Serialize};

/// Words containing a line terminator are never counted
const LINE_TERMINATORS: &[char] = &['\n', '\u{85}', '\u{2028}', '\u{2029}'];

/// Characters removed from every word before counting
const PUNCTUATION: &[char] = &['.', ',', '=', ':', ';', '!', '?', '(', ')', '|', '\r'];

/// How raw text is cut into words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordSplit {
    /// Split on the space character only. A word spanning a line break is
    /// dropped, which mirrors how the scoring tool always counted words.
    #[default]
    Spaces,
    /// Split on any whitespace
    Whitespace,
}

/// Result of tokenizing one document
#[derive(Debug, Clone, Default)]
pub struct TokenizedText {
    pub histograms: HistogramPair,
    /// Number of single words counted
    pub word_count: u64,
}

/// Builds single and compound word histograms from text
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    split: WordSplit,
}

impl Tokenizer {
    pub fn new(split: WordSplit) -> Self {
        Self { split }
    }

    pub fn tokenize(&self, text: &str) -> TokenizedText {
        let mut out = TokenizedText::default();
        let mut last: Option<String> = None;

        let mut count = |raw: &str| {
            let Some(word) = normalize_word(raw) else {
                return;
            };
            out.histograms.single.insert(&word);
            out.word_count += 1;
            if let Some(prev) = &last {
                out.histograms.compound.insert(&format!("{} {}", prev, word));
            }
            last = Some(word);
        };

        match self.split {
            WordSplit::Spaces => text.split(' ').for_each(&mut count),
            WordSplit::Whitespace => text.split_whitespace().for_each(&mut count),
        }

        out
    }
}

/// Lowercase, strip punctuation and reject words without a letter
pub fn normalize_word(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let cleaned: String = lowered.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
    let word = cleaned.trim();

    if word.is_empty()
        || word.contains(LINE_TERMINATORS)
        || !word.bytes().any(|b| b.is_ascii_alphabetic())
    {
        return None;
    }
    Some(word.to_string())
}
