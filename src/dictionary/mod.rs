use anyhow::Result;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

use crate::game::validator::MIN_WORD_LENGTH;

/// Word list shipped with the binary, used when no dictionary file is found
static BUILTIN_WORDS: &str = include_str!("../../data/words.txt");

static BUILTIN: Lazy<HashSet<String>> = Lazy::new(|| parse_words(BUILTIN_WORDS));

/// Keep lowercase alphabetic entries long enough to ever be submitted
fn parse_words(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| {
            word.chars().count() >= MIN_WORD_LENGTH
                && word.chars().all(|ch| ch.is_ascii_alphabetic())
        })
        .collect()
}

pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load dictionary from a file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let words = parse_words(&content);

        tracing::info!("Loaded {} words into dictionary", words.len());

        Ok(Self { words })
    }

    /// The embedded word list
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN.clone(),
        }
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(|word| word.trim().to_lowercase()).collect(),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Check if a word exists in the dictionary, case-insensitive
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Get the number of words in the dictionary
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
