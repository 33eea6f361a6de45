//! Word statistics and stopword counting.
//!
//! Stopword density is the core linguistic signal of the scoring engine:
//! real prose is rich in common function words, boilerplate and link
//! clusters are not. Lists are embedded per language and cached for the
//! process lifetime; a missing language degrades to an empty set rather
//! than failing.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use regex::Regex;

/// Whitespace characters recognized as token separators (incl. NBSP).
#[allow(clippy::expect_used)]
static SPACE_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{a0}\t]").expect("valid regex"));

/// Runs of whitespace, collapsed by `inner_trim`.
#[allow(clippy::expect_used)]
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{a0}\t]+").expect("valid regex"));

/// Collapse internal whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn inner_trim(value: &str) -> String {
    WHITESPACE_RUNS.replace_all(value, " ").trim().to_string()
}

/// Word statistics for one piece of text.
///
/// Created fresh per scoring call and immutable afterwards.
#[derive(Debug, Default, Clone)]
pub struct WordStats {
    /// Total number of candidate tokens.
    pub word_count: usize,
    /// How many tokens matched the language's stopword set.
    pub stop_word_count: usize,
    /// The matched tokens, lowercased, in order of encounter.
    pub stop_words: Vec<String>,
}

/// Tokenizer capability for a language.
///
/// Languages differ only in declared capabilities, looked up by code;
/// Arabic keeps punctuation attached to tokens, everything else strips
/// ASCII punctuation before splitting.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    strips_punctuation: bool,
}

impl Tokenizer {
    /// Look up the tokenizer variant registered for a language code.
    #[must_use]
    pub fn for_language(language: &str) -> Self {
        match language {
            "ar" => Self { strips_punctuation: false },
            _ => Self { strips_punctuation: true },
        }
    }

    /// Whether this variant strips ASCII punctuation before splitting.
    #[must_use]
    pub fn strips_punctuation(&self) -> bool {
        self.strips_punctuation
    }

    /// Split text into candidate tokens.
    ///
    /// Splitting is per separator character, so runs of whitespace produce
    /// empty tokens that still count toward `word_count`. That matches the
    /// calibration of the scoring thresholds and must not be "fixed".
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let stripped: String = if self.strips_punctuation {
            text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
        } else {
            text.to_string()
        };
        SPACE_SYMBOLS.split(&stripped).map(str::to_string).collect()
    }
}

/// Source of stopword sets, overridable through `Config`.
pub trait StopwordProvider: Send + Sync {
    /// Return the lowercase stopword set for a language code.
    ///
    /// Must not fail on unknown languages; return an empty set instead.
    fn stopwords(&self, language: &str) -> HashSet<String>;
}

const EMBEDDED_LISTS: &[(&str, &str)] = &[
    ("en", include_str!("stopwords/stopwords-en.txt")),
    ("de", include_str!("stopwords/stopwords-de.txt")),
    ("fr", include_str!("stopwords/stopwords-fr.txt")),
    ("es", include_str!("stopwords/stopwords-es.txt")),
    ("it", include_str!("stopwords/stopwords-it.txt")),
    ("pt", include_str!("stopwords/stopwords-pt.txt")),
    ("nl", include_str!("stopwords/stopwords-nl.txt")),
    ("ru", include_str!("stopwords/stopwords-ru.txt")),
    ("ar", include_str!("stopwords/stopwords-ar.txt")),
];

/// Process-wide stopword cache, populated lazily per language.
static STOPWORD_CACHE: LazyLock<Mutex<HashMap<String, Arc<HashSet<String>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn embedded_stopwords(language: &str) -> Arc<HashSet<String>> {
    let mut cache = STOPWORD_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = cache.get(language) {
        return Arc::clone(set);
    }
    let set: HashSet<String> = EMBEDDED_LISTS
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, raw)| {
            raw.lines()
                .map(|line| line.trim().to_lowercase())
                .filter(|line| !line.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let set = Arc::new(set);
    cache.insert(language.to_string(), Arc::clone(&set));
    set
}

/// Stopword counter for one language.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: Arc<HashSet<String>>,
    tokenizer: Tokenizer,
}

impl StopWords {
    /// Build a counter backed by the embedded list for `language`.
    ///
    /// Unknown languages get an empty set; every token counts as non-stop.
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self {
            words: embedded_stopwords(language),
            tokenizer: Tokenizer::for_language(language),
        }
    }

    /// Build a counter from a caller-supplied provider.
    #[must_use]
    pub fn with_provider(language: &str, provider: &dyn StopwordProvider) -> Self {
        Self {
            words: Arc::new(provider.stopwords(language)),
            tokenizer: Tokenizer::for_language(language),
        }
    }

    /// Count tokens and stopword matches in `content`.
    #[must_use]
    pub fn stopword_count(&self, content: &str) -> WordStats {
        if content.is_empty() {
            return WordStats::default();
        }
        let candidates = self.tokenizer.tokenize(content);
        let mut matched = Vec::new();
        for word in &candidates {
            let lowered = word.to_lowercase();
            if self.words.contains(&lowered) {
                matched.push(lowered);
            }
        }
        WordStats {
            word_count: candidates.len(),
            stop_word_count: matched.len(),
            stop_words: matched,
        }
    }
}
