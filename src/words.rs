use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub meaning: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn default_file_name(self) -> String {
        format!("words_{}.csv", self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(value.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read word list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed word list {} at line {line}: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("word list {} contains no entries", .path.display())]
    Empty { path: PathBuf },
}

pub async fn load_word_list(path: &Path) -> Result<Vec<WordEntry>, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let entries = parse_word_list(&content, path)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "word list loaded");
    Ok(entries)
}

/// Parses `word,meaning` rows. Fields may be double-quoted; an unquoted
/// meaning keeps any further commas.
pub fn parse_word_list(content: &str, path: &Path) -> Result<Vec<WordEntry>, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && is_header(line) {
            continue;
        }

        let malformed = |reason: &str| LoadError::Malformed {
            path: path.to_path_buf(),
            line: line_no,
            reason: reason.to_string(),
        };

        let fields = split_fields(line).ok_or_else(|| malformed("unterminated quote"))?;
        let Some((word, rest)) = fields.split_first() else {
            return Err(malformed("empty row"));
        };
        let word = word.trim();
        let meaning = rest.join(",");
        let meaning = meaning.trim();

        if word.is_empty() {
            return Err(malformed("missing word"));
        }
        if meaning.is_empty() {
            return Err(malformed("missing meaning"));
        }

        entries.push(WordEntry::new(word, meaning));
    }

    if entries.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(entries)
}

fn is_header(line: &str) -> bool {
    let normalized: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect();
    normalized.eq_ignore_ascii_case("word,meaning")
}

fn split_fields(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}

#[derive(Debug, Clone, Default)]
pub struct WordStore {
    easy: Vec<WordEntry>,
    medium: Vec<WordEntry>,
    hard: Vec<WordEntry>,
    index: HashMap<String, (Difficulty, usize)>,
}

impl WordStore {
    pub fn from_tiers(easy: Vec<WordEntry>, medium: Vec<WordEntry>, hard: Vec<WordEntry>) -> Self {
        let mut index = HashMap::new();
        let tiers = [
            (Difficulty::Easy, &easy),
            (Difficulty::Medium, &medium),
            (Difficulty::Hard, &hard),
        ];
        for (difficulty, entries) in tiers {
            for (pos, entry) in entries.iter().enumerate() {
                index.entry(entry.word.clone()).or_insert((difficulty, pos));
            }
        }

        Self {
            easy,
            medium,
            hard,
            index,
        }
    }

    /// Loads the three tiers concurrently; the first failure wins.
    pub async fn load(easy: &Path, medium: &Path, hard: &Path) -> Result<Self, LoadError> {
        let (easy, medium, hard) = tokio::try_join!(
            load_word_list(easy),
            load_word_list(medium),
            load_word_list(hard),
        )?;

        let store = Self::from_tiers(easy, medium, hard);
        tracing::info!(
            easy = store.easy.len(),
            medium = store.medium.len(),
            hard = store.hard.len(),
            "word store ready"
        );
        Ok(store)
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[WordEntry] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Earlier tiers shadow later ones when a word repeats.
    pub fn find(&self, word: &str) -> Option<&WordEntry> {
        let (difficulty, pos) = *self.index.get(word)?;
        self.tier(difficulty).get(pos)
    }

    pub fn len(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }
}
