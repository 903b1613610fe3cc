//! Loading and normalizing the vocabulary that seeds every variable's domain.
//!
//! A words file has one word per line. Lines are trimmed, blank lines are skipped, and every word
//! is upper-cased. The resulting list is deduplicated and sorted by (length, alphabetical), so a
//! given file always produces the same `WordId`s.

use smallvec::SmallVec;
use std::fs;

use crate::errors::GridError;
use crate::{WordId, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a given variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub chars: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn new(string: &str) -> Word {
        Word {
            string: string.to_string(),
            chars: string.chars().collect(),
        }
    }

    /// Length in characters, which is what a variable's length is compared against.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordList {
    pub words: Vec<Word>,
}

impl WordList {
    /// Build a word list from any iterator of strings, applying the same normalization as
    /// `parse_from_str`.
    pub fn from_words<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut strings: Vec<String> = words
            .into_iter()
            .filter_map(|word| {
                let word = word.as_ref().trim();
                if word.is_empty() {
                    None
                } else {
                    Some(word.to_uppercase())
                }
            })
            .collect();

        strings.sort_by(|a, b| a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)));
        strings.dedup();

        WordList {
            words: strings.iter().map(|string| Word::new(string)).collect(),
        }
    }

    /// Parse a words file that has already been read into memory.
    pub fn parse_from_str(contents: &str) -> WordList {
        WordList::from_words(contents.lines())
    }

    /// Read and parse a words file from disk.
    pub fn load_from_path(path: &str) -> Result<WordList, GridError> {
        let contents = fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let word_list = WordList::parse_from_str(&contents);
        log::debug!("Loaded {} words from {}", word_list.len(), path);
        Ok(word_list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// Look up the id of a word, after normalizing it the same way the list was built.
    pub fn find(&self, word: &str) -> Option<WordId> {
        let word = word.trim().to_uppercase();
        self.words.iter().position(|candidate| candidate.string == word)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::word_list::WordList;
    use crate::GridError;

    #[test]
    fn test_parse_normalizes_and_sorts() {
        let word_list = WordList::parse_from_str("  tree\nword\n\nCat\ncat\n  \nab\n");

        let strings: Vec<&str> = word_list.words.iter().map(|w| w.string.as_str()).collect();
        assert_eq!(strings, vec!["AB", "CAT", "TREE", "WORD"]);
    }

    #[test]
    fn test_lengths_count_chars() {
        let word_list = WordList::from_words(["ÉTÉ", "ab"]);

        assert_eq!(word_list.words[0].string, "AB");
        assert_eq!(word_list.words[1].len(), 3);
        assert_eq!(word_list.words[1].chars[1], 'T');
    }

    #[test]
    fn test_find_uses_normalized_form() {
        let word_list = WordList::from_words(["dog", "car"]);

        assert_eq!(word_list.find("car"), Some(0));
        assert_eq!(word_list.find(" DOG "), Some(1));
        assert_eq!(word_list.find("cat"), None);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "one\ntwo\nthree").unwrap();

        let word_list = WordList::load_from_path(file.path().to_str().unwrap()).unwrap();

        assert_eq!(word_list.len(), 3);
        assert_eq!(word_list.words[2].string, "THREE");
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = WordList::load_from_path("/nonexistent/crossfill/words.txt");

        assert!(matches!(result, Err(GridError::Io { .. })));
    }
}
