//! Normalized view of a natural-language phrase
//!
//! Matching runs on lowercased words with trailing `?`, `!` and `,` removed.
//! Argument text is taken from the original-case words at the same indices,
//! so `create a folder called Projects` still yields `Projects`.

/// Words that carry no argument meaning around a path or name
const FILLERS: &[&str] = &[
    "a", "an", "the", "new", "empty", "called", "named", "in", "into", "inside", "of", "my",
    "this", "current", "folder", "directory", "dir", "file", "are", "is", "at", "me", "here",
    "please", "use", "using", "with",
];

/// Words that may trail a name without being part of it
const TRAILING_FILLERS: &[&str] = &["folder", "directory", "dir", "file", "please"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    original: Vec<String>,
    normalized: Vec<String>,
}

impl Phrase {
    pub fn new(raw: &str) -> Self {
        let original: Vec<String> = raw
            .split_whitespace()
            .map(|w| w.trim_end_matches(['?', '!', ',']).to_string())
            .filter(|w| !w.is_empty())
            .collect();
        let normalized = original.iter().map(|w| w.to_lowercase()).collect();
        Self {
            original,
            normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Lowercased words joined by single spaces
    pub fn normalized(&self) -> String {
        self.normalized.join(" ")
    }

    /// Index of the first whole-word occurrence of `word`
    pub fn position(&self, word: &str) -> Option<usize> {
        self.normalized.iter().position(|w| w == word)
    }

    /// Index of the first occurrence of `word` after `start`
    pub fn position_after(&self, word: &str, start: usize) -> Option<usize> {
        self.normalized
            .iter()
            .enumerate()
            .skip(start + 1)
            .find(|(_, w)| w.as_str() == word)
            .map(|(i, _)| i)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position(word).is_some()
    }

    /// If every trigger appears (in any order), the index of the last one
    pub fn match_all(&self, triggers: &[&str]) -> Option<usize> {
        let mut anchor = None;
        for trigger in triggers {
            let pos = self.position(trigger)?;
            anchor = Some(anchor.map_or(pos, |a: usize| a.max(pos)));
        }
        anchor
    }

    /// Original-case text of `start..end` with filler words trimmed off both ends
    pub fn argument(&self, start: usize, end: usize) -> Option<String> {
        let end = end.min(self.original.len());
        if start >= end {
            return None;
        }
        let mut lo = start;
        let mut hi = end;
        while lo < hi && FILLERS.contains(&self.normalized[lo].as_str()) {
            lo += 1;
        }
        while hi > lo && TRAILING_FILLERS.contains(&self.normalized[hi - 1].as_str()) {
            hi -= 1;
        }
        if lo == hi {
            None
        } else {
            Some(self.original[lo..hi].join(" "))
        }
    }

    /// Argument text after `anchor` up to the end of the phrase
    pub fn remainder_after(&self, anchor: usize) -> Option<String> {
        self.argument(anchor + 1, self.len())
    }

    /// First non-filler word after `anchor`, lowercased
    pub fn first_word_after(&self, anchor: usize) -> Option<String> {
        self.normalized
            .iter()
            .skip(anchor + 1)
            .find(|w| !FILLERS.contains(&w.as_str()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_spacing() {
        let phrase = Phrase::new("  Show   FILES in\tDownloads? ");
        assert_eq!(phrase.normalized(), "show files in downloads");
        assert_eq!(phrase.len(), 4);
    }

    #[test]
    fn test_whole_word_positions() {
        let phrase = Phrase::new("create a new folder called Projects");
        assert_eq!(phrase.position("folder"), Some(3));
        assert_eq!(phrase.position("fold"), None);
        assert_eq!(phrase.match_all(&["folder", "create"]), Some(3));
        assert_eq!(phrase.match_all(&["create", "file"]), None);
    }

    #[test]
    fn test_remainder_keeps_case_and_drops_fillers() {
        let phrase = Phrase::new("create a new folder called Projects");
        assert_eq!(phrase.remainder_after(3), Some("Projects".to_string()));

        let phrase = Phrase::new("show files in Old Projects folder");
        assert_eq!(phrase.remainder_after(1), Some("Old Projects".to_string()));
    }

    #[test]
    fn test_remainder_empty_when_only_fillers() {
        let phrase = Phrase::new("list files in the current directory");
        assert_eq!(phrase.remainder_after(1), None);
    }

    #[test]
    fn test_position_after() {
        let phrase = Phrase::new("move to-do.txt to archive");
        assert_eq!(phrase.position_after("to", 0), Some(2));
        assert_eq!(phrase.position_after("to", 2), None);
    }

    #[test]
    fn test_first_word_after() {
        let phrase = Phrase::new("help with creating files");
        assert_eq!(phrase.first_word_after(0), Some("creating".to_string()));
    }
}
