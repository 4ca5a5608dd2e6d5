use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAX_WORD_LEN: usize = 7;

pub const WORDS: &[&str] = &[
    // 3
    "ant", "bag", "bat", "bed", "box", "bus", "cab", "cat", "cup", "dog", "ear", "egg", "elf",
    "fan", "fig", "fox", "gem", "hat", "hen", "ink", "jam", "jet", "key", "kit", "lid", "map",
    "mud", "net", "nut", "oak", "owl", "pan", "pen", "pig", "rug", "sun", "toy", "van", "web",
    "yak",
    // 4
    "bark", "bell", "bird", "boat", "cake", "coin", "crab", "deer", "drum", "duck", "fish",
    "flag", "frog", "gate", "gold", "harp", "hill", "iron", "kite", "lamp", "leaf", "lion",
    "mask", "moon", "nest", "oven", "pear", "rain", "ring", "rose", "sand", "ship", "snow",
    "star", "tent", "tree", "vase", "wave", "wolf", "yarn",
    // 5
    "amber", "apple", "beach", "bread", "brick", "cabin", "candy", "chair", "cloud", "coral",
    "crown", "dance", "eagle", "flame", "ghost", "grape", "heart", "honey", "house", "juice",
    "knife", "lemon", "magic", "maple", "night", "ocean", "otter", "piano", "pizza", "plant",
    "queen", "river", "robot", "sheep", "smile", "stone", "storm", "tiger", "train", "whale",
    // 6
    "anchor", "banana", "basket", "bottle", "bridge", "button", "candle", "carpet", "castle",
    "cheese", "cherry", "circle", "dragon", "flower", "forest", "garden", "guitar", "hammer",
    "island", "jacket", "jungle", "kitten", "ladder", "lizard", "marble", "meadow", "mirror",
    "monkey", "orange", "parrot", "pencil", "pepper", "planet", "rabbit", "rocket", "saddle",
    "silver", "spider", "tunnel", "window",
    // 7
    "balloon", "blanket", "cabinet", "captain", "chicken", "compass", "cottage", "crystal",
    "dolphin", "feather", "giraffe", "harvest", "journey", "kingdom", "lantern", "library",
    "mansion", "monster", "morning", "mystery", "octopus", "orchard", "panther", "peacock",
    "pelican", "penguin", "pyramid", "rainbow", "sparrow", "station", "thunder", "trumpet",
    "unicorn", "victory", "volcano", "walnuts", "weather", "whistle", "wizards", "sapling",
];

#[derive(Debug, Error)]
pub enum DictionaryError
{
    #[error("failed to read word list {}: {source}", path.display())]
    Read
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "no usable words (alphabetic, at most {} letters) in {}",
        MAX_WORD_LEN,
        path.display()
    )]
    NoUsableWords
    {
        path: PathBuf,
    },
}

/// Candidate words bucketed by exact length. Never empty.
pub struct Dictionary
{
    words: Vec<String>,
    by_len: BTreeMap<usize, Vec<usize>>,
}

impl Dictionary
{
    pub fn builtin() -> Self
    {
        Self::from_words(WORDS.iter().copied()).unwrap_or_else(|| Self {
            words: vec!["cat".to_string()],
            by_len: BTreeMap::from([(3, vec![0])]),
        })
    }

    /// Keeps alphabetic words of at most [`MAX_WORD_LEN`] letters. Returns `None`
    /// when nothing survives the filter.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Option<Self>
    {
        let mut kept: Vec<String> = words
            .into_iter()
            .map(str::trim)
            .filter(|word| is_usable(word))
            .map(str::to_string)
            .collect();
        kept.sort();
        kept.dedup();
        if kept.is_empty() {
            return None;
        }

        let mut by_len: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, word) in kept.iter().enumerate() {
            by_len.entry(word.chars().count()).or_default().push(idx);
        }
        Some(Self {
            words: kept,
            by_len,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DictionaryError>
    {
        let text = fs::read_to_string(path).map_err(|source| DictionaryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_words(text.lines()).ok_or_else(|| DictionaryError::NoUsableWords {
            path: path.to_path_buf(),
        })
    }

    pub fn len(&self) -> usize
    {
        self.words.len()
    }

    pub fn has_len(&self, len: usize) -> bool
    {
        self.by_len.contains_key(&len)
    }

    /// Uniform pick among words of exactly `len` letters, or among all words
    /// when that bucket is empty.
    pub fn pick(&self, len: usize, rng: &mut impl Rng) -> &str
    {
        let index = match self.by_len.get(&len) {
            Some(bucket) => bucket.choose(rng).copied(),
            None => None,
        };
        let index = index.unwrap_or_else(|| rng.gen_range(0..self.words.len()));
        &self.words[index]
    }
}

fn is_usable(word: &str) -> bool
{
    let len = word.chars().count();
    len > 0 && len <= MAX_WORD_LEN && word.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    #[test]
    fn filters_long_and_non_alphabetic_words()
    {
        let dict = Dictionary::from_words(["cat", "zeppelin", "can't", "r2d2", "", "  dog  "])
            .expect("some words survive");
        assert_eq!(dict.len(), 2);
        assert!(dict.has_len(3));
        assert!(!dict.has_len(8));
    }

    #[test]
    fn nothing_usable_is_none()
    {
        assert!(Dictionary::from_words(["a-b", "1234", "overlylong"]).is_none());
    }

    #[test]
    fn builtin_covers_every_difficulty_length()
    {
        let dict = Dictionary::builtin();
        for len in 3..=MAX_WORD_LEN {
            assert!(dict.has_len(len), "missing words of length {len}");
        }
    }

    #[test]
    fn pick_respects_requested_length()
    {
        let dict = Dictionary::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        for len in 3..=MAX_WORD_LEN {
            for _ in 0..50 {
                assert_eq!(dict.pick(len, &mut rng).chars().count(), len);
            }
        }
    }

    #[test]
    fn pick_falls_back_to_whole_dictionary()
    {
        let dict = Dictionary::from_words(["cat", "dog"]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let word = dict.pick(6, &mut rng);
            assert!(word == "cat" || word == "dog");
        }
    }

    #[test]
    fn load_reads_one_word_per_line()
    {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha\nbeta\nnot-a-word\ngamma").unwrap();
        let dict = Dictionary::load(file.path()).unwrap();
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn load_missing_file_is_a_read_error()
    {
        let dir = tempfile::tempdir().unwrap();
        let err = Dictionary::load(&dir.path().join("nope.txt")).err().unwrap();
        assert!(matches!(err, DictionaryError::Read { .. }));
    }
}
