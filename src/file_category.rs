/// File classification for Commodore image collections.
///
/// This module maps filenames to a category (keyed by extension suffix) and a
/// bucket (keyed by the leading character), which together determine where a
/// file is placed under the destination base directory.
///
/// # Examples
///
/// ```
/// use c64tidy::file_category::{Bucket, CategoryTable};
///
/// let table = CategoryTable::builtin();
/// assert_eq!(table.classify("game.prg"), Some("PRG"));
/// assert_eq!(table.classify("readme.txt"), None);
/// assert_eq!(Bucket::of("1tape.tap").dir_name(), "0_9");
/// ```
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Represents the second-level destination directory for a file.
///
/// Alphabetic leading characters get a one-letter bucket; everything else
/// (digits, punctuation, non-ASCII) shares the `0_9` catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// A lowercase ASCII letter bucket (`a` through `z`).
    Letter(char),
    /// The catch-all bucket for non-alphabetic leading characters.
    NonAlphabetic,
}

impl Bucket {
    /// Determines the bucket for a filename from its first character.
    ///
    /// Leading-character case is normalized to lowercase, so `Game.prg` and
    /// `game.prg` share the `g` bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// use c64tidy::file_category::Bucket;
    ///
    /// assert_eq!(Bucket::of("game.prg"), Bucket::Letter('g'));
    /// assert_eq!(Bucket::of("Game.prg"), Bucket::Letter('g'));
    /// assert_eq!(Bucket::of("1tape.tap"), Bucket::NonAlphabetic);
    /// ```
    pub fn of(file_name: &str) -> Self {
        match file_name.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => Bucket::Letter(c.to_ascii_lowercase()),
            _ => Bucket::NonAlphabetic,
        }
    }

    /// Returns the directory name for this bucket.
    pub fn dir_name(&self) -> String {
        match self {
            Bucket::Letter(c) => c.to_string(),
            Bucket::NonAlphabetic => "0_9".to_string(),
        }
    }
}

/// A computed destination for one file: its category and bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Category directory name (e.g. `PRG`).
    pub category: String,
    /// Bucket under the category directory.
    pub bucket: Bucket,
}

impl Placement {
    /// Builds the full destination directory under `base`.
    ///
    /// The layout is always `<base>/<category>/<bucket>/`.
    pub fn destination_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.category).join(self.bucket.dir_name())
    }
}

/// Immutable mapping from category name to the extension suffix it collects.
///
/// The table is constructed once at startup (built-in or loaded from a TOML
/// file, see [`crate::config::CategoryConfig`]) and passed into
/// classification, so alternate tables can be supplied in tests.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: BTreeMap<String, String>,
}

impl CategoryTable {
    /// The built-in table covering the common Commodore image formats.
    pub fn builtin() -> Self {
        let mut table = Self {
            entries: BTreeMap::new(),
        };
        table.add_category("D64", ".d64");
        table.add_category("G64", ".g64");
        table.add_category("PRG", ".prg");
        table.add_category("T64", ".t64");
        table.add_category("F64", ".f64");
        table.add_category("CRT", ".crt");
        table.add_category("TAP", ".tap");
        table.add_category("D81", ".d81");
        table.add_category("D71", ".d71");
        table
    }

    /// Builds a table from explicit entries (category name, extension suffix).
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Adds a single category to extension mapping.
    pub fn add_category(&mut self, name: &str, extension: &str) {
        self.entries.insert(name.to_string(), extension.to_string());
    }

    /// Returns the number of categories in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no categories.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the category whose extension matches `file_name` as a literal,
    /// case-sensitive suffix.
    ///
    /// Returns `None` for unmatched files, which the caller skips; an
    /// unmatched extension is normal behavior, not an error.
    pub fn classify(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, extension)| file_name.ends_with(extension.as_str()))
            .map(|(name, _)| name.as_str())
    }

    /// Computes the full placement for a filename, or `None` when the
    /// extension matches no category.
    pub fn placement_for(&self, file_name: &str) -> Option<Placement> {
        self.classify(file_name).map(|category| Placement {
            category: category.to_string(),
            bucket: Bucket::of(file_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_covers_commodore_formats() {
        let table = CategoryTable::builtin();
        assert_eq!(table.len(), 9);
        assert_eq!(table.classify("disk.d64"), Some("D64"));
        assert_eq!(table.classify("image.g64"), Some("G64"));
        assert_eq!(table.classify("game.prg"), Some("PRG"));
        assert_eq!(table.classify("tape.t64"), Some("T64"));
        assert_eq!(table.classify("file.f64"), Some("F64"));
        assert_eq!(table.classify("cart.crt"), Some("CRT"));
        assert_eq!(table.classify("tape.tap"), Some("TAP"));
        assert_eq!(table.classify("disk.d81"), Some("D81"));
        assert_eq!(table.classify("disk.d71"), Some("D71"));
    }

    #[test]
    fn test_classify_unmatched_extension() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify("readme.txt"), None);
        assert_eq!(table.classify("noextension"), None);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify("GAME.PRG"), None);
        assert_eq!(table.classify("game.Prg"), None);
        assert_eq!(table.classify("game.prg"), Some("PRG"));
    }

    #[test]
    fn test_classify_matches_literal_suffix() {
        let table = CategoryTable::builtin();
        // Suffix matching, so extra dots in the name are irrelevant.
        assert_eq!(table.classify("backup.old.d64"), Some("D64"));
        // A bare dotfile named exactly like the extension still matches.
        assert_eq!(table.classify(".prg"), Some("PRG"));
    }

    #[test]
    fn test_bucket_letters_normalized_to_lowercase() {
        assert_eq!(Bucket::of("game.prg"), Bucket::Letter('g'));
        assert_eq!(Bucket::of("Game.prg"), Bucket::Letter('g'));
        assert_eq!(Bucket::of("ZORK.d64"), Bucket::Letter('z'));
        assert_eq!(Bucket::of("game.prg").dir_name(), "g");
    }

    #[test]
    fn test_bucket_non_alphabetic_leads() {
        assert_eq!(Bucket::of("1tape.tap"), Bucket::NonAlphabetic);
        assert_eq!(Bucket::of("_demo.prg"), Bucket::NonAlphabetic);
        assert_eq!(Bucket::of("9lives.d64"), Bucket::NonAlphabetic);
        assert_eq!(Bucket::of("1tape.tap").dir_name(), "0_9");
    }

    #[test]
    fn test_bucket_non_ascii_lead_is_catch_all() {
        // Only ASCII letters get letter buckets.
        assert_eq!(Bucket::of("äther.prg"), Bucket::NonAlphabetic);
    }

    #[test]
    fn test_placement_destination_dir() {
        let table = CategoryTable::builtin();
        let placement = table.placement_for("game.prg").expect("should classify");
        assert_eq!(placement.category, "PRG");
        assert_eq!(
            placement.destination_dir(Path::new("/dest")),
            PathBuf::from("/dest/PRG/g")
        );

        let placement = table.placement_for("1tape.tap").expect("should classify");
        assert_eq!(
            placement.destination_dir(Path::new("/dest")),
            PathBuf::from("/dest/TAP/0_9")
        );
    }

    #[test]
    fn test_custom_table() {
        let mut table = CategoryTable::from_entries(BTreeMap::new());
        assert!(table.is_empty());
        table.add_category("SID", ".sid");
        assert_eq!(table.classify("tune.sid"), Some("SID"));
        assert_eq!(table.classify("game.prg"), None);
    }
}
