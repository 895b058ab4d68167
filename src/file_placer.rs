/// File placement: directory creation plus move/copy into category buckets.
///
/// This module performs (or simulates) the filesystem side of a run. Each
/// file follows a single linear path: ensure the destination directory,
/// confirm an overwrite if a move collides, then act or skip. Nothing is
/// retried and no state survives between files.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cli::{Action, RunConfig};
use crate::file_category::Placement;
use crate::output::OutputFormatter;

/// Errors that can occur while organizing files.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory does not exist or is not a directory.
    SourceNotFound { path: PathBuf },
    /// Failed to read an entry while walking the source directory.
    TraversalFailed { path: PathBuf, source: io::Error },
    /// Failed to create a destination directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file into its destination directory.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to copy a file into its destination directory.
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// A candidate path has no filename component.
    InvalidFileName { path: PathBuf },
    /// The overwrite confirmation could not be read.
    PromptFailed { source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Source directory not found: {}", path.display())
            }
            Self::TraversalFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::CopyFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidFileName { path } => {
                write!(f, "Path has no file name: {}", path.display())
            }
            Self::PromptFailed { source } => {
                write!(f, "Failed to read overwrite confirmation: {}", source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Decides whether an existing file at the destination may be replaced.
///
/// The binary wires in a stdin prompt; tests supply deterministic answers.
/// Copies never consult this, only moves that collide with an existing file.
pub trait OverwritePrompt {
    /// Returns true when `destination` may be overwritten.
    fn confirm_overwrite(&self, destination: &Path) -> io::Result<bool>;
}

/// What happened to a single placed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The file was moved to its destination.
    Moved,
    /// The file was copied to its destination.
    Copied,
    /// Dry-run mode: the action was reported, nothing was touched.
    Simulated,
    /// A move collided and the overwrite was declined; both files untouched.
    Declined,
}

/// Places files into `<destination>/<category>/<bucket>/` directories.
pub struct Placer<'a> {
    destination_base: &'a Path,
    action: Action,
    verbose: bool,
    dry_run: bool,
    prompt: &'a dyn OverwritePrompt,
}

impl<'a> Placer<'a> {
    /// Creates a placer for one run. Dry-run implies verbose reporting.
    pub fn new(config: &'a RunConfig, prompt: &'a dyn OverwritePrompt) -> Self {
        Self {
            destination_base: &config.destination,
            action: config.action,
            verbose: config.verbose || config.dry_run,
            dry_run: config.dry_run,
            prompt,
        }
    }

    /// Performs (or simulates) the configured action for one file.
    ///
    /// In dry-run mode the intended directory creation and file operation are
    /// reported and `PlaceOutcome::Simulated` is returned without touching
    /// the filesystem or consulting the prompt.
    pub fn place(&self, source: &Path, placement: &Placement) -> OrganizeResult<PlaceOutcome> {
        let destination_dir = placement.destination_dir(self.destination_base);

        if self.dry_run {
            if !destination_dir.is_dir() {
                OutputFormatter::dry_run_notice(&format!(
                    "Would create directory: {}",
                    destination_dir.display()
                ));
            }
            OutputFormatter::dry_run_notice(&format!(
                "Would {}: {} -> {}",
                self.action.verb(),
                source.display(),
                destination_dir.display()
            ));
            return Ok(PlaceOutcome::Simulated);
        }

        match self.action {
            Action::Move => self.move_file(source, &destination_dir),
            Action::Copy => self.copy_file(source, &destination_dir),
        }
    }

    /// Creates `dir` and any missing ancestors. Idempotent.
    fn ensure_directory(&self, dir: &Path) -> OrganizeResult<()> {
        if dir.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        if self.verbose {
            OutputFormatter::info(&format!("Created directory: {}", dir.display()));
        }
        Ok(())
    }

    /// Moves `source` into `destination_dir`, asking before overwriting.
    fn move_file(&self, source: &Path, destination_dir: &Path) -> OrganizeResult<PlaceOutcome> {
        let destination_file = destination_dir.join(file_name_of(source)?);
        self.ensure_directory(destination_dir)?;

        if destination_file.exists() {
            if self.verbose {
                OutputFormatter::warning(&format!(
                    "File already exists: {}",
                    destination_file.display()
                ));
            }

            let overwrite = self
                .prompt
                .confirm_overwrite(&destination_file)
                .map_err(|e| OrganizeError::PromptFailed { source: e })?;

            if !overwrite {
                if self.verbose {
                    OutputFormatter::plain(&format!("Skipped: {}", source.display()));
                }
                return Ok(PlaceOutcome::Declined);
            }

            fs::remove_file(&destination_file).map_err(|e| OrganizeError::MoveFailed {
                source: source.to_path_buf(),
                destination: destination_file.clone(),
                source_error: e,
            })?;
        }

        rename_file(source, &destination_file).map_err(|e| OrganizeError::MoveFailed {
            source: source.to_path_buf(),
            destination: destination_file.clone(),
            source_error: e,
        })?;

        if self.verbose {
            OutputFormatter::success(&format!(
                "Moved: {} -> {}",
                source.display(),
                destination_file.display()
            ));
        }
        Ok(PlaceOutcome::Moved)
    }

    /// Copies `source` into `destination_dir`, replacing any existing file
    /// of the same name without confirmation.
    fn copy_file(&self, source: &Path, destination_dir: &Path) -> OrganizeResult<PlaceOutcome> {
        let destination_file = destination_dir.join(file_name_of(source)?);
        self.ensure_directory(destination_dir)?;

        fs::copy(source, &destination_file).map_err(|e| OrganizeError::CopyFailed {
            source: source.to_path_buf(),
            destination: destination_file.clone(),
            source_error: e,
        })?;

        if self.verbose {
            OutputFormatter::success(&format!(
                "Copied: {} -> {}",
                source.display(),
                destination_file.display()
            ));
        }
        Ok(PlaceOutcome::Copied)
    }
}

/// Renames `source` to `destination`, falling back to copy+remove when the
/// destination is on a different filesystem.
fn rename_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}

fn file_name_of(path: &Path) -> OrganizeResult<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| OrganizeError::InvalidFileName {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_category::CategoryTable;
    use tempfile::TempDir;

    struct AcceptAll;

    impl OverwritePrompt for AcceptAll {
        fn confirm_overwrite(&self, _destination: &Path) -> io::Result<bool> {
            Ok(true)
        }
    }

    struct DeclineAll;

    impl OverwritePrompt for DeclineAll {
        fn confirm_overwrite(&self, _destination: &Path) -> io::Result<bool> {
            Ok(false)
        }
    }

    struct NeverAsked;

    impl OverwritePrompt for NeverAsked {
        fn confirm_overwrite(&self, destination: &Path) -> io::Result<bool> {
            panic!("prompt consulted unexpectedly for {}", destination.display());
        }
    }

    fn config(destination: &Path, action: Action, dry_run: bool) -> RunConfig {
        RunConfig {
            source: PathBuf::from("."),
            destination: destination.to_path_buf(),
            action,
            recursive: false,
            verbose: false,
            dry_run,
        }
    }

    fn placement_for(name: &str) -> Placement {
        CategoryTable::builtin()
            .placement_for(name)
            .expect("name should classify")
    }

    #[test]
    fn test_move_creates_directories_and_moves() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("game.prg");
        fs::write(&file, b"program data").expect("Failed to write test file");

        let config = config(dest_dir.path(), Action::Move, false);
        let placer = Placer::new(&config, &NeverAsked);
        let outcome = placer
            .place(&file, &placement_for("game.prg"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Moved);
        assert!(!file.exists());
        let placed = dest_dir.path().join("PRG").join("g").join("game.prg");
        assert!(placed.exists());
        assert_eq!(fs::read(&placed).expect("read"), b"program data");
    }

    #[test]
    fn test_copy_leaves_source_in_place() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("disk.d64");
        fs::write(&file, b"disk image").expect("Failed to write test file");

        let config = config(dest_dir.path(), Action::Copy, false);
        let placer = Placer::new(&config, &NeverAsked);
        let outcome = placer
            .place(&file, &placement_for("disk.d64"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Copied);
        assert!(file.exists());
        assert!(dest_dir.path().join("D64").join("d").join("disk.d64").exists());
    }

    #[test]
    fn test_copy_overwrites_without_asking() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("disk.d64");
        fs::write(&file, b"new contents").expect("Failed to write test file");

        let existing = dest_dir.path().join("D64").join("d").join("disk.d64");
        fs::create_dir_all(existing.parent().unwrap()).expect("Failed to create dirs");
        fs::write(&existing, b"old contents").expect("Failed to write existing file");

        let config = config(dest_dir.path(), Action::Copy, false);
        let placer = Placer::new(&config, &NeverAsked);
        let outcome = placer
            .place(&file, &placement_for("disk.d64"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Copied);
        assert_eq!(fs::read(&existing).expect("read"), b"new contents");
    }

    #[test]
    fn test_move_declined_leaves_both_files() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("game.prg");
        fs::write(&file, b"source version").expect("Failed to write test file");

        let existing = dest_dir.path().join("PRG").join("g").join("game.prg");
        fs::create_dir_all(existing.parent().unwrap()).expect("Failed to create dirs");
        fs::write(&existing, b"destination version").expect("Failed to write existing file");

        let config = config(dest_dir.path(), Action::Move, false);
        let placer = Placer::new(&config, &DeclineAll);
        let outcome = placer
            .place(&file, &placement_for("game.prg"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Declined);
        assert_eq!(fs::read(&file).expect("read"), b"source version");
        assert_eq!(fs::read(&existing).expect("read"), b"destination version");
    }

    #[test]
    fn test_move_accepted_replaces_destination() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("game.prg");
        fs::write(&file, b"source version").expect("Failed to write test file");

        let existing = dest_dir.path().join("PRG").join("g").join("game.prg");
        fs::create_dir_all(existing.parent().unwrap()).expect("Failed to create dirs");
        fs::write(&existing, b"destination version").expect("Failed to write existing file");

        let config = config(dest_dir.path(), Action::Move, false);
        let placer = Placer::new(&config, &AcceptAll);
        let outcome = placer
            .place(&file, &placement_for("game.prg"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Moved);
        assert!(!file.exists());
        assert_eq!(fs::read(&existing).expect("read"), b"source version");
    }

    #[test]
    fn test_move_without_collision_never_prompts() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("tape.t64");
        fs::write(&file, b"tape data").expect("Failed to write test file");

        let config = config(dest_dir.path(), Action::Move, false);
        let placer = Placer::new(&config, &NeverAsked);
        placer
            .place(&file, &placement_for("tape.t64"))
            .expect("place should succeed");
    }

    #[test]
    fn test_dry_run_touches_nothing_and_never_prompts() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("game.prg");
        fs::write(&file, b"program data").expect("Failed to write test file");

        // A collision exists, but dry-run must not reach the prompt.
        let existing = dest_dir.path().join("PRG").join("g").join("game.prg");
        fs::create_dir_all(existing.parent().unwrap()).expect("Failed to create dirs");
        fs::write(&existing, b"destination version").expect("Failed to write existing file");

        let config = config(dest_dir.path(), Action::Move, true);
        let placer = Placer::new(&config, &NeverAsked);
        let outcome = placer
            .place(&file, &placement_for("game.prg"))
            .expect("place should succeed");

        assert_eq!(outcome, PlaceOutcome::Simulated);
        assert_eq!(fs::read(&file).expect("read"), b"program data");
        assert_eq!(fs::read(&existing).expect("read"), b"destination version");
    }

    #[test]
    fn test_dry_run_creates_no_directories() {
        let source_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = TempDir::new().expect("Failed to create temp directory");

        let file = source_dir.path().join("cart.crt");
        fs::write(&file, b"cart data").expect("Failed to write test file");

        let config = config(dest_dir.path(), Action::Copy, true);
        let placer = Placer::new(&config, &NeverAsked);
        placer
            .place(&file, &placement_for("cart.crt"))
            .expect("place should succeed");

        assert!(!dest_dir.path().join("CRT").exists());
    }
}
