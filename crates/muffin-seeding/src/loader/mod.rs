//! Definition file discovery.
//!
//! Factory definitions can live in JSON (or YAML, with the `yaml` feature)
//! files under one or more directories. [`DefinitionLoader`] walks those
//! directories and hands back every parsed file, skipping files already
//! marked loaded.

mod format;
mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

pub use format::{DefinitionFormat, DefinitionRecord};
pub use parser::DefinitionParser;

use crate::error::{SeedingError, SeedingResult};

/// Outcome of a [`load_factories`](crate::Muffin::load_factories) call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
	/// Files parsed by this call. Files loaded earlier are not counted.
	pub files: usize,

	/// Definitions registered by this call.
	pub definitions: usize,
}

/// A parsed definition file.
#[derive(Debug, Clone)]
pub struct DefinitionFile {
	/// Canonical path of the file.
	pub path: PathBuf,

	/// Records in file order.
	pub records: Vec<DefinitionRecord>,
}

/// Walks definition directories, loading each file at most once.
#[derive(Debug, Default)]
pub struct DefinitionLoader {
	parser: DefinitionParser,
	loaded: Mutex<HashSet<PathBuf>>,
}

impl DefinitionLoader {
	/// Creates a loader with no files loaded.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses every definition file under `paths` not loaded before.
	///
	/// Every path is checked before any file is read. Directories are walked
	/// recursively in file-name order. Files with other extensions are
	/// skipped.
	///
	/// Returned files are not marked loaded. The caller marks each one with
	/// [`mark_loaded`](Self::mark_loaded) once its records are registered, so
	/// a file whose records fail to register is read again by a later call.
	///
	/// # Errors
	///
	/// - [`SeedingError::DirectoryNotFound`] if a path is not a directory.
	/// - The first parse error encountered.
	pub fn load<P: AsRef<Path>>(&self, paths: &[P]) -> SeedingResult<Vec<DefinitionFile>> {
		for path in paths {
			let path = path.as_ref();
			if !path.is_dir() {
				return Err(SeedingError::DirectoryNotFound(path.display().to_string()));
			}
		}

		let mut files = Vec::new();
		for path in paths {
			for file in self.discover(path.as_ref()) {
				let canonical = std::fs::canonicalize(&file)?;
				if self.loaded.lock().contains(&canonical) {
					tracing::debug!(path = %canonical.display(), "definition file already loaded");
					continue;
				}

				let records = self.parser.parse_file(&canonical)?;
				files.push(DefinitionFile {
					path: canonical,
					records,
				});
			}
		}
		Ok(files)
	}

	/// Records the canonical path of a file returned by [`load`](Self::load)
	/// as loaded.
	pub fn mark_loaded(&self, path: impl Into<PathBuf>) {
		self.loaded.lock().insert(path.into());
	}

	/// Returns true if the file at `path` has been loaded.
	pub fn is_loaded(&self, path: &Path) -> bool {
		std::fs::canonicalize(path)
			.map(|canonical| self.loaded.lock().contains(&canonical))
			.unwrap_or(false)
	}

	/// Forgets every loaded file.
	pub fn reset(&self) {
		self.loaded.lock().clear();
	}

	fn discover(&self, root: &Path) -> Vec<PathBuf> {
		walkdir::WalkDir::new(root)
			.follow_links(true)
			.sort_by_file_name()
			.into_iter()
			.filter_map(|entry| match entry {
				Ok(entry) => Some(entry),
				Err(error) => {
					tracing::warn!(root = %root.display(), error = %error, "skipping unreadable entry");
					None
				}
			})
			.filter(|entry| entry.file_type().is_file())
			.filter_map(|entry| {
				let path = entry.into_path();
				match DefinitionFormat::from_path(&path) {
					Some(format) if format.is_enabled() => Some(path),
					Some(format) => {
						tracing::warn!(
							path = %path.display(),
							format = %format,
							"skipping definition file, format support is not enabled"
						);
						None
					}
					None => None,
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::fs;

	fn write(dir: &Path, name: &str, content: &str) {
		let path = dir.join(name);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).unwrap();
		}
		fs::write(path, content).unwrap();
	}

	#[rstest]
	fn test_load_walks_in_name_order() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "b.json", r#"{"model": "B"}"#);
		write(dir.path(), "a.json", r#"{"model": "A"}"#);
		write(dir.path(), "nested/c.json", r#"[{"model": "C"}, {"model": "D"}]"#);
		write(dir.path(), "notes.txt", "ignored");

		let loader = DefinitionLoader::new();
		let files = loader.load(&[dir.path()]).unwrap();

		let models: Vec<&str> = files
			.iter()
			.flat_map(|file| file.records.iter().map(|record| record.model.as_str()))
			.collect();
		assert_eq!(models, vec!["A", "B", "C", "D"]);
	}

	#[rstest]
	fn test_load_each_file_once() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "user.json", r#"{"model": "User"}"#);

		let loader = DefinitionLoader::new();
		let files = loader.load(&[dir.path()]).unwrap();
		assert_eq!(files.len(), 1);
		assert!(!loader.is_loaded(&dir.path().join("user.json")));

		loader.mark_loaded(files[0].path.clone());
		assert!(loader.is_loaded(&dir.path().join("user.json")));
		assert!(loader.load(&[dir.path(), dir.path()]).unwrap().is_empty());

		loader.reset();
		assert_eq!(loader.load(&[dir.path()]).unwrap().len(), 1);
	}

	#[rstest]
	fn test_missing_directory() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("missing");

		let result = DefinitionLoader::new().load(&[missing]);
		assert!(matches!(result, Err(SeedingError::DirectoryNotFound(_))));
	}

	#[rstest]
	fn test_file_path_is_not_a_directory() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "user.json", r#"{"model": "User"}"#);

		let result = DefinitionLoader::new().load(&[dir.path().join("user.json")]);
		assert!(matches!(result, Err(SeedingError::DirectoryNotFound(_))));
	}

	#[rstest]
	fn test_failed_file_is_not_marked_loaded() {
		let dir = tempfile::tempdir().unwrap();
		write(dir.path(), "broken.json", "{");

		let loader = DefinitionLoader::new();
		assert!(loader.load(&[dir.path()]).is_err());
		assert!(!loader.is_loaded(&dir.path().join("broken.json")));
	}
}
