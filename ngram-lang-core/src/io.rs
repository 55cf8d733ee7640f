use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::warn;

use crate::corpus::SourceMap;
use crate::error::{LangError, Result};

/// Reads a whole document as UTF-8 text.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String> {
	let path = path.as_ref();
	fs::read_to_string(path).map_err(|e| LangError::io(path, e))
}

/// Lists the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
	let dir = dir.as_ref();
	let mut files = Vec::new();

	for entry in fs::read_dir(dir).map_err(|e| LangError::io(dir, e))? {
		let path = entry.map_err(|e| LangError::io(dir, e))?.path();
		if path.is_file() {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Resolves a document argument into document paths.
///
/// - A file resolves to itself
/// - A directory resolves to the files it directly contains
/// - Anything else is reported and resolves to nothing
pub fn resolve_documents<P: AsRef<Path>>(path: P) -> Vec<PathBuf> {
	let path = path.as_ref();
	if path.is_file() {
		vec![path.to_path_buf()]
	} else if path.is_dir() {
		list_files(path).unwrap_or_else(|e| {
			warn!("{e}");
			Vec::new()
		})
	} else {
		warn!("File or directory {} does not exist", path.display());
		Vec::new()
	}
}

/// Parses a language source list.
///
/// Each non-blank line reads `Name path [path...]`, where every path is a
/// document or a directory of documents. A name may appear on several
/// lines; its documents accumulate in order.
///
/// No line is rejected: the first token is always taken as the name, a
/// name-only line registers a language without documents, and paths that
/// do not exist are logged and skipped.
///
/// # Example
/// ```text
/// English english1.txt english2.txt
/// French  french/
/// Unknown tbd.txt
/// ```
pub fn parse_source_list<R: BufRead>(reader: R) -> std::io::Result<SourceMap> {
	let mut sources = SourceMap::new();
	for line in reader.lines() {
		let line = line?;
		let mut fields = line.split_whitespace();
		let Some(name) = fields.next() else {
			continue;
		};
		let documents: Vec<PathBuf> = fields.flat_map(resolve_documents).collect();
		sources.entry(name).extend(documents);
	}
	Ok(sources)
}

/// Reads and parses a language source list file.
pub fn read_source_list<P: AsRef<Path>>(path: P) -> Result<SourceMap> {
	let path = path.as_ref();
	let file = fs::File::open(path).map_err(|e| LangError::io(path, e))?;
	parse_source_list(std::io::BufReader::new(file)).map_err(|e| LangError::io(path, e))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn list_files_skips_directories() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "b").unwrap();
		fs::write(dir.path().join("a.txt"), "a").unwrap();
		fs::create_dir(dir.path().join("nested")).unwrap();

		let files = list_files(dir.path()).unwrap();
		assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
	}

	#[test]
	fn read_document_reports_path() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("missing.txt");
		match read_document(&missing) {
			Err(LangError::Io { path, .. }) => assert_eq!(path, missing),
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn parse_source_list_resolves_files_and_directories() {
		let dir = tempfile::tempdir().unwrap();
		let english = dir.path().join("english.txt");
		fs::write(&english, "hello").unwrap();
		let french = dir.path().join("french");
		fs::create_dir(&french).unwrap();
		fs::write(french.join("1.txt"), "bonjour").unwrap();
		fs::write(french.join("2.txt"), "salut").unwrap();

		let list = format!(
			"English {}\n\n  French   {}  {}\nEnglish {}\nUnknown\n",
			english.display(),
			french.display(),
			dir.path().join("nowhere.txt").display(),
			english.display(),
		);
		let sources = parse_source_list(Cursor::new(list)).unwrap();

		assert_eq!(sources.names().collect::<Vec<_>>(), vec!["English", "French", "Unknown"]);
		assert_eq!(sources.get("English").unwrap(), &[english.clone(), english]);
		assert_eq!(sources.get("French").unwrap(), &[french.join("1.txt"), french.join("2.txt")]);
		assert!(sources.get("Unknown").unwrap().is_empty());
	}

	#[test]
	fn odd_lines_are_accepted() {
		let dir = tempfile::tempdir().unwrap();
		let doc = dir.path().join("doc.txt");
		fs::write(&doc, "text").unwrap();

		let list = format!("\tGerman\t{}\n#comment\n  \t \nÉlvish ???\n", doc.display());
		let sources = parse_source_list(Cursor::new(list)).unwrap();

		assert_eq!(sources.names().collect::<Vec<_>>(), vec!["German", "#comment", "Élvish"]);
		assert_eq!(sources.get("German").unwrap(), &[doc]);
		assert!(sources.get("#comment").unwrap().is_empty());
		assert!(sources.get("Élvish").unwrap().is_empty());
	}
}
