use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{NgramError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|err| NgramError::io(err, Some(path.to_path_buf())))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a whole file as raw bytes, attaching the path to any failure.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>> {
	let path = filename.as_ref();
	fs::read(path).map_err(|err| NgramError::io(err, Some(path.to_path_buf())))
}

/// Writes `bytes` to `filename`, creating missing parent folders first.
pub(crate) fn write_bytes<P: AsRef<Path>>(filename: P, bytes: &[u8]) -> Result<()> {
	let path = filename.as_ref();
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent).map_err(|err| NgramError::io(err, Some(parent.to_path_buf())))?;
		}
	}
	fs::write(path, bytes).map_err(|err| NgramError::io(err, Some(path.to_path_buf())))
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/methods.txt` + `"bin"` → `data/methods.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path.file_stem().ok_or_else(|| {
		NgramError::InvalidConfig(format!("input path {} has no filename", input_path.display()))
	})?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn output_path_swaps_extension() {
		let path = build_output_path("data/methods.txt", "bin").unwrap();
		assert_eq!(path, PathBuf::from("data/methods.bin"));
	}

	#[test]
	fn output_path_requires_a_filename() {
		assert!(build_output_path("..", "bin").is_err());
	}

	#[test]
	fn write_then_read_creates_parent_folders() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested/out.txt");
		write_bytes(&path, b"one\r\ntwo\n").unwrap();
		assert_eq!(read_lines(&path).unwrap(), vec!["one", "two"]);
	}

	#[test]
	fn missing_file_reports_its_path() {
		let err = read_bytes("does/not/exist.bin").unwrap_err();
		assert!(matches!(err, NgramError::Io { path: Some(_), .. }));
	}
}
