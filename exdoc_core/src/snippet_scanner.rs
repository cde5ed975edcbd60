use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use tracing::debug;
use tracing::trace;

use crate::MetadataError;
use crate::TagType;

/// Marker keyword opening a named extractable region.
pub const SNIPPET_START: &str = "snippet-start:[";
/// Marker keyword closing a named extractable region.
pub const SNIPPET_END: &str = "snippet-end:[";

/// File extensions the default walker considers snippet sources.
const SOURCE_EXTENSIONS: &[&str] = &[
	"abap", "c", "cpp", "cs", "go", "h", "java", "js", "jsx", "kt", "mjs", "php", "py", "rb",
	"rs", "sh", "swift", "ts", "tsx",
];

/// Scan a source tree for snippet-marker pairing problems.
///
/// Walking stays minimal on purpose: `file_predicate` decides which paths
/// are candidates and `file_reader` supplies their text, so callers own the
/// ignore rules and I/O policy. A file whose reader fails is skipped
/// silently — this is best-effort auditing of text sources, and one
/// unreadable file must never abort the scan of the rest of the tree.
pub fn scan<P, R>(root: &Path, mut file_predicate: P, mut file_reader: R) -> Vec<MetadataError>
where
	P: FnMut(&Path) -> bool,
	R: FnMut(&Path) -> std::io::Result<String>,
{
	let mut errors = Vec::new();
	let mut scanned = 0usize;

	for path in candidate_files(root) {
		if !file_predicate(&path) {
			continue;
		}
		let Ok(content) = file_reader(&path) else {
			trace!(path = %path.display(), "skipping unreadable file");
			continue;
		};
		scanned += 1;
		scan_file(&path, &content, &mut errors);
	}

	debug!(
		root = %root.display(),
		files = scanned,
		errors = errors.len(),
		"scanned source tree for snippet markers"
	);

	errors
}

/// Scan a tree with the default predicate (known source extensions) and
/// reader (UTF-8 file contents). Binary or otherwise unreadable files are
/// skipped.
pub fn scan_tree(root: &Path) -> Vec<MetadataError> {
	let sources = source_file_set();
	scan(root, |path| sources.is_match(path), |path| {
		std::fs::read_to_string(path)
	})
}

/// Check one file's lines for marker pairing problems, appending findings.
///
/// Matching is per file: every start tag needs exactly one end tag in the
/// same file, and a tag may open (or close) at most once per file. The same
/// tag correctly paired in two different files is fine.
pub fn scan_file(path: &Path, content: &str, errors: &mut Vec<MetadataError>) {
	let mut starts: BTreeMap<String, usize> = BTreeMap::new();
	let mut ends: BTreeMap<String, usize> = BTreeMap::new();
	let mut seen: BTreeSet<String> = BTreeSet::new();

	for (index, line) in content.lines().enumerate() {
		let line_number = index + 1;

		if let Some(tag) = extract_tag(line, SNIPPET_START) {
			record_tag(
				path,
				&mut starts,
				&mut seen,
				tag,
				TagType::Start,
				line_number,
				errors,
			);
		} else if let Some(tag) = extract_tag(line, SNIPPET_END) {
			record_tag(
				path,
				&mut ends,
				&mut seen,
				tag,
				TagType::End,
				line_number,
				errors,
			);
		}
	}

	for tag in &seen {
		match (starts.get(tag), ends.get(tag)) {
			(Some(&line), None) => errors.push(MetadataError::UnmatchedSnippetTag {
				file: path.to_path_buf(),
				tag: tag.clone(),
				tag_type: TagType::Start,
				line,
			}),
			(None, Some(&line)) => errors.push(MetadataError::UnmatchedSnippetTag {
				file: path.to_path_buf(),
				tag: tag.clone(),
				tag_type: TagType::End,
				line,
			}),
			_ => {}
		}
	}
}

fn record_tag(
	path: &Path,
	first_lines: &mut BTreeMap<String, usize>,
	seen: &mut BTreeSet<String>,
	tag: String,
	tag_type: TagType,
	line: usize,
	errors: &mut Vec<MetadataError>,
) {
	seen.insert(tag.clone());
	if first_lines.contains_key(&tag) {
		errors.push(MetadataError::DuplicateSnippetTag {
			file: path.to_path_buf(),
			tag,
			tag_type,
			line,
		});
	} else {
		first_lines.insert(tag, line);
	}
}

/// Pull the bracketed identifier out of a marker line, if the line carries
/// the given keyword. The identifier is whatever sits between `[` and the
/// next `]`, trimmed.
fn extract_tag(line: &str, keyword: &str) -> Option<String> {
	let start = line.find(keyword)? + keyword.len();
	let rest = &line[start..];
	let end = rest.find(']')?;
	Some(rest[..end].trim().to_string())
}

/// Deterministic candidate list for the default walker: gitignore-aware,
/// hidden files skipped, sorted by path.
fn candidate_files(root: &Path) -> Vec<PathBuf> {
	let mut files: Vec<PathBuf> = WalkBuilder::new(root)
		.build()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
		.map(ignore::DirEntry::into_path)
		.collect();
	files.sort();
	files
}

/// Build the default matcher: known source-code extensions only.
pub fn source_file_set() -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for extension in SOURCE_EXTENSIONS {
		if let Ok(glob) = Glob::new(&format!("*.{extension}")) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}
