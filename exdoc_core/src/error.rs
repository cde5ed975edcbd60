use std::path::Path;
use std::path::PathBuf;

use miette::Diagnostic;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Fatal failures that abort a run outright.
///
/// Everything content-shaped accumulates as [`MetadataError`] instead; only
/// environment and authoring mistakes — unreadable input, input that is not
/// structured data at all, an empty document, or a document attempting
/// unsafe dynamic construction — stop the pipeline.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ExdocError {
	#[error(transparent)]
	#[diagnostic(code(exdoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse metadata document `{path}`: {reason}")]
	#[diagnostic(
		code(exdoc::parse),
		help("the document must be a YAML mapping from example id to record")
	)]
	Parse { path: String, reason: String },

	#[error("metadata document `{0}` is empty")]
	#[diagnostic(
		code(exdoc::empty_document),
		help("an empty record set is an authoring mistake, not a valid corpus")
	)]
	EmptyDocument(String),

	#[error("metadata document `{path}` uses the unsupported YAML tag `{tag}`")]
	#[diagnostic(
		code(exdoc::unsafe_document),
		help("custom tags can trigger dynamic construction in permissive loaders and are rejected")
	)]
	UnsafeDocument { path: String, tag: String },

	#[error("failed to load registries file `{path}`: {reason}")]
	#[diagnostic(
		code(exdoc::registry),
		help("the registries file needs `services`, `languages`, and `cross_content` lists")
	)]
	Registry { path: String, reason: String },
}

pub type ExdocResult<T> = Result<T, ExdocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

/// Which half of a snippet-marker pair an unmatched tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
	Start,
	End,
}

impl TagType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::End => "end",
		}
	}
}

/// A content-validation finding.
///
/// These are values, never thrown: every component appends to a shared
/// collection and keeps going, so one bad record cannot hide problems in the
/// rest of the corpus. Each variant carries enough context — origin file,
/// example id, and where relevant the language and SDK version — to be
/// actionable on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MetadataError {
	#[error("{id}: missing required field `{field}`")]
	MissingField {
		file: PathBuf,
		id: String,
		field: String,
		language: Option<String>,
	},

	#[error("{id}: unknown service `{service}`")]
	UnknownService {
		file: PathBuf,
		id: String,
		service: String,
		language: Option<String>,
	},

	#[error("{id}: unknown language `{language}`")]
	UnknownLanguage {
		file: PathBuf,
		id: String,
		language: String,
	},

	#[error("{id}: github link `{link}` must not have a file extension ({language} v{sdk_version})")]
	InvalidGithubLink {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
		link: String,
	},

	#[error("{id}: github link `{link}` does not resolve to an existing path ({language} v{sdk_version})")]
	MissingGithubLink {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
		link: String,
	},

	#[error("{id}: sdkguide `{guide}` must not be an absolute documentation URL ({language} v{sdk_version})")]
	InvalidSdkGuideStart {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
		guide: String,
	},

	#[error("{id}: version has neither block_content nor excerpts ({language} v{sdk_version})")]
	MissingBlockContentAndExcerpt {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
	},

	#[error("{id}: version has both block_content and excerpts ({language} v{sdk_version})")]
	BlockContentAndExcerptConflict {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
	},

	#[error("{id}: Api-category example cannot add services ({language} v{sdk_version})")]
	ApiExampleCannotAddService {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
	},

	#[error("{id}: unknown cross-content block `{block}` ({language} v{sdk_version})")]
	MissingCrossContent {
		file: PathBuf,
		id: String,
		language: String,
		sdk_version: u32,
		block: String,
	},

	#[error("{id}: `{field}` uses `{entity}`, which is not an allowed entity")]
	AwsNotEntity {
		file: PathBuf,
		id: String,
		field: String,
		entity: String,
	},

	#[error("{id}: id must be `<service>_<rest>` with a known service or `cross`")]
	NameFormat { file: PathBuf, id: String },

	#[error("{id}: link `{url}` is missing a title")]
	UrlMissingTitle {
		file: PathBuf,
		id: String,
		url: String,
		language: Option<String>,
		sdk_version: Option<u32>,
	},

	#[error("{id}: cannot merge record for `{other_id}` from `{}`", .other_file.display())]
	ExampleMergeMismatchedId {
		file: PathBuf,
		id: String,
		other_file: PathBuf,
		other_id: String,
	},

	#[error("{id}: merge saw language `{other_language}` filed under `{language}`")]
	ExampleMergeMismatchedLanguage {
		file: PathBuf,
		id: String,
		other_file: PathBuf,
		language: String,
		other_language: String,
	},

	#[error("{id}: duplicate version {sdk_version} for language `{language}` in `{}`", .other_file.display())]
	ExampleMergeConflict {
		file: PathBuf,
		id: String,
		other_file: PathBuf,
		language: String,
		sdk_version: u32,
	},

	#[error("{id}: action `{service}:{action}` is claimed by multiple Api examples: {}", .ids.join(", "))]
	DuplicateApiExample {
		file: PathBuf,
		id: String,
		service: String,
		action: String,
		ids: Vec<String>,
	},

	#[error("{id}: title_abbrev `{title_abbrev}` is ambiguous within `{group}`: {}", .ids.join(", "))]
	DuplicateTitleAbbrev {
		file: PathBuf,
		id: String,
		title_abbrev: String,
		/// `<service>:<category>` bucket the collision occurred in.
		group: String,
		ids: Vec<String>,
	},

	#[error("duplicate snippet tag `{tag}` (line {line})")]
	DuplicateSnippetTag {
		file: PathBuf,
		tag: String,
		tag_type: TagType,
		line: usize,
	},

	#[error("unmatched snippet-{} tag `{tag}` (line {line})", .tag_type.as_str())]
	UnmatchedSnippetTag {
		file: PathBuf,
		tag: String,
		tag_type: TagType,
		line: usize,
	},
}

impl MetadataError {
	/// The file the finding points at.
	pub fn file(&self) -> &Path {
		match self {
			Self::MissingField { file, .. }
			| Self::UnknownService { file, .. }
			| Self::UnknownLanguage { file, .. }
			| Self::InvalidGithubLink { file, .. }
			| Self::MissingGithubLink { file, .. }
			| Self::InvalidSdkGuideStart { file, .. }
			| Self::MissingBlockContentAndExcerpt { file, .. }
			| Self::BlockContentAndExcerptConflict { file, .. }
			| Self::ApiExampleCannotAddService { file, .. }
			| Self::MissingCrossContent { file, .. }
			| Self::AwsNotEntity { file, .. }
			| Self::NameFormat { file, .. }
			| Self::UrlMissingTitle { file, .. }
			| Self::ExampleMergeMismatchedId { file, .. }
			| Self::ExampleMergeMismatchedLanguage { file, .. }
			| Self::ExampleMergeConflict { file, .. }
			| Self::DuplicateApiExample { file, .. }
			| Self::DuplicateTitleAbbrev { file, .. }
			| Self::DuplicateSnippetTag { file, .. }
			| Self::UnmatchedSnippetTag { file, .. } => file,
		}
	}

	/// The example id the finding belongs to. Snippet-scanner findings have
	/// no example context and return the empty string.
	pub fn id(&self) -> &str {
		match self {
			Self::MissingField { id, .. }
			| Self::UnknownService { id, .. }
			| Self::UnknownLanguage { id, .. }
			| Self::InvalidGithubLink { id, .. }
			| Self::MissingGithubLink { id, .. }
			| Self::InvalidSdkGuideStart { id, .. }
			| Self::MissingBlockContentAndExcerpt { id, .. }
			| Self::BlockContentAndExcerptConflict { id, .. }
			| Self::ApiExampleCannotAddService { id, .. }
			| Self::MissingCrossContent { id, .. }
			| Self::AwsNotEntity { id, .. }
			| Self::NameFormat { id, .. }
			| Self::UrlMissingTitle { id, .. }
			| Self::ExampleMergeMismatchedId { id, .. }
			| Self::ExampleMergeMismatchedLanguage { id, .. }
			| Self::ExampleMergeConflict { id, .. }
			| Self::DuplicateApiExample { id, .. }
			| Self::DuplicateTitleAbbrev { id, .. } => id,
			Self::DuplicateSnippetTag { .. } | Self::UnmatchedSnippetTag { .. } => "",
		}
	}

	/// 1-indexed line number for findings that point into a source file.
	pub fn line(&self) -> Option<usize> {
		match self {
			Self::DuplicateSnippetTag { line, .. } | Self::UnmatchedSnippetTag { line, .. } => {
				Some(*line)
			}
			_ => None,
		}
	}
}
