use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Classification tag controlling where an example is displayed.
///
/// `Api` examples document a single service action; `Cross` examples span
/// several services. Anything else is carried verbatim as [`Category::Other`]
/// so that downstream renderers with custom sections keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
	Api,
	#[default]
	Cross,
	Other(String),
}

impl Category {
	/// The canonical string form of this category.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Api => "Api",
			Self::Cross => "Cross",
			Self::Other(other) => other.as_str(),
		}
	}
}

impl From<String> for Category {
	fn from(value: String) -> Self {
		match value.as_str() {
			"Api" => Self::Api,
			"Cross" => Self::Cross,
			_ => Self::Other(value),
		}
	}
}

impl From<Category> for String {
	fn from(value: Category) -> Self {
		value.as_str().to_string()
	}
}

/// How much of an excerpt's content was machine-generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genai {
	#[default]
	None,
	Some,
	Most,
	All,
}

/// A titled external link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
}

/// A contributor credited on an example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub alias: String,
}

/// A single code fragment to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
	/// Optional prose shown above the fragment.
	#[serde(default)]
	pub description: Option<String>,
	/// Marker identifiers to extract from source files.
	#[serde(default)]
	pub snippet_tags: Vec<String>,
	/// Whole-file paths to extract verbatim.
	#[serde(default)]
	pub snippet_files: Vec<String>,
	#[serde(default)]
	pub genai: Genai,
}

/// One SDK-version revision of a language binding.
///
/// Exactly one of `block_content` and `excerpts` must be populated; the
/// loader reports a [`MetadataError`](crate::MetadataError) when neither or
/// both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
	/// Major SDK version. `0` means the input omitted it, which the loader
	/// reports as a missing field.
	pub sdk_version: u32,
	/// Reference to an externally-authored cross-content block, used instead
	/// of inline excerpts.
	#[serde(default)]
	pub block_content: Option<String>,
	#[serde(default)]
	pub excerpts: Vec<Excerpt>,
	/// Repository-relative path to the source on a public code host, or an
	/// absolute URL. Must not carry a file extension.
	#[serde(default)]
	pub github: Option<String>,
	/// Legacy guide reference. Must not be an absolute documentation URL.
	#[serde(default)]
	pub sdkguide: Option<String>,
	#[serde(default)]
	pub more_info: Vec<Url>,
	/// Extra services contributed by this version. Only legal on non-`Api`
	/// examples.
	#[serde(default)]
	pub add_services: BTreeMap<String, BTreeSet<String>>,
}

/// One programming-language binding of an example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
	pub name: String,
	/// Ordered revisions; `sdk_version` values are unique within a language.
	#[serde(default)]
	pub versions: Vec<Version>,
}

impl Language {
	/// Whether this language already carries a revision for `sdk_version`.
	pub fn has_sdk_version(&self, sdk_version: u32) -> bool {
		self
			.versions
			.iter()
			.any(|version| version.sdk_version == sdk_version)
	}
}

/// The canonical unit of documentation content.
///
/// Created by the loader from one input record, mutated only by the merge
/// engine (which adds new languages and versions, never replaces existing
/// ones), and never deleted — an example that fails validation stays in the
/// result set alongside its errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
	/// Stable slug, unique within the corpus. Immutable once created; two
	/// examples are the same example iff their ids are equal.
	pub id: String,
	/// Origin path of the record, for error reporting.
	pub file: PathBuf,
	pub title: String,
	pub title_abbrev: String,
	pub synopsis: String,
	/// Ordered synopsis bullets, used when `synopsis` alone is not enough.
	#[serde(default)]
	pub synopsis_list: Vec<String>,
	pub category: Category,
	/// Optional link into the developer guide.
	#[serde(default)]
	pub guide_topic: Option<Url>,
	/// Optional primary service when several are referenced.
	#[serde(default)]
	pub service_main: Option<String>,
	/// Service identifier to the set of actions documented for it.
	#[serde(default)]
	pub services: BTreeMap<String, BTreeSet<String>>,
	/// Language bindings keyed by language name.
	#[serde(default)]
	pub languages: BTreeMap<String, Language>,
	/// Contributor credited for the example, if any.
	#[serde(default)]
	pub author: Option<Person>,
	/// Provenance tag identifying the tributary the record came from.
	#[serde(default)]
	pub source_key: Option<String>,
}

impl Example {
	/// Iterate over every `(service, action)` pair this example claims.
	pub fn service_actions(&self) -> impl Iterator<Item = (&str, &str)> {
		self.services.iter().flat_map(|(service, actions)| {
			actions
				.iter()
				.map(move |action| (service.as_str(), action.as_str()))
		})
	}
}
