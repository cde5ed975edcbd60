use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml_ng::Value;
use tracing::debug;

use crate::ExdocError;
use crate::ExdocResult;
use crate::MetadataError;
use crate::model::Category;
use crate::model::Example;
use crate::model::Excerpt;
use crate::model::Genai;
use crate::model::Language;
use crate::model::Person;
use crate::model::Url;
use crate::model::Version;
use crate::registry::Registries;

/// Entity placeholders allowed inside display text. Anything else shaped
/// like `&word;` or `&word-word;` is reported as `AwsNotEntity`.
pub const ALLOWED_ENTITIES: &[&str] = &[
	"&AWS;",
	"&AWS-Region;",
	"&AWS-Regions;",
	"&AWS-account;",
	"&AWS-accounts;",
	"&AWS-service;",
	"&AWS-services;",
	"&SDK;",
	"&SDKs;",
	"&S3;",
	"&SNS;",
	"&SQS;",
	"&DDB;",
	"&IAM;",
	"&EC2;",
	"&RDS;",
	"&LAM;",
	"&CW;",
	"&STS;",
];

/// Canonical documentation host. `sdkguide` references must be relative and
/// must not start with this prefix.
pub const DOC_HOST_PREFIX: &str = "https://docs.aws.amazon.com";

/// Id prefix token for examples that span services.
pub const CROSS_SERVICE_TOKEN: &str = "cross";

/// Raw code fragment as authored in the metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExcerpt {
	pub description: Option<String>,
	pub snippet_tags: Vec<String>,
	pub snippet_files: Vec<String>,
	pub genai: Genai,
}

/// Raw SDK-version revision as authored in the metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawVersion {
	/// Absent or unparseable versions deserialize to `0` and are reported as
	/// a missing field rather than rejected.
	pub sdk_version: u32,
	pub block_content: Option<String>,
	pub excerpts: Vec<RawExcerpt>,
	pub github: Option<String>,
	pub sdkguide: Option<String>,
	pub more_info: Vec<Url>,
	pub add_services: BTreeMap<String, BTreeSet<String>>,
}

/// Raw language binding as authored in the metadata document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLanguage {
	pub versions: Vec<RawVersion>,
}

/// One example record as authored in the metadata document.
///
/// Every field is optional at this boundary; the loader makes "absent vs
/// empty" explicit so nothing downstream re-interprets raw input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExample {
	pub title: Option<String>,
	pub title_abbrev: Option<String>,
	pub synopsis: Option<String>,
	pub synopsis_list: Vec<String>,
	pub category: Option<String>,
	pub guide_topic: Option<Url>,
	pub service_main: Option<String>,
	pub services: BTreeMap<String, BTreeSet<String>>,
	pub languages: BTreeMap<String, RawLanguage>,
	pub author: Option<Person>,
	pub source_key: Option<String>,
}

/// One parsed metadata document: the origin file plus its records keyed by
/// example id.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
	pub file: PathBuf,
	pub records: BTreeMap<String, RawExample>,
}

/// Parse a metadata document into a [`RecordSet`].
///
/// This is the only stage with fatal outcomes: a document that is not valid
/// YAML, parses to nothing, or carries YAML tags (the hook permissive
/// loaders use for dynamic object construction) aborts the run. Everything
/// after this point accumulates [`MetadataError`]s instead.
pub fn parse_document(path: &Path, text: &str) -> ExdocResult<RecordSet> {
	if text.trim().is_empty() {
		return Err(ExdocError::EmptyDocument(path.display().to_string()));
	}

	let value: Value = serde_yaml_ng::from_str(text).map_err(|error| ExdocError::Parse {
		path: path.display().to_string(),
		reason: error.to_string(),
	})?;

	if let Some(tag) = find_yaml_tag(&value) {
		return Err(ExdocError::UnsafeDocument {
			path: path.display().to_string(),
			tag,
		});
	}

	let is_empty = match &value {
		Value::Null => true,
		Value::Mapping(mapping) => mapping.is_empty(),
		_ => false,
	};
	if is_empty {
		return Err(ExdocError::EmptyDocument(path.display().to_string()));
	}

	let records: BTreeMap<String, RawExample> =
		serde_yaml_ng::from_value(value).map_err(|error| ExdocError::Parse {
			path: path.display().to_string(),
			reason: error.to_string(),
		})?;

	debug!(path = %path.display(), records = records.len(), "parsed metadata document");

	Ok(RecordSet {
		file: path.to_path_buf(),
		records,
	})
}

/// Read and parse a metadata document from disk.
pub fn parse_document_file(path: &Path) -> ExdocResult<RecordSet> {
	let text = std::fs::read_to_string(path)?;
	parse_document(path, &text)
}

/// Find the first YAML tag anywhere in a parsed value.
fn find_yaml_tag(value: &Value) -> Option<String> {
	match value {
		Value::Tagged(tagged) => Some(tagged.tag.to_string()),
		Value::Sequence(items) => items.iter().find_map(find_yaml_tag),
		Value::Mapping(mapping) => mapping
			.iter()
			.find_map(|(key, item)| find_yaml_tag(key).or_else(|| find_yaml_tag(item))),
		_ => None,
	}
}

/// Convert a record set into examples plus every finding made along the way.
///
/// Loading never fails outright: missing-but-required fields get placeholder
/// values alongside a `MissingField` finding so downstream components always
/// have a shape to operate on.
pub fn load(record_set: &RecordSet, registries: &Registries) -> (Vec<Example>, Vec<MetadataError>) {
	let mut examples = Vec::with_capacity(record_set.records.len());
	let mut errors = Vec::new();

	for (id, raw) in &record_set.records {
		examples.push(load_record(
			id,
			raw,
			&record_set.file,
			registries,
			&mut errors,
		));
	}

	debug!(
		file = %record_set.file.display(),
		examples = examples.len(),
		errors = errors.len(),
		"loaded record set"
	);

	(examples, errors)
}

fn load_record(
	id: &str,
	raw: &RawExample,
	file: &Path,
	registries: &Registries,
	errors: &mut Vec<MetadataError>,
) -> Example {
	check_id_format(id, file, registries, errors);

	let title = required_field(id, file, "title", raw.title.as_deref(), errors);
	let title_abbrev = required_field(
		id,
		file,
		"title_abbrev",
		raw.title_abbrev.as_deref(),
		errors,
	);
	let synopsis = raw.synopsis.clone().unwrap_or_default();

	check_entities(id, file, "title", &title, errors);
	check_entities(id, file, "title_abbrev", &title_abbrev, errors);
	check_entities(id, file, "synopsis", &synopsis, errors);

	let category = match &raw.category {
		Some(category) => Category::from(category.clone()),
		None if raw.services.len() == 1 => Category::Api,
		None => Category::Cross,
	};

	for service in raw.services.keys() {
		if !registries.is_known_service(service) {
			errors.push(MetadataError::UnknownService {
				file: file.to_path_buf(),
				id: id.to_string(),
				service: service.clone(),
				language: None,
			});
		}
	}

	if let Some(guide_topic) = &raw.guide_topic {
		check_url(id, file, guide_topic, None, None, errors);
	}

	let mut languages = BTreeMap::new();
	for (name, raw_language) in &raw.languages {
		if !registries.is_known_language(name) {
			errors.push(MetadataError::UnknownLanguage {
				file: file.to_path_buf(),
				id: id.to_string(),
				language: name.clone(),
			});
		}

		let versions = raw_language
			.versions
			.iter()
			.map(|raw_version| {
				load_version(id, raw_version, name, &category, file, registries, errors)
			})
			.collect();

		languages.insert(
			name.clone(),
			Language {
				name: name.clone(),
				versions,
			},
		);
	}

	Example {
		id: id.to_string(),
		file: file.to_path_buf(),
		title,
		title_abbrev,
		synopsis,
		synopsis_list: raw.synopsis_list.clone(),
		category,
		guide_topic: raw.guide_topic.clone(),
		service_main: raw.service_main.clone(),
		services: raw.services.clone(),
		languages,
		author: raw.author.clone(),
		source_key: raw.source_key.clone(),
	}
}

fn load_version(
	id: &str,
	raw: &RawVersion,
	language: &str,
	category: &Category,
	file: &Path,
	registries: &Registries,
	errors: &mut Vec<MetadataError>,
) -> Version {
	let sdk_version = raw.sdk_version;

	if sdk_version == 0 {
		errors.push(MetadataError::MissingField {
			file: file.to_path_buf(),
			id: id.to_string(),
			field: "sdk_version".to_string(),
			language: Some(language.to_string()),
		});
	}

	if let Some(github) = &raw.github {
		if has_file_extension(github) {
			errors.push(MetadataError::InvalidGithubLink {
				file: file.to_path_buf(),
				id: id.to_string(),
				language: language.to_string(),
				sdk_version,
				link: github.clone(),
			});
		}
	}

	if let Some(sdkguide) = &raw.sdkguide {
		if sdkguide.starts_with(DOC_HOST_PREFIX) {
			errors.push(MetadataError::InvalidSdkGuideStart {
				file: file.to_path_buf(),
				id: id.to_string(),
				language: language.to_string(),
				sdk_version,
				guide: sdkguide.clone(),
			});
		}
	}

	match (&raw.block_content, raw.excerpts.is_empty()) {
		(Some(_), false) => errors.push(MetadataError::BlockContentAndExcerptConflict {
			file: file.to_path_buf(),
			id: id.to_string(),
			language: language.to_string(),
			sdk_version,
		}),
		(None, true) => errors.push(MetadataError::MissingBlockContentAndExcerpt {
			file: file.to_path_buf(),
			id: id.to_string(),
			language: language.to_string(),
			sdk_version,
		}),
		_ => {}
	}

	if let Some(block) = &raw.block_content {
		if !registries.is_known_cross_content(block) {
			errors.push(MetadataError::MissingCrossContent {
				file: file.to_path_buf(),
				id: id.to_string(),
				language: language.to_string(),
				sdk_version,
				block: block.clone(),
			});
		}
	}

	if !raw.add_services.is_empty() && *category == Category::Api {
		errors.push(MetadataError::ApiExampleCannotAddService {
			file: file.to_path_buf(),
			id: id.to_string(),
			language: language.to_string(),
			sdk_version,
		});
	}

	for service in raw.add_services.keys() {
		if !registries.is_known_service(service) {
			errors.push(MetadataError::UnknownService {
				file: file.to_path_buf(),
				id: id.to_string(),
				service: service.clone(),
				language: Some(language.to_string()),
			});
		}
	}

	for url in &raw.more_info {
		check_url(
			id,
			file,
			url,
			Some(language.to_string()),
			Some(sdk_version),
			errors,
		);
	}

	Version {
		sdk_version,
		block_content: raw.block_content.clone(),
		excerpts: raw.excerpts.iter().map(load_excerpt).collect(),
		github: raw.github.clone(),
		sdkguide: raw.sdkguide.clone(),
		more_info: raw.more_info.clone(),
		add_services: raw.add_services.clone(),
	}
}

fn load_excerpt(raw: &RawExcerpt) -> Excerpt {
	Excerpt {
		description: raw.description.clone(),
		snippet_tags: raw.snippet_tags.clone(),
		snippet_files: raw.snippet_files.clone(),
		genai: raw.genai,
	}
}

/// Return the field's value or an empty placeholder plus a `MissingField`
/// finding when it is absent or blank.
fn required_field(
	id: &str,
	file: &Path,
	field: &str,
	value: Option<&str>,
	errors: &mut Vec<MetadataError>,
) -> String {
	match value {
		Some(value) if !value.trim().is_empty() => value.to_string(),
		_ => {
			errors.push(MetadataError::MissingField {
				file: file.to_path_buf(),
				id: id.to_string(),
				field: field.to_string(),
				language: None,
			});
			String::new()
		}
	}
}

/// `<service>_<rest>` with a non-empty rest, where the service segment is a
/// registered service or the cross-service token.
fn check_id_format(
	id: &str,
	file: &Path,
	registries: &Registries,
	errors: &mut Vec<MetadataError>,
) {
	let valid = match id.split_once('_') {
		Some((service, rest)) => {
			!rest.is_empty()
				&& (service == CROSS_SERVICE_TOKEN || registries.is_known_service(service))
		}
		None => false,
	};

	if !valid {
		errors.push(MetadataError::NameFormat {
			file: file.to_path_buf(),
			id: id.to_string(),
		});
	}
}

fn check_url(
	id: &str,
	file: &Path,
	url: &Url,
	language: Option<String>,
	sdk_version: Option<u32>,
	errors: &mut Vec<MetadataError>,
) {
	if !url.url.is_empty() && url.title.trim().is_empty() {
		errors.push(MetadataError::UrlMissingTitle {
			file: file.to_path_buf(),
			id: id.to_string(),
			url: url.url.clone(),
			language,
			sdk_version,
		});
	}
}

/// Report every placeholder-shaped substring of `text` that is not on the
/// entity allow-list.
fn check_entities(
	id: &str,
	file: &Path,
	field: &str,
	text: &str,
	errors: &mut Vec<MetadataError>,
) {
	for entity in scan_entity_candidates(text) {
		if !ALLOWED_ENTITIES.contains(&entity.as_str()) {
			errors.push(MetadataError::AwsNotEntity {
				file: file.to_path_buf(),
				id: id.to_string(),
				field: field.to_string(),
				entity,
			});
		}
	}
}

/// Scan raw text for `&word;` / `&word-word;` shaped placeholders. Words are
/// ASCII alphanumeric runs joined by single hyphens.
fn scan_entity_candidates(text: &str) -> Vec<String> {
	let bytes = text.as_bytes();
	let mut candidates = Vec::new();
	let mut index = 0;

	while index < bytes.len() {
		if bytes[index] != b'&' {
			index += 1;
			continue;
		}

		let start = index;
		let mut cursor = index + 1;
		let mut last_was_word = false;

		while cursor < bytes.len() {
			let byte = bytes[cursor];
			if byte.is_ascii_alphanumeric() {
				last_was_word = true;
				cursor += 1;
			} else if byte == b'-' && last_was_word {
				last_was_word = false;
				cursor += 1;
			} else {
				break;
			}
		}

		if last_was_word && cursor < bytes.len() && bytes[cursor] == b';' {
			candidates.push(text[start..=cursor].to_string());
			index = cursor + 1;
		} else {
			index += 1;
		}
	}

	candidates
}

/// Whether a github reference's final path component carries a file
/// extension. Links must point at directories or extensionless files.
pub(crate) fn has_file_extension(link: &str) -> bool {
	let trimmed = link.trim_end_matches('/');
	let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
	match last.rsplit_once('.') {
		Some((stem, ext)) => !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()),
		None => false,
	}
}

/// Whether a github reference is an absolute URL rather than a
/// repository-relative path.
pub(crate) fn is_absolute_url(link: &str) -> bool {
	link.starts_with("http://") || link.starts_with("https://")
}
