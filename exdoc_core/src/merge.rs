use std::collections::BTreeMap;

use tracing::debug;

use crate::MetadataError;
use crate::model::Example;
use crate::model::Language;

/// Merge an incoming example into the canonical record with the same id.
///
/// The policy is deliberately asymmetric and therefore non-associative: the
/// record that created the canonical example first wins every scalar display
/// field and every already-present service entry. Incoming records only ever
/// contribute languages the canonical example lacks, or new SDK versions
/// within an existing language. Downstream callers rely on this
/// canonical-source precedence; do not make it symmetric.
pub fn merge(canonical: &mut Example, incoming: Example) -> Vec<MetadataError> {
	let mut errors = Vec::new();

	if canonical.id != incoming.id {
		errors.push(MetadataError::ExampleMergeMismatchedId {
			file: canonical.file.clone(),
			id: canonical.id.clone(),
			other_file: incoming.file,
			other_id: incoming.id,
		});
		return errors;
	}

	for (service, actions) in incoming.services {
		// First writer wins: an already-present service keeps its action
		// set even when the incoming record disagrees.
		canonical.services.entry(service).or_insert(actions);
	}

	for (name, language) in incoming.languages {
		match canonical.languages.get_mut(&name) {
			None => {
				canonical.languages.insert(name, language);
			}
			Some(existing) => {
				merge_language(
					canonical.id.as_str(),
					&canonical.file,
					&incoming.file,
					existing,
					language,
					&mut errors,
				);
			}
		}
	}

	errors
}

fn merge_language(
	id: &str,
	file: &std::path::Path,
	other_file: &std::path::Path,
	canonical: &mut Language,
	incoming: Language,
	errors: &mut Vec<MetadataError>,
) {
	// Unreachable when callers group by map key, but checked anyway.
	if canonical.name != incoming.name {
		errors.push(MetadataError::ExampleMergeMismatchedLanguage {
			file: file.to_path_buf(),
			id: id.to_string(),
			other_file: other_file.to_path_buf(),
			language: canonical.name.clone(),
			other_language: incoming.name,
		});
		return;
	}

	for version in incoming.versions {
		if canonical.has_sdk_version(version.sdk_version) {
			// Same-identity versions are never reconciled field by field:
			// they are either redundant or a hard conflict.
			errors.push(MetadataError::ExampleMergeConflict {
				file: file.to_path_buf(),
				id: id.to_string(),
				other_file: other_file.to_path_buf(),
				language: canonical.name.clone(),
				sdk_version: version.sdk_version,
			});
		} else {
			canonical.versions.push(version);
		}
	}
}

/// Fold a batch of loaded examples into one canonical record per id.
///
/// Input order decides which record becomes canonical for each id, so
/// callers feeding multiple tributaries should pass the official source
/// first.
pub fn merge_all(examples: Vec<Example>) -> (BTreeMap<String, Example>, Vec<MetadataError>) {
	let mut canonical: BTreeMap<String, Example> = BTreeMap::new();
	let mut errors = Vec::new();

	let total = examples.len();
	for example in examples {
		match canonical.get_mut(&example.id) {
			None => {
				canonical.insert(example.id.clone(), example);
			}
			Some(existing) => {
				errors.append(&mut merge(existing, example));
			}
		}
	}

	debug!(
		input = total,
		canonical = canonical.len(),
		errors = errors.len(),
		"merged examples"
	);

	(canonical, errors)
}
