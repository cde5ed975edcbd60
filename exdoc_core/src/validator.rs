use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::MetadataError;
use crate::loader::is_absolute_url;
use crate::model::Category;
use crate::model::Example;
use crate::registry::Registries;

/// Validate the complete merged corpus.
///
/// Per-example checks re-run here because merging can introduce services and
/// versions the loader never saw together; the corpus-wide duplicate passes
/// are the reason this must see the whole mapping at once. All passes run to
/// completion — findings accumulate, they never short-circuit each other.
///
/// `github_root` is the directory github links resolve against. It is only
/// guaranteed to be available at this stage, which is why link existence is
/// checked here rather than in the loader. `None` skips the existence check.
pub fn validate(
	corpus: &BTreeMap<String, Example>,
	registries: &Registries,
	github_root: Option<&Path>,
) -> Vec<MetadataError> {
	let mut errors = Vec::new();

	for example in corpus.values() {
		check_services(example, registries, &mut errors);
		check_github_links(example, github_root, &mut errors);
	}

	check_duplicate_api_ownership(corpus, &mut errors);
	check_duplicate_title_abbrevs(corpus, &mut errors);

	debug!(
		examples = corpus.len(),
		errors = errors.len(),
		"validated corpus"
	);

	errors
}

fn check_services(example: &Example, registries: &Registries, errors: &mut Vec<MetadataError>) {
	for service in example.services.keys() {
		if !registries.is_known_service(service) {
			errors.push(MetadataError::UnknownService {
				file: example.file.clone(),
				id: example.id.clone(),
				service: service.clone(),
				language: None,
			});
		}
	}
}

fn check_github_links(
	example: &Example,
	github_root: Option<&Path>,
	errors: &mut Vec<MetadataError>,
) {
	let Some(root) = github_root else {
		return;
	};

	for language in example.languages.values() {
		for version in &language.versions {
			let Some(link) = &version.github else {
				continue;
			};
			if is_absolute_url(link) || root.join(link).exists() {
				continue;
			}
			errors.push(MetadataError::MissingGithubLink {
				file: example.file.clone(),
				id: example.id.clone(),
				language: language.name.clone(),
				sdk_version: version.sdk_version,
				link: link.clone(),
			});
		}
	}
}

/// Every `(service, action)` pair may be owned by at most one `Api`
/// example. Ownership buckets are keyed `<service>:<action>`.
fn check_duplicate_api_ownership(
	corpus: &BTreeMap<String, Example>,
	errors: &mut Vec<MetadataError>,
) {
	let mut owners: BTreeMap<(String, String), Vec<&Example>> = BTreeMap::new();

	for example in corpus.values() {
		if example.category != Category::Api {
			continue;
		}
		for (service, action) in example.service_actions() {
			owners
				.entry((service.to_string(), action.to_string()))
				.or_default()
				.push(example);
		}
	}

	for ((service, action), examples) in owners {
		if examples.len() < 2 {
			continue;
		}
		let first = examples[0];
		errors.push(MetadataError::DuplicateApiExample {
			file: first.file.clone(),
			id: first.id.clone(),
			service,
			action,
			ids: examples.iter().map(|example| example.id.clone()).collect(),
		});
	}
}

/// Two examples rendering the same navigation label for the same service and
/// category would be ambiguous to a reader. Uniqueness is decided by the
/// `(title_abbrev, service, category)` triple.
fn check_duplicate_title_abbrevs(
	corpus: &BTreeMap<String, Example>,
	errors: &mut Vec<MetadataError>,
) {
	let mut buckets: BTreeMap<String, BTreeMap<String, Vec<&Example>>> = BTreeMap::new();

	for example in corpus.values() {
		// Absent abbreviations are already reported as missing fields.
		if example.title_abbrev.is_empty() {
			continue;
		}
		for service in example.services.keys() {
			let group = format!("{service}:{}", example.category.as_str());
			buckets
				.entry(example.title_abbrev.clone())
				.or_default()
				.entry(group)
				.or_default()
				.push(example);
		}
	}

	for (title_abbrev, groups) in buckets {
		for (group, examples) in groups {
			if examples.len() < 2 {
				continue;
			}
			let first = examples[0];
			errors.push(MetadataError::DuplicateTitleAbbrev {
				file: first.file.clone(),
				id: first.id.clone(),
				title_abbrev: title_abbrev.clone(),
				group,
				ids: examples.iter().map(|example| example.id.clone()).collect(),
			});
		}
	}
}
