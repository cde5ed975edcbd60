use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::ExdocError;
use crate::ExdocResult;

/// The read-only registries the loader validates references against.
///
/// Supplied by the caller once per run; the engine never mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registries {
	/// Known service identifiers (e.g. `s3`, `sns`).
	#[serde(default)]
	pub services: BTreeSet<String>,
	/// Known language names (e.g. `Java`, `Rust`).
	#[serde(default)]
	pub languages: BTreeSet<String>,
	/// Known cross-content block identifiers.
	#[serde(default)]
	pub cross_content: BTreeSet<String>,
}

impl Registries {
	/// Build registries from plain lists, mostly useful in tests and for
	/// embedding callers.
	pub fn new<S, L, C>(services: S, languages: L, cross_content: C) -> Self
	where
		S: IntoIterator<Item = String>,
		L: IntoIterator<Item = String>,
		C: IntoIterator<Item = String>,
	{
		Self {
			services: services.into_iter().collect(),
			languages: languages.into_iter().collect(),
			cross_content: cross_content.into_iter().collect(),
		}
	}

	/// Load registries from a YAML file.
	///
	/// A missing or malformed registries file is an environment mistake and
	/// fails the run outright, unlike content-validation findings.
	pub fn load(path: &Path) -> ExdocResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|error| ExdocError::Registry {
			path: path.display().to_string(),
			reason: error.to_string(),
		})?;
		serde_yaml_ng::from_str(&content).map_err(|error| ExdocError::Registry {
			path: path.display().to_string(),
			reason: error.to_string(),
		})
	}

	pub fn is_known_service(&self, service: &str) -> bool {
		self.services.contains(service)
	}

	pub fn is_known_language(&self, language: &str) -> bool {
		self.languages.contains(language)
	}

	pub fn is_known_cross_content(&self, block: &str) -> bool {
		self.cross_content.contains(block)
	}
}
