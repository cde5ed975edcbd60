use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::MetadataError;
use crate::model::Example;

/// The finalized output of a run: the canonical corpus plus every finding.
///
/// The engine only reports — a non-empty error list is the caller's signal
/// not to publish, not an engine-level failure.
#[derive(Debug, Serialize)]
pub struct Report {
	/// Canonical examples keyed by id. Examples that failed validation are
	/// retained here alongside their findings.
	pub examples: BTreeMap<String, Example>,
	/// All accumulated findings in canonical order.
	pub errors: Vec<MetadataError>,
}

impl Report {
	/// Build a report, putting the findings into canonical order.
	pub fn new(examples: BTreeMap<String, Example>, mut errors: Vec<MetadataError>) -> Self {
		sort_errors(&mut errors);
		Self { examples, errors }
	}

	/// Returns true when the run found no problems.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}

	/// Render all findings as human-readable one-line messages grouped by
	/// file, followed by a summary line.
	pub fn render_text(&self) -> String {
		let mut output = String::new();

		let mut grouped: BTreeMap<PathBuf, Vec<&MetadataError>> = BTreeMap::new();
		for error in &self.errors {
			grouped.entry(error.file().to_path_buf()).or_default().push(error);
		}

		for (file, errors) in &grouped {
			let _ = writeln!(output, "{}:", file.display());
			for error in errors {
				let _ = writeln!(output, "  {error}");
			}
		}

		if self.is_ok() {
			let _ = writeln!(output, "{} example(s), no problems found", self.examples.len());
		} else {
			let _ = writeln!(
				output,
				"{} problem(s) found across {} file(s)",
				self.errors.len(),
				grouped.len()
			);
		}

		output
	}
}

/// Canonical finding order for reproducible diagnostics: `(file, id)`,
/// breaking ties by line and rendered message.
pub fn sort_errors(errors: &mut [MetadataError]) {
	errors.sort_by_cached_key(|error| {
		(
			error.file().to_path_buf(),
			error.id().to_string(),
			error.line().unwrap_or(0),
			error.to_string(),
		)
	});
}
