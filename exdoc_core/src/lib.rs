//! `exdoc_core` is the metadata engine behind [exdoc]. It ingests structured
//! metadata describing a corpus of documentation examples — each example in
//! several language variants, each variant in several SDK-version revisions —
//! merges records from independent tributaries into one canonical record per
//! example, validates the merged corpus, and audits source trees for paired
//! snippet markers.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Metadata documents (YAML)
//!   → Loader (records → Examples, findings accumulate per record)
//!   → Merge engine (one canonical Example per id, first writer wins)
//!   → Cross-corpus validator (duplicate ownership, duplicate titles,
//!     unknown references, github link existence)
//!   → Snippet-marker scanner (independent pass over the source tree)
//!   → Report (canonically sorted findings, pass/fail signal)
//! ```
//!
//! ## Modules
//!
//! - [`model`] — the metadata entity types (`Example`, `Language`,
//!   `Version`, `Excerpt`, `Url`, `Person`) and their invariants.
//! - [`loader`] — document parsing and per-record loading. Content problems
//!   accumulate as [`MetadataError`]s; only unparseable, empty, or unsafe
//!   documents abort the run.
//! - [`merge`] — the deliberately non-associative merge algorithm.
//! - [`validator`] — checks that only make sense over the whole corpus.
//! - [`snippet_scanner`] — paired start/end marker auditing per file.
//! - [`report`] — deterministic ordering and rendering of findings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use exdoc_core::CheckOptions;
//! use exdoc_core::Registries;
//! use exdoc_core::check_corpus;
//! use exdoc_core::loader::parse_document_file;
//!
//! let registries = Registries::load(Path::new("registries.yaml")).unwrap();
//! let record_set = parse_document_file(Path::new("metadata.yaml")).unwrap();
//!
//! let report = check_corpus(vec![record_set], &registries, &CheckOptions {
//! 	github_root: Some(Path::new(".")),
//! 	scan_root: Some(Path::new(".")),
//! });
//! if !report.is_ok() {
//! 	eprintln!("{}", report.render_text());
//! }
//! ```
//!
//! [exdoc]: https://github.com/exdoc-rs/exdoc

use std::path::Path;

pub use error::*;
pub use model::*;
pub use registry::Registries;
pub use report::Report;
pub use report::sort_errors;

pub mod error;
pub mod loader;
pub mod merge;
pub mod model;
pub mod registry;
pub mod report;
pub mod snippet_scanner;
pub mod validator;

#[cfg(test)]
mod __fixtures;

/// Options for a full corpus check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions<'a> {
	/// Directory github links resolve against. `None` skips the existence
	/// check.
	pub github_root: Option<&'a Path>,
	/// Source tree to audit for snippet markers. `None` skips the scan.
	pub scan_root: Option<&'a Path>,
}

/// Run the whole pipeline over already-parsed record sets: load every
/// record, merge records sharing an id, validate the merged corpus, and
/// union in the snippet-marker scan.
///
/// Record-set order matters: the first record seen for an id becomes the
/// canonical example, so pass the official tributary first.
pub fn check_corpus(
	record_sets: Vec<loader::RecordSet>,
	registries: &Registries,
	options: &CheckOptions<'_>,
) -> Report {
	let mut examples = Vec::new();
	let mut errors = Vec::new();

	for record_set in &record_sets {
		let (mut loaded, mut load_errors) = loader::load(record_set, registries);
		examples.append(&mut loaded);
		errors.append(&mut load_errors);
	}

	let (corpus, mut merge_errors) = merge::merge_all(examples);
	errors.append(&mut merge_errors);

	errors.extend(validator::validate(&corpus, registries, options.github_root));

	if let Some(scan_root) = options.scan_root {
		errors.extend(snippet_scanner::scan_tree(scan_root));
	}

	Report::new(corpus, errors)
}
