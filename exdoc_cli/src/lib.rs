use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Merge and validate documentation-example metadata before it ships.",
	long_about = "exdoc ingests documentation-example metadata from one or more tributaries, \
	              merges it into one canonical record per example, validates the merged corpus \
	              for internal consistency, and audits source trees for paired snippet \
	              markers.\n\nQuick start:\n  exdoc check -m metadata.yaml -r registries.yaml   \
	              Validate a metadata document\n  exdoc scan --root .                              \
	              Audit snippet markers only"
)]
pub struct ExdocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Load, merge, and validate metadata documents, then audit the source
	/// tree for snippet-marker problems.
	///
	/// Documents are processed in the order given; the first record seen for
	/// an example id becomes the canonical one, so pass the official
	/// tributary first. Exits with a non-zero status code when any finding
	/// is reported — ideal for CI pipelines guarding a docs corpus.
	Check {
		/// Metadata documents to load, in tributary precedence order.
		#[arg(long, short, required = true, num_args = 1..)]
		metadata: Vec<PathBuf>,

		/// Registries file with the known services, languages, and
		/// cross-content block identifiers.
		#[arg(long, short)]
		registries: PathBuf,

		/// Source-tree root. Github links are resolved against it and it is
		/// scanned for snippet markers. Without it both checks are skipped.
		#[arg(long)]
		root: Option<PathBuf>,

		/// Skip the snippet-marker scan even when --root is given.
		#[arg(long, default_value_t = false)]
		no_scan: bool,

		/// Output format for findings.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Audit a source tree for snippet-marker pairing problems only.
	Scan {
		/// Source-tree root to scan.
		#[arg(long, default_value = ".")]
		root: PathBuf,

		/// Output format for findings.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable findings grouped by file.
	Text,
	/// Machine-readable JSON for programmatic consumption.
	Json,
}
