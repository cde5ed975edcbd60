use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use exdoc_cli::Commands;
use exdoc_cli::ExdocCli;
use exdoc_cli::OutputFormat;
use exdoc_core::AnyEmptyResult;
use exdoc_core::CheckOptions;
use exdoc_core::Registries;
use exdoc_core::Report;
use exdoc_core::check_corpus;
use exdoc_core::loader::parse_document_file;
use exdoc_core::snippet_scanner;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ExdocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose);

	let result = match args.command {
		Some(Commands::Check {
			metadata,
			registries,
			root,
			no_scan,
			format,
		}) => run_check(&metadata, &registries, root.as_deref(), no_scan, format),
		Some(Commands::Scan { root, format }) => run_scan(&root, format),
		None => {
			eprintln!("No subcommand specified. Run `exdoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render fatal engine errors through miette for help text and error
		// codes; anything else gets a plain one-liner.
		match e.downcast::<exdoc_core::ExdocError>() {
			Ok(exdoc_err) => {
				let report: miette::Report = (*exdoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		tracing_subscriber::EnvFilter::new("exdoc_core=debug,exdoc_cli=debug")
	} else {
		tracing_subscriber::EnvFilter::from_default_env()
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn run_check(
	metadata: &[PathBuf],
	registries_path: &Path,
	root: Option<&Path>,
	no_scan: bool,
	format: OutputFormat,
) -> AnyEmptyResult {
	let registries = Registries::load(registries_path)?;

	let mut record_sets = Vec::with_capacity(metadata.len());
	for path in metadata {
		record_sets.push(parse_document_file(path)?);
	}

	let report = check_corpus(
		record_sets,
		&registries,
		&CheckOptions {
			github_root: root,
			scan_root: if no_scan { None } else { root },
		},
	);

	emit_report(&report, format);
	if !report.is_ok() {
		process::exit(1);
	}

	if format == OutputFormat::Text {
		println!(
			"{}",
			colored!(
				format!("{} example(s) validated, corpus is consistent", report.examples.len()),
				green
			)
		);
	}
	Ok(())
}

fn run_scan(root: &Path, format: OutputFormat) -> AnyEmptyResult {
	let errors = snippet_scanner::scan_tree(root);
	let report = Report::new(BTreeMap::new(), errors);

	emit_report(&report, format);
	if !report.is_ok() {
		process::exit(1);
	}

	if format == OutputFormat::Text {
		println!("{}", colored!("no snippet-marker problems found", green));
	}
	Ok(())
}

/// Print findings in the requested format. Success summaries are left to the
/// callers, which know what was actually checked.
fn emit_report(report: &Report, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			println!(
				"{}",
				serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
			);
		}
		OutputFormat::Text => {
			if !report.is_ok() {
				print!("{}", report.render_text());
			}
		}
	}
}
