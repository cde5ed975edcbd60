mod common;

use exdoc_core::AnyEmptyResult;

#[test]
fn scan_passes_on_paired_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("example.py"),
		"# snippet-start:[sqs.python.send]\nprint('hi')\n# snippet-end:[sqs.python.send]\n",
	)?;

	let mut cmd = common::exdoc_cmd();
	let _ = cmd
		.arg("scan")
		.arg("--root")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("no snippet-marker problems"));

	Ok(())
}

#[test]
fn scan_reports_unmatched_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("example.py"),
		"# snippet-start:[sqs.python.send]\nprint('hi')\n",
	)?;

	let mut cmd = common::exdoc_cmd();
	let _ = cmd
		.arg("scan")
		.arg("--root")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("unmatched snippet-start tag `sqs.python.send`"));

	Ok(())
}
