mod common;

use exdoc_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn check_passes_on_a_consistent_corpus() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("registries.yaml"), common::REGISTRIES_YAML)?;
	std::fs::write(tmp.path().join("metadata.yaml"), common::VALID_METADATA_YAML)?;
	std::fs::create_dir_all(tmp.path().join("javav2/example_code/sns"))?;
	std::fs::write(
		tmp.path().join("javav2/example_code/sns/DeleteTopic.java"),
		"// snippet-start:[sns.java2.DeleteTopic.main]\nclass DeleteTopic {}\n// snippet-end:[sns.java2.DeleteTopic.main]\n",
	)?;

	let mut cmd = common::exdoc_cmd();
	let _ = cmd
		.arg("check")
		.arg("--metadata")
		.arg(tmp.path().join("metadata.yaml"))
		.arg("--registries")
		.arg(tmp.path().join("registries.yaml"))
		.arg("--root")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("corpus is consistent"));

	Ok(())
}

#[test]
fn check_reports_findings_and_exits_nonzero() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("registries.yaml"), common::REGISTRIES_YAML)?;
	// Missing title_abbrev plus an unknown service.
	std::fs::write(
		tmp.path().join("metadata.yaml"),
		"
sns_DeleteTopic:
  title: Delete a topic
  services:
    nosuch: []
  languages:
    Java:
      versions:
        - sdk_version: 2
          excerpts:
            - snippet_tags: [tag]
",
	)?;

	let mut cmd = common::exdoc_cmd();
	let _ = cmd
		.arg("check")
		.arg("--metadata")
		.arg(tmp.path().join("metadata.yaml"))
		.arg("--registries")
		.arg(tmp.path().join("registries.yaml"))
		.assert()
		.code(1)
		.stdout(predicates::str::contains("missing required field `title_abbrev`"))
		.stdout(predicates::str::contains("unknown service `nosuch`"));

	Ok(())
}

#[test]
fn empty_metadata_document_is_a_fatal_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("registries.yaml"), common::REGISTRIES_YAML)?;
	std::fs::write(tmp.path().join("metadata.yaml"), "")?;

	let mut cmd = common::exdoc_cmd();
	let _ = cmd
		.arg("check")
		.arg("--metadata")
		.arg(tmp.path().join("metadata.yaml"))
		.arg("--registries")
		.arg(tmp.path().join("registries.yaml"))
		.assert()
		.code(2)
		.stderr(predicates::str::contains("is empty"));

	Ok(())
}

#[test]
fn json_format_emits_machine_readable_findings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	std::fs::write(tmp.path().join("registries.yaml"), common::REGISTRIES_YAML)?;
	std::fs::write(tmp.path().join("metadata.yaml"), common::VALID_METADATA_YAML)?;

	let mut cmd = common::exdoc_cmd();
	let output = cmd
		.arg("check")
		.arg("--metadata")
		.arg(tmp.path().join("metadata.yaml"))
		.arg("--registries")
		.arg(tmp.path().join("registries.yaml"))
		.arg("--format")
		.arg("json")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let json: Value = serde_json::from_slice(&output)?;
	assert!(json["examples"]["sns_DeleteTopic"].is_object());
	assert_eq!(json["errors"], serde_json::json!([]));

	Ok(())
}
