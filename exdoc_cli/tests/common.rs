use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn exdoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("exdoc"));
	cmd.env("NO_COLOR", "1");
	cmd
}

pub const REGISTRIES_YAML: &str = "
services: [s3, sns, sqs]
languages: [Java, Python]
cross_content: [cross_DeleteTopic_block]
";

pub const VALID_METADATA_YAML: &str = "
sns_DeleteTopic:
  title: Delete an &SNS; topic
  title_abbrev: Delete a topic
  synopsis: delete an &SNS; topic.
  services:
    sns: [DeleteTopic]
  languages:
    Java:
      versions:
        - sdk_version: 2
          github: javav2/example_code/sns
          excerpts:
            - description: Delete a topic.
              snippet_tags: [sns.java2.DeleteTopic.main]
";
