use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::loader::RawExample;
use crate::loader::RecordSet;
use crate::model::Category;
use crate::model::Example;
use crate::model::Excerpt;
use crate::model::Language;
use crate::model::Version;
use crate::registry::Registries;

pub fn registries() -> Registries {
	Registries::new(
		["s3", "sns", "sqs", "dynamodb"].map(String::from),
		["Java", "Python", "Rust"].map(String::from),
		["cross_DeleteTopic_block"].map(String::from),
	)
}

/// A complete, well-formed single-language single-version record.
pub const WELL_FORMED_DOC: &str = r"
sns_DeleteTopic:
  title: Delete an &SNS; topic
  title_abbrev: Delete a topic
  synopsis: delete an &SNS; topic.
  author:
    name: Jane Doe
    alias: janedoe
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
              genai: none
";

pub fn record_set_from_yaml(yaml: &str) -> RecordSet {
	crate::loader::parse_document(&PathBuf::from("metadata.yaml"), yaml)
		.expect("fixture document must parse")
}

pub fn single_record(id: &str, raw: RawExample) -> RecordSet {
	RecordSet {
		file: PathBuf::from("metadata.yaml"),
		records: BTreeMap::from([(id.to_string(), raw)]),
	}
}

pub fn excerpt_version(sdk_version: u32) -> Version {
	Version {
		sdk_version,
		excerpts: vec![Excerpt {
			description: Some("fixture".to_string()),
			snippet_tags: vec!["fixture.tag".to_string()],
			..Excerpt::default()
		}],
		..Version::default()
	}
}

pub fn language(name: &str, versions: Vec<Version>) -> Language {
	Language {
		name: name.to_string(),
		versions,
	}
}

pub fn example(id: &str, title: &str) -> Example {
	Example {
		id: id.to_string(),
		file: PathBuf::from("metadata.yaml"),
		title: title.to_string(),
		title_abbrev: title.to_string(),
		synopsis: format!("{title}."),
		category: Category::Api,
		..Example::default()
	}
}

pub fn example_with_language(id: &str, title: &str, language_name: &str, sdk_version: u32) -> Example {
	let mut fixture = example(id, title);
	fixture.languages.insert(
		language_name.to_string(),
		language(language_name, vec![excerpt_version(sdk_version)]),
	);
	fixture
}
