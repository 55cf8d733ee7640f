use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const ENGLISH: &str = "The quick brown fox jumps over the lazy dog. \
	She sells sea shells by the sea shore, and the shells she sells are surely sea shells. \
	There is nothing either good or bad, but thinking makes it so.";

const FRENCH: &str = "Le renard brun rapide saute par-dessus le chien paresseux. \
	Les sanglots longs des violons de l'automne blessent mon coeur d'une langueur monotone. \
	Je pense, donc je suis, et je suis toujours là.";

fn write_corpus(root: &Path) -> String {
	fs::write(root.join("english.txt"), ENGLISH).unwrap();
	fs::write(root.join("french.txt"), FRENCH).unwrap();
	fs::write(root.join("unknown.txt"), "the lazy dog sells shells by the shore").unwrap();
	format!(
		"English {}\nFrench {}\nUnknown {}\n",
		root.join("english.txt").display(),
		root.join("french.txt").display(),
		root.join("unknown.txt").display(),
	)
}

fn ngram_lang() -> Command {
	Command::cargo_bin("ngram-lang").unwrap()
}

#[test]
fn classifies_unknown_documents_from_stdin() {
	let dir = tempfile::tempdir().unwrap();
	let list = write_corpus(dir.path());

	let output = ngram_lang().write_stdin(list).assert().success().get_output().stdout.clone();
	let stdout = String::from_utf8(output).unwrap();
	let lines: Vec<&str> = stdout.lines().collect();

	assert_eq!(lines.len(), 3, "{stdout}");
	assert!(lines[0].starts_with("Best matches for '"));
	assert!(lines[0].ends_with("unknown.txt'"));
	assert!(lines[1].trim_start().starts_with("English"), "{stdout}");
	assert!(lines[2].trim_start().starts_with("French"), "{stdout}");
}

#[test]
fn classify_flag_and_match_limit() {
	let dir = tempfile::tempdir().unwrap();
	let list_path = dir.path().join("languages.txt");
	fs::write(&list_path, write_corpus(dir.path())).unwrap();
	let extra = dir.path().join("extra.txt");
	fs::write(&extra, "je suis le chien, tu es le renard").unwrap();

	ngram_lang()
		.arg("-s")
		.arg(&list_path)
		.arg("-c")
		.arg(&extra)
		.args(["-m", "1"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Best match for"))
		.stdout(predicate::str::contains("extra.txt'\n\tFrench"));
}

#[test]
fn cache_file_is_written() {
	let dir = tempfile::tempdir().unwrap();
	let list = write_corpus(dir.path());
	let cache = dir.path().join("profiles.bin");

	for _ in 0..2 {
		ngram_lang()
			.arg("-d")
			.arg(&cache)
			.write_stdin(list.clone())
			.assert()
			.success()
			.stdout(predicate::str::contains("English"));
	}
	assert!(cache.exists());
}

#[test]
fn missing_source_list_fails() {
	let dir = tempfile::tempdir().unwrap();
	ngram_lang().arg("-s").arg(dir.path().join("nope.txt")).assert().failure();
}
