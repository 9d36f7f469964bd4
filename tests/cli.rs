use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn compiles_stdin_to_xml() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.write_stdin("element foo { text }");

    let output_pred = predicate::str::starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")
        .and(predicate::str::contains(
            "<element name=\"foo\" xmlns=\"http://relaxng.org/ns/structure/1.0\">",
        ))
        .and(predicate::str::ends_with("</element>\n"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn compiles_file_argument() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("grammar.rnc");
    fs::write(&path, "start = element root { ref }\nref = element leaf { empty }\n").unwrap();
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg(&path);

    let output_pred = predicate::str::contains("<grammar xmlns=")
        .and(predicate::str::contains("<ref name=\"ref\"/>"))
        .and(predicate::str::contains("<define name=\"ref\">"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn lists_tokens() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("-").arg("--emit").arg("tokens").arg("--spans");
    cmd.write_stdin("a | b");

    cmd.assert()
        .success()
        .stdout("NAME \"a\" @0..1\nCHOICE \"|\" @2..3\nNAME \"b\" @4..5\n");
}

#[test]
fn lists_tokens_as_json() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("--emit").arg("token-json");
    cmd.write_stdin("start = empty");

    let output_pred = predicate::str::contains("\"kind\": \"Define\"")
        .and(predicate::str::contains("\"text\": \"start\""))
        .and(predicate::str::contains("span").not());

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn dumps_tree_after_pair_matching() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("--emit").arg("tree").arg("--stage").arg("pairs");
    cmd.write_stdin("element foo { text }");

    cmd.assert()
        .success()
        .stdout("ELEMENT \"element\"\nNAME \"foo\"\nBODY\n  TEXT \"text\"\n");
}

#[test]
fn dumps_tree_after_all_passes() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("--emit").arg("tree");
    cmd.write_stdin("start = element foo { text }");

    cmd.assert()
        .success()
        .stdout("START\n  ELEMENT foo\n    TEXT \"text\"\n");
}

#[test]
fn reports_unbalanced_delimiter_with_context() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.write_stdin("foo = element a {\n  text\n");

    let error_pred = predicate::str::contains("Error: Unbalanced delimiter '{' at byte 16")
        .and(predicate::str::contains(">>   1 | foo = element a {"));

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(error_pred);
}

#[test]
fn reports_missing_input_file() {
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("does-not-exist.rnc");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot read 'does-not-exist.rnc'"));
}

#[test]
fn applies_configuration_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[output]\nindent = 4\n").unwrap();
    let mut cmd = cargo_bin_cmd!("rnc2rng");
    cmd.arg("--config").arg(&config);
    cmd.write_stdin("element foo { text }");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\n    <text/>\n"));
}
