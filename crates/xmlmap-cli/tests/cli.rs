use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn xmlmap() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("xmlmap")?)
}

#[test]
fn test_xml_to_json_from_stdin() -> TestResult {
    xmlmap()?
        .args(["--from", "xml", "--to", "json"])
        .write_stdin("<shelf><book>A</book><book>B</book></shelf>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"@root\": \"shelf\""))
        .stdout(predicate::str::contains("\"book\": [\n    \"A\",\n    \"B\"\n  ]"));
    Ok(())
}

#[test]
fn test_json_file_to_xml_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("order.json");
    let output = dir.path().join("order.xml");
    fs::write(
        &input,
        r#"{"item": [{"@attributes": {"sku": "a1"}, "@content": "Pen"}, "Ink"]}"#,
    )?;

    xmlmap()?
        .arg(&input)
        .args(["--to", "xml", "--root", "order", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read_to_string(&output)?,
        "<?xml version=\"1.0\"?>\n<order><item sku=\"a1\">Pen</item><item>Ink</item></order>\n"
    );
    Ok(())
}

#[test]
fn test_pretty_without_declaration() -> TestResult {
    xmlmap()?
        .args(["--from", "json", "--to", "xml", "--no-declaration", "--pretty"])
        .write_stdin(r#"{"a": {"b": "1"}}"#)
        .assert()
        .success()
        .stdout("<root>\n <a>\n  <b>1</b>\n </a>\n</root>\n");
    Ok(())
}

#[test]
fn test_xml_to_xml_beautifies() -> TestResult {
    xmlmap()?
        .args(["--from", "xml", "--to", "xml"])
        .write_stdin("<r><a>1</a><b/></r>")
        .assert()
        .success()
        .stdout("<r>\n <a>1</a>\n <b/>\n</r>\n");
    Ok(())
}

#[test]
fn test_malformed_xml_fails() -> TestResult {
    xmlmap()?
        .args(["--from", "xml", "--to", "json"])
        .write_stdin("<r><a></r>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse XML input"));
    Ok(())
}

#[test]
fn test_unknown_extension_needs_from() -> TestResult {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("data.txt");
    fs::write(&input, "<r/>")?;

    xmlmap()?
        .arg(&input)
        .args(["--to", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not infer input format"));
    Ok(())
}

#[test]
fn test_empty_stdin_is_rejected() -> TestResult {
    xmlmap()?
        .args(["--from", "xml", "--to", "json"])
        .write_stdin("  \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input provided on stdin"));
    Ok(())
}
