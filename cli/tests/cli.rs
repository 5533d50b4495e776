#![cfg(test)]

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SUITE: &str = r"
queries:
  - query: everything
    type: no-text
    sparql: SELECT * WHERE { ?s ?p ?o }
    checks:
      - num_rows: 1
";

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("sparcheck")?)
}

#[test]
fn help() -> Result<()> {
    cli_command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--prescan-row-data-types"));
    Ok(())
}

#[test]
fn missing_test_file() -> Result<()> {
    cli_command()?
        .arg("does-not-exist.yaml")
        .arg("http://127.0.0.1:9/")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read the test file"));
    Ok(())
}

#[test]
fn invalid_test_file() -> Result<()> {
    let file = NamedTempFile::new("suite.yaml")?;
    file.write_str("queries: [{query: q}]")?;
    cli_command()?
        .arg(file.path())
        .arg("http://127.0.0.1:9/")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse the test file"));
    Ok(())
}

#[test]
fn invalid_endpoint() -> Result<()> {
    cli_command()?
        .arg("-")
        .arg("not an url")
        .write_stdin("queries: []")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("endpoint URL"));
    Ok(())
}

#[test]
fn empty_suite_passes() -> Result<()> {
    cli_command()?
        .arg("-")
        .arg("http://127.0.0.1:9/")
        .write_stdin("queries: []")
        .assert()
        .success()
        .stdout(predicate::str::contains("all 0 query runs passed"));
    Ok(())
}

#[test]
fn unreachable_endpoint_fails() -> Result<()> {
    let file = NamedTempFile::new("suite.yaml")?;
    file.write_str(SUITE)?;
    cli_command()?
        .arg(file.path())
        .arg("http://127.0.0.1:9/")
        .arg("--format")
        .arg("standard")
        .arg("--timeout")
        .arg("5")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("FAIL everything (no-text) [standard]"))
        .stdout(predicate::str::contains("query execution failed"));
    Ok(())
}

#[test]
fn json_logs() -> Result<()> {
    let file = NamedTempFile::new("suite.yaml")?;
    file.write_str(SUITE)?;
    cli_command()?
        .arg(file.path())
        .arg("http://127.0.0.1:9/")
        .arg("--post")
        .arg("--log-format")
        .arg("json")
        .assert()
        .code(3)
        .stderr(predicate::str::contains(r#""message":"query execution failed""#))
        .stdout(predicate::str::contains("2 of 2 query runs failed"));
    Ok(())
}
