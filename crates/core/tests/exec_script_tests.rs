//! Runs the embedded exec script under bash and inspects `$GITHUB_OUTPUT`

use gha_core::scripts::EXEC;
use gha_core::{EmbeddedScripts, ScriptSource};
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_exec(command: &str) -> (Output, String) {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("exec.sh");
    fs::write(&script, EmbeddedScripts.script(EXEC).unwrap()).unwrap();
    let outputs = dir.path().join("github_output");
    fs::write(&outputs, "").unwrap();

    let output = Command::new("bash")
        .arg(&script)
        .env("COMMAND", command)
        .env("GITHUB_OUTPUT", &outputs)
        .env_remove("GITHUB_STEP_SUMMARY")
        .env_remove("DAGGER_MODULE")
        .output()
        .unwrap();
    (output, fs::read_to_string(&outputs).unwrap())
}

/// Parse `name<<DELIM ... DELIM` blocks the way the Actions runner does
fn parse_outputs(text: &str) -> Vec<(String, String)> {
    let mut values = Vec::new();
    let mut lines = text.lines();
    while let Some(header) = lines.next() {
        let (name, delimiter) = header.split_once("<<").unwrap();
        let mut body = Vec::new();
        loop {
            let line = lines
                .next()
                .unwrap_or_else(|| panic!("delimiter {delimiter} never closed in {text:?}"));
            if line == delimiter {
                break;
            }
            body.push(line);
        }
        values.push((name.to_string(), body.join("\n")));
    }
    values
}

#[test]
fn test_output_without_trailing_newline() {
    let (output, text) = run_exec("printf abc; printf oops >&2");
    assert!(output.status.success());
    assert_eq!(
        parse_outputs(&text),
        vec![
            ("stdout".to_string(), "abc".to_string()),
            ("stderr".to_string(), "oops".to_string()),
        ]
    );
}

#[test]
fn test_multiline_output() {
    let (_, text) = run_exec("echo one; echo two");
    let values = parse_outputs(&text);
    assert_eq!(values[0], ("stdout".to_string(), "one\ntwo".to_string()));
    assert_eq!(values[1], ("stderr".to_string(), String::new()));
}

#[test]
fn test_output_is_teed_and_status_kept() {
    let (output, text) = run_exec("echo visible; echo warned >&2; exit 3");
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "visible\n");
    assert_eq!(String::from_utf8_lossy(&output.stderr), "warned\n");
    assert_eq!(parse_outputs(&text)[0].1, "visible");
}
