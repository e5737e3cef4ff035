use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_tagdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn doclets_from(assert: assert_cmd::assert::Assert) -> Vec<Value> {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&stdout).unwrap()
}

fn find<'a>(doclets: &'a [Value], longname: &str) -> Vec<&'a Value> {
    doclets
        .iter()
        .filter(|d| d["longname"] == longname && d["ignore"] != Value::Bool(true))
        .collect()
}

// -- stdin mode --

#[test]
fn stdin_mode_emits_doclet_json() {
    let input = "/**\n * Adds two numbers.\n * @param {number} a\n * @param {number} b\n */\nfunction add(a, b) {}\n";

    let assert = cmd().write_stdin(input).assert().success();
    let doclets = doclets_from(assert);

    assert_eq!(doclets.len(), 1);
    assert_eq!(doclets[0]["longname"], "add");
    assert_eq!(doclets[0]["description"], "Adds two numbers.");
    assert_eq!(doclets[0]["params"][0]["name"], "a");
    assert_eq!(doclets[0]["params"][1]["type"]["names"][0], "number");
    assert_eq!(doclets[0]["meta"]["filename"], "<stdin>");
}

// -- file mode --

#[test]
fn file_mode_writes_doclets_json() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("mixer.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("doclets.json")).unwrap();
    assert!(output.contains("module:color/mixer"));
}

#[test]
fn missing_glob_warns_but_succeeds() {
    cmd()
        .arg("no/such/dir/*.js")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no files matched"));
}

// -- resolution passes --

#[test]
fn borrowed_member_lands_under_the_module() {
    let assert = cmd().arg(fixture_path("mixer.js")).assert().success();
    let doclets = doclets_from(assert);

    let blend = find(&doclets, "module:color/mixer.blend");
    assert_eq!(blend.len(), 1);
    assert_eq!(blend[0]["memberof"], "module:color/mixer");
    assert_eq!(blend[0]["scope"], "static");
    assert_eq!(blend[0]["description"], "Blend two colors.");

    // the original inner function is still there too
    assert_eq!(find(&doclets, "module:color/mixer~blend").len(), 1);
}

#[test]
fn inherited_member_survives_a_two_step_chain() {
    let assert = cmd().arg(fixture_path("sockets.js")).assert().success();
    let doclets = doclets_from(assert);

    // implemented on Socket, then inherited by EncryptedSocket
    let socket_open = find(&doclets, "Socket#open");
    assert_eq!(socket_open.len(), 1);
    assert_eq!(socket_open[0]["description"], "Open the connection.");

    let enc_open = find(&doclets, "EncryptedSocket#open");
    assert_eq!(enc_open.len(), 1);
    assert_eq!(enc_open[0]["description"], "Open the connection.");
    // the interface member is abstract; the copies are concrete
    assert_eq!(enc_open[0].get("virtual"), None);
}

// -- diagnostics and configuration --

#[test]
fn unknown_tag_fails_in_strict_mode() {
    cmd()
        .arg("--strict")
        .arg(fixture_path("unknown.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("@customtag"))
        .stderr(predicate::str::contains("not a known tag"));
}

#[test]
fn unknown_tag_is_reported_but_not_fatal_by_default() {
    cmd()
        .arg(fixture_path("unknown.js"))
        .assert()
        .success()
        .stderr(predicate::str::contains("not a known tag"));
}

#[test]
fn allow_list_config_silences_unknown_tag() {
    let mut config = NamedTempFile::new().unwrap();
    config
        .write_all(br#"{"allow_unknown_tags": ["customtag"]}"#)
        .unwrap();

    let assert = cmd()
        .arg("--strict")
        .args(["-c", config.path().to_str().unwrap()])
        .arg(fixture_path("unknown.js"))
        .assert()
        .success()
        .stderr(predicate::str::contains("not a known tag").not());

    // the allowed tag is retained on the doclet
    let doclets = doclets_from(assert);
    let weird = find(&doclets, "weird");
    assert_eq!(weird.len(), 1);
    assert_eq!(weird[0]["tags"][0]["title"], "customtag");
}
