//! The `tidyscan` binary: output formats and exit status.

use std::path::Path;
use std::process::{Command, Output};

use crate::common::{Workspace, fixes_block, tidyscan_bin};

fn run_tidyscan(ws: &Workspace, program: &Path, extra: &[&str], files: &[&str]) -> Output {
    Command::new(tidyscan_bin())
        .current_dir(ws.root())
        // Keep the user's own config file out of the picture.
        .env("HOME", ws.root())
        .env_remove("RUST_LOG")
        .arg("--workspace")
        .arg(ws.root())
        .arg("--executable")
        .arg(program)
        .args(extra)
        .args(files)
        .output()
        .expect("run tidyscan")
}

#[test]
fn plain_output_lists_diagnostics_and_summary() {
    let ws = Workspace::new();
    let main = ws.write("main.cpp", "int x = 1;\n");
    let program = ws.canned_analyzer(&fixes_block("my-check", "bad code", 4, ""));

    let output = run_tidyscan(&ws, &program, &[], &["main.cpp"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            format!("{}:1:5: warning: [clang-tidy] bad code (my-check)", main.display()).as_str(),
            "1 file analyzed: 0 errors, 1 warning",
        ]
    );
}

#[test]
fn error_diagnostics_exit_with_one() {
    let ws = Workspace::new();
    let main = ws.write("main.c", "int x = y;\n");
    let program = ws.canned_analyzer(&format!(
        "{}:1:9: error: use of undeclared identifier\nint x = y;\n        ^\n",
        main.display()
    ));

    let output = run_tidyscan(&ws, &program, &[], &["main.c"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(":1:9: error: [clang-tidy] use of undeclared identifier"));
    assert!(stdout.ends_with("1 file analyzed: 1 error, 0 warnings\n"));
}

#[test]
fn json_output_one_object_per_file() {
    let ws = Workspace::new();
    ws.write("a.cpp", "int a = 1;\n");
    ws.write("b.cpp", "int b = 1;\n");
    let program = ws.canned_analyzer(&fixes_block("my-check", "bad code", 4, ""));

    let output = run_tidyscan(&ws, &program, &["--json"], &["b.cpp", "a.cpp"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let objects: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(objects.len(), 2);
    let a = ws.root().join("a.cpp").display().to_string();
    assert_eq!(objects[0]["document"], a.as_str());
    assert_eq!(objects[0]["language"], "cpp");
    assert_eq!(objects[0]["diagnostics"]["total"], 1);
    assert_eq!(
        objects[0]["diagnostics"]["files"][a.as_str()][0]["message"],
        "bad code (my-check)"
    );
}

#[test]
fn missing_analyzer_exits_with_two() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");

    let output = run_tidyscan(&ws, &ws.root().join("no-such-tidy"), &[], &["main.cpp"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("not found"));
}

#[test]
fn broken_explicit_config_exits_with_two() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let config = ws.write("broken.toml", "executable = [");
    let program = ws.canned_analyzer("");

    let output = run_tidyscan(
        &ws,
        &program,
        &["--config", &config.to_string_lossy()],
        &["main.cpp"],
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("loading configuration"));
}

#[test]
fn project_config_excludes_apply() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let generated = ws.write("gen/out.h", "int g;\n");
    ws.write(".tidyscan.toml", "excludes = [\"/gen/\"]\n");
    let program = ws.canned_analyzer(&fixes_block(
        "misc-gen",
        "generated",
        0,
        &generated.to_string_lossy(),
    ));

    let output = run_tidyscan(&ws, &program, &[], &["main.cpp"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "1 file analyzed: 0 errors, 0 warnings\n");
}

#[test]
fn unknown_extension_is_skipped() {
    let ws = Workspace::new();
    ws.write("notes.txt", "hello\n");
    let program = ws.canned_analyzer(&fixes_block("my-check", "bad", 0, ""));

    let output = run_tidyscan(&ws, &program, &[], &["notes.txt"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "0 files analyzed: 0 errors, 0 warnings\n");
}

#[test]
fn fallback_flag_retries_header_with_source() {
    let ws = Workspace::new();
    let header = ws.write("util.h", "int helper;\n");
    ws.write("util.cpp", "#include \"util.h\"\n");
    let canned = ws.write(
        ".canned",
        &fixes_block("misc-header", "in header", 4, &header.to_string_lossy()),
    );
    let program = ws.analyzer_script(&format!(
        "case \"$1\" in *.cpp) cat '{}' ;; esac",
        canned.display()
    ));

    let without = run_tidyscan(&ws, &program, &[], &["util.h"]);
    let stdout = String::from_utf8(without.stdout).unwrap();
    assert!(stdout.ends_with("0 warnings\n"));

    let with = run_tidyscan(&ws, &program, &["--fallback"], &["util.h"]);
    let stdout = String::from_utf8(with.stdout).unwrap();
    assert!(stdout.contains(&format!("{}:1:5: warning:", header.display())));
    assert!(stdout.ends_with("1 file analyzed: 0 errors, 1 warning\n"));
}
