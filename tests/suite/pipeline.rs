//! End-to-end pipeline tests against a fake analyzer.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tidyscan_core::{AnalysisEvent, InvokeError};
use tidyscan_types::{DiagnosticSeverity, Position, Range, edits_by_file};
use tokio::sync::mpsc;

use crate::common::{Workspace, fixes_block};

#[tokio::test]
async fn clean_run_reports_empty_primary_entry() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int main() { return 0; }\n");
    let analyzer = ws.analyzer(&ws.canned_analyzer("0 warnings generated.\n"), |_| {});
    let document = ws.document("main.cpp", "cpp");

    let report = analyzer.analyze(Arc::clone(&document)).await.unwrap();

    assert_eq!(report.total_count(), 0);
    assert_eq!(report.diagnostics().get(document.path()), Some(&[][..]));
    assert_eq!(report.diagnostics().paths().count(), 1);
}

#[tokio::test]
async fn header_findings_use_header_coordinates() {
    let ws = Workspace::new();
    ws.write("src/main.cpp", "#include \"../include/util.h\"\n");
    let header = ws.write("include/util.h", "// ünïcödé\nint *p = 0;\n");
    // "// ünïcödé\n" is 15 bytes; "int *p = " is 9 more.
    let output = format!(
        "---\nMainSourceFile: 'src/main.cpp'\nDiagnostics:\n  - DiagnosticName: modernize-use-nullptr\n    DiagnosticMessage:\n      Message: use nullptr\n      FilePath: '../include/util.h'\n      FileOffset: 24\n      Replacements:\n        - FilePath: '{}'\n          Offset: 24\n          Length: 1\n          ReplacementText: nullptr\n...\n",
        header.display()
    );
    let analyzer = ws.analyzer(&ws.canned_analyzer(&output), |_| {});
    let document = ws.document("src/main.cpp", "cpp");

    let report = analyzer.analyze(document).await.unwrap();

    let items = report.diagnostics().get(&header).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].message(), "use nullptr (modernize-use-nullptr)");
    assert_eq!(items[0].range(), Range::point(Position::new(1, 9)));

    let replacements = items[0].replacements().unwrap();
    let edits = edits_by_file(&replacements);
    assert_eq!(
        edits[&header][0].range,
        Range::new(Position::new(1, 9), Position::new(1, 10))
    );
}

#[tokio::test]
async fn compiler_errors_and_findings_combine() {
    let ws = Workspace::new();
    let main = ws.write("main.cpp", "int x = y;\n");
    let output = format!(
        "\
{main}:1:9: error: use of undeclared identifier [clang-diagnostic-error]
int x = y;
        ^
---
MainSourceFile: '{main}'
Diagnostics:
  - DiagnosticName: clang-diagnostic-error
    Message: use of undeclared identifier
    FileOffset: 8
    FilePath: ''
  - DiagnosticName: readability-identifier-length
    Message: short name
    FileOffset: 4
    FilePath: ''
...
1 error generated.
",
        main = main.display()
    );
    let analyzer = ws.analyzer(&ws.canned_analyzer(&output), |_| {});
    let report = analyzer.analyze(ws.document("main.cpp", "cpp")).await.unwrap();

    assert_eq!(report.total_count(), 2);
    assert_eq!(report.diagnostics().error_count(), 1);
    assert_eq!(report.diagnostics().warning_count(), 1);
    assert_eq!(report.diagnostics().status_string(), "E:1 W:1");
    let items = report.diagnostics().get(&main).unwrap();
    assert_eq!(items[0].severity(), DiagnosticSeverity::Error);
    assert_eq!(items[0].range().start, Position::new(0, 8));
    assert_eq!(items[1].message(), "short name (readability-identifier-length)");
}

#[tokio::test]
async fn excluded_paths_are_dropped() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let vendor = ws.write("vendor/lib.h", "int v;\n");
    let output = fixes_block("misc-a", "vendored", 0, &vendor.to_string_lossy());
    let analyzer = ws.analyzer(&ws.canned_analyzer(&output), |config| {
        config.excludes = vec![String::from("/vendor/")];
    });

    let report = analyzer.analyze(ws.document("main.cpp", "cpp")).await.unwrap();

    assert_eq!(report.total_count(), 0);
    assert!(report.diagnostics().get(&vendor).is_none());
}

#[tokio::test]
async fn outside_workspace_dropped_when_workspace_only() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let program = ws.canned_analyzer(&fixes_block("misc-b", "outside", 0, "/other/file.h"));

    let strict = ws.analyzer(&program, |config| config.workspace_only = true);
    let report = strict.analyze(ws.document("main.cpp", "cpp")).await.unwrap();
    assert_eq!(report.total_count(), 0);

    let lenient = ws.analyzer(&program, |_| {});
    let report = lenient.analyze(ws.document("main.cpp", "cpp")).await.unwrap();
    assert_eq!(report.total_count(), 1);
    assert!(report.diagnostics().get(Path::new("/other/file.h")).is_some());
}

#[tokio::test]
async fn arguments_reach_the_analyzer() {
    let ws = Workspace::new();
    ws.write("main.c", "int x;\n");
    ws.write(
        ".vscode/c_cpp_properties.json",
        r#"{"configurations": [{"includePath": ["${workspaceFolder}/inc"], "cStandard": "c11"}]}"#,
    );
    let args_file = ws.root().join("args.txt");
    let program = ws.analyzer_script(&format!(
        "for a in \"$@\"; do echo \"$a\" >> '{}'; done",
        args_file.display()
    ));
    let analyzer = ws.analyzer(&program, |config| {
        config.system_include_path = vec![String::from("sys")];
        config.args = vec![String::from("-p=${workspaceFolder}/build")];
    });
    let document = ws.document("main.c", "c");
    analyzer.analyze(Arc::clone(&document)).await.unwrap();

    let root = ws.root().display().to_string();
    let expected = [
        document.path().display().to_string(),
        String::from("--export-fixes=-"),
        String::from("-header-filter=.*"),
        format!("-extra-arg=-isystem{root}/sys"),
        String::from("-extra-arg-before=-Weverything"),
        format!("-p={root}/build"),
        format!("-extra-arg=-I{root}/inc"),
        String::from("-extra-arg-before=-xc"),
        String::from("-extra-arg-before=-std=c11"),
    ];
    let recorded = fs::read_to_string(&args_file).unwrap();
    assert_eq!(recorded.lines().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn stderr_merged_only_when_configured() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x = 1;\n");
    let block = fixes_block("my-check", "bad code", 4, "");
    let block_file = ws.write("block.yaml", &block);
    let program = ws.analyzer_script(&format!("cat '{}' 1>&2", block_file.display()));

    let discarded = ws.analyzer(&program, |_| {});
    let report = discarded.analyze(ws.document("main.cpp", "cpp")).await.unwrap();
    assert_eq!(report.total_count(), 0);

    let merged = ws.analyzer(&program, |config| config.merge_stderr = true);
    let report = merged.analyze(ws.document("main.cpp", "cpp")).await.unwrap();
    assert_eq!(report.total_count(), 1);
}

#[tokio::test]
async fn hung_analyzer_times_out() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let program = ws.analyzer_script("sleep 30");
    let analyzer = ws.analyzer(&program, |config| config.timeout_secs = Some(1));

    let err = analyzer
        .analyze(ws.document("main.cpp", "cpp"))
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::TimedOut { .. }));
}

#[tokio::test]
async fn concurrent_runs_each_deliver_one_event() {
    let ws = Workspace::new();
    ws.write("a.cpp", "int a;\n");
    ws.write("b.cpp", "int b;\n");
    let analyzer = ws.analyzer(
        &ws.canned_analyzer(&fixes_block("misc-x", "found", 0, "")),
        |_| {},
    );

    let (tx, mut rx) = mpsc::channel(8);
    let handles = [
        analyzer.spawn(ws.document("a.cpp", "cpp"), tx.clone()),
        analyzer.spawn(ws.document("b.cpp", "cpp"), tx.clone()),
    ];
    drop(tx);
    for handle in handles {
        handle.await.unwrap();
    }

    let mut paths = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            AnalysisEvent::Completed(report) => {
                assert_eq!(report.total_count(), 1);
                paths.push(report.document().path().to_path_buf());
            }
            AnalysisEvent::Failed { error, .. } => panic!("unexpected failure: {error}"),
        }
    }
    paths.sort();
    assert_eq!(paths, [ws.root().join("a.cpp"), ws.root().join("b.cpp")]);
}

#[tokio::test]
async fn missing_executable_is_reported_as_failure() {
    let ws = Workspace::new();
    ws.write("main.cpp", "int x;\n");
    let analyzer = ws.analyzer(&ws.root().join("no-such-tidy"), |_| {});

    let (tx, mut rx) = mpsc::channel(1);
    analyzer.spawn(ws.document("main.cpp", "cpp"), tx);

    match rx.recv().await {
        Some(AnalysisEvent::Failed { error, .. }) => {
            assert!(matches!(error, InvokeError::NotFound { .. }));
        }
        other => panic!("expected failure event, got {other:?}"),
    }
    assert!(rx.recv().await.is_none());
}
