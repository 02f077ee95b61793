use anyhow::Result;
use progctx::search::{Miss, Status};

use crate::helpers::TestHarness;

/// `run()` spans lines 2..=40 with `tick();` on lines 10 and 30; every other
/// body line declares `vNN` after its own line number.
fn counter_source() -> String {
    let mut lines = vec!["class Counter {".to_string(), "    void run() {".to_string()];
    for n in 3..=39 {
        if n == 10 || n == 30 {
            lines.push("        tick();".to_string());
        } else {
            lines.push(format!("        int v{:02} = {};", n, n));
        }
    }
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.join("\n") + "\n"
}

#[test]
fn test_two_occurrences_centered_on_their_lines() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Counter.java", &counter_source())?;
    let engine = harness.engine()?;

    let output = engine.find_code("tick();");
    assert!(output.success());
    assert!(output
        .text
        .starts_with("Found 2 snippets containing `tick();` in the codebase:\n\n"));

    let (first, second) = output
        .text
        .split_once("- Search result 2:")
        .expect("two result blocks");

    assert!(first.contains("<class>Counter</class> <method>run</method>"));
    assert!(first.contains("int v05") && first.contains("int v15"));
    assert!(!first.contains("int v04") && !first.contains("int v16"));

    assert!(second.contains("int v25") && second.contains("int v35"));
    assert!(!second.contains("int v24") && !second.contains("int v36"));
    Ok(())
}

#[test]
fn test_find_code_collapses_to_files() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Counter.java", &counter_source())?;
    harness.create_test_file(
        "Timer.java",
        "class Timer {\n    void go() {\n        tick();\n        tick();\n    }\n}\n",
    )?;
    let engine = harness.engine()?;

    let output = engine.find_code("tick();");
    assert_eq!(
        output.text,
        "Found 4 snippets containing `tick();` in the codebase:\n\n\
         They appeared in the following files:\n\
         - <file>Counter.java</file> (2 matches)\n\
         - <file>Timer.java</file> (2 matches)\n"
    );

    let missing = engine.find_code("tock();");
    assert_eq!(missing.status, Status::NotFound(Miss::Symbol));
    assert_eq!(missing.text, "Could not find code tock(); in the codebase.");
    Ok(())
}

#[test]
fn test_find_code_in_file_collapses_to_methods() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "Loop.java",
        "class Loop {\n    void a() {\n        step();\n        step();\n    }\n    void b() {\n        step();\n        step();\n    }\n}\n",
    )?;
    let engine = harness.engine()?;

    let output = engine.find_code_in_file("step()", "Loop.java");
    assert!(output.success());
    assert_eq!(
        output.text,
        "Found 4 snippets with code step( in file Loop.java:\n\n\
         They appeared in the following methods:\n\
         - <file>Loop.java</file> <method>a</method> (2 matches)\n\
         - <file>Loop.java</file> <method>b</method> (2 matches)\n"
    );

    let elsewhere = engine.find_code_in_file("jump()", "Loop.java");
    assert_eq!(elsewhere.status, Status::NotFound(Miss::SymbolInContainer));
    assert_eq!(elsewhere.text, "Could not find code jump( in file Loop.java.");

    assert_eq!(
        engine.find_code_in_file("step()", "Missing.java").status,
        Status::NotFound(Miss::Container)
    );
    Ok(())
}

#[test]
fn test_literal_matching_ignores_regex_syntax() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "Re.java",
        "class Re {\n    String p = \"a.*b\";\n    String q = \"axxb\";\n}\n",
    )?;
    let engine = harness.engine()?;

    let output = engine.find_code("a.*b");
    assert!(output.success());
    assert!(output.text.starts_with("Found 1 snippets"));
    Ok(())
}
