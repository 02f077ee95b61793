use anyhow::Result;
use progctx::search::{Miss, Query, Status};

use crate::helpers::TestHarness;

const CALC: &str = "package demo;

import java.util.List;

public class Calc {
    private int total;

    public int add(int a, int b) {
        int sum = a + b;
        total += sum;
        return sum;
    }
}
";

#[test]
fn test_skeleton_has_signatures_only() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/demo/Calc.java", CALC)?;
    let engine = harness.engine()?;

    let output = engine.extract_class_skeleton("Calc.java");
    assert!(output.success());
    assert_eq!(
        output.text,
        "Class skeleton extracted from Calc.java:\n\n```java\n\
         package demo;\n\n\
         import java.util.List;\n\n\
         public class Calc {\n    private int total;\n    public int add(int a, int b);\n}\n\n```"
    );
    assert_eq!(output.summary, "Successfully extracted class skeleton from Calc.java");
    assert!(!output.text.contains("return"));

    let missing = engine.extract_class_skeleton("Nope.java");
    assert_eq!(missing.status, Status::NotFound(Miss::Container));
    assert_eq!(missing.text, "Could not find file Nope.java in the codebase.");
    Ok(())
}

#[test]
fn test_skeleton_of_deleted_file_fails() -> Result<()> {
    let harness = TestHarness::new()?;
    let path = harness.create_test_file("Calc.java", CALC)?;
    let engine = harness.engine()?;
    std::fs::remove_file(path)?;

    let output = engine.extract_class_skeleton("Calc.java");
    assert_eq!(output.status, Status::Failed);
    assert!(output.text.starts_with("Failed to extract skeleton from Calc.java: "));
    Ok(())
}

#[test]
fn test_repo_structure() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/demo/Calc.java", CALC)?;
    harness.create_test_file("src/demo/Util.java", "class Util {}\nclass Helper {}\n")?;
    harness.create_test_file("target/Gen.java", "class Gen {}\n")?;
    harness.create_test_file("notes.txt", "todo")?;
    let engine = harness.engine()?;

    let output = engine.repo_structure(None);
    assert!(output.success());
    assert_eq!(
        output.summary,
        "Repository structure with 2 Java files and 3 classes"
    );

    let lines: Vec<&str> = output.text.lines().collect();
    assert!(lines[0].ends_with('/'));
    assert_eq!(
        &lines[1..],
        &[
            "└── src/",
            "    └── demo/",
            "        ├── Calc.java",
            "        └── Util.java",
        ]
    );

    let shallow = engine.repo_structure(Some(0));
    assert_eq!(shallow.text.lines().count(), 2);
    Ok(())
}

#[test]
fn test_repo_structure_reports_walk_errors() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/Calc.java", CALC)?;
    let engine = harness.engine()?;
    std::fs::remove_dir_all(harness.path())?;

    let output = engine.repo_structure(None);
    assert_eq!(output.status, Status::Failed);
    assert!(!output.success());
    assert!(output
        .text
        .starts_with("Error generating repository structure: "));
    Ok(())
}

#[test]
fn test_retrieve_snippet_is_exact_slice() -> Result<()> {
    let harness = TestHarness::new()?;
    let path = harness.create_test_file("Calc.java", CALC)?;
    let engine = harness.engine()?;

    assert_eq!(
        engine.retrieve_snippet(&path, 8, 9),
        "    public int add(int a, int b) {\n        int sum = a + b;\n"
    );
    assert_eq!(engine.retrieve_snippet(&path, 1, 13), CALC);
    assert_eq!(engine.retrieve_snippet(&path, 50, 60), "");
    assert_eq!(engine.retrieve_snippet(&harness.path().join("Nope.java"), 1, 2), "");
    Ok(())
}

#[test]
fn test_execute_json_queries() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Calc.java", CALC)?;
    let engine = harness.engine()?;

    let query: Query = serde_json::from_str(
        r#"{"tool": "find_method_in_file", "method_name": "add", "file_name": "Calc.java"}"#,
    )?;
    let (text, summary, success) = engine.execute(&query).into_parts();
    assert!(success);
    assert_eq!(summary, "Found 1 methods with name `add` in file Calc.java:\n\n");
    assert!(text.contains("<class>Calc</class> <method>add</method>"));

    let query: Query = serde_json::from_str(r#"{"tool": "find_class", "class_name": "Missing"}"#)?;
    let (_, summary, success) = engine.execute(&query).into_parts();
    assert!(!success);
    assert_eq!(summary, "Class Missing did not appear in the codebase.");
    Ok(())
}
