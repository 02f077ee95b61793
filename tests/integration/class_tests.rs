use anyhow::Result;
use progctx::search::{Miss, Status};

use crate::helpers::TestHarness;

const DUP: &str = "class Dup {\n    void run() {}\n}\n";

fn harness_with_dups(count: usize) -> Result<TestHarness> {
    let harness = TestHarness::new()?;
    for dir in ["a", "b", "c", "d", "e"].iter().take(count) {
        harness.create_test_file(&format!("{}/Dup.java", dir), DUP)?;
    }
    Ok(harness)
}

#[test]
fn test_three_classes_show_code_blocks() -> Result<()> {
    let harness = harness_with_dups(3)?;
    let engine = harness.engine()?;

    let output = engine.find_class("Dup");
    assert!(output.success());
    assert!(output
        .text
        .starts_with("Found 3 classes with name Dup in the codebase:\n\n- Search result 1:\n"));
    assert_eq!(output.text.matches("<code>").count(), 3);
    // Each block carries the declaration header, not the class body
    assert_eq!(output.text.matches("<code>\nclass Dup {\n</code>").count(), 3);
    assert!(!output.text.contains("void run()"));
    for dir in ["a", "b", "c"] {
        assert_eq!(output.text.matches(&format!("<file>{}/Dup.java</file>", dir)).count(), 1);
    }
    Ok(())
}

#[test]
fn test_four_classes_collapse_to_files() -> Result<()> {
    let harness = harness_with_dups(4)?;
    let engine = harness.engine()?;

    let output = engine.find_class("Dup");
    assert!(output.success());
    assert_eq!(
        output.text,
        "Found 4 classes with name Dup in the codebase:\n\n\
         They appeared in the following files:\n\
         - <file>a/Dup.java</file> (1 matches)\n\
         - <file>b/Dup.java</file> (1 matches)\n\
         - <file>c/Dup.java</file> (1 matches)\n\
         - <file>d/Dup.java</file> (1 matches)\n"
    );
    assert!(!output.text.contains("<code>"));
    Ok(())
}

#[test]
fn test_find_class_full_limits_bodies() -> Result<()> {
    let harness = harness_with_dups(3)?;
    let engine = harness.engine()?;

    let output = engine.find_class_full("Dup");
    assert!(output.success());
    assert!(output.text.starts_with(
        "Found 3 classes with name Dup in the codebase:\n\nToo many results, showing full code for 2 of them:\n"
    ));
    assert!(output.text.contains("- Search result 2:"));
    assert!(!output.text.contains("- Search result 3:"));
    assert!(output.text.contains("    void run() {}"));

    assert_eq!(
        engine.find_class_full("Nope").status,
        Status::NotFound(Miss::Symbol)
    );
    Ok(())
}

#[test]
fn test_unparsable_file_contributes_nothing() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Good.java", "class Good {\n    void ok() {}\n}\n")?;
    let bad = harness.create_test_file("Broken.java", "class Broken {\n    void half( {\n")?;
    let engine = harness.engine()?;

    assert_eq!(engine.report().failed, 1);
    assert_eq!(engine.index().file_count(), 1);
    assert!(engine.index().file(&bad.canonicalize()?).is_none());

    assert!(!engine.find_class("Broken").success());
    assert!(!engine.find_method("half").success());
    assert_eq!(
        engine.find_class_in_file("Broken", "Broken.java").status,
        Status::NotFound(Miss::Container)
    );
    assert!(engine.find_class("Good").success());
    Ok(())
}

#[test]
fn test_interfaces_and_enums_are_classes() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "shapes/Shape.java",
        "package shapes;\n\npublic interface Shape {\n    double area();\n}\n",
    )?;
    harness.create_test_file(
        "shapes/Color.java",
        "package shapes;\n\npublic enum Color {\n    RED, GREEN;\n}\n",
    )?;
    let engine = harness.engine()?;

    let shape = engine.find_class("Shape");
    assert!(shape.success());
    assert!(shape.text.contains("<code>\npublic interface Shape {\n</code>"));

    let color = engine.find_class_in_file("Color", "shapes/Color.java");
    assert!(color.success());
    assert!(color.text.contains("<class>Color</class>"));
    Ok(())
}
