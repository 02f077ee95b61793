use anyhow::Result;
use progctx::search::{Miss, Status};

use crate::helpers::TestHarness;

#[test]
fn test_overloads_in_one_class() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("Foo.java", "class Foo { void bar() {} void bar(int x) {} }\n")?;
    let engine = harness.engine()?;

    let found = engine.find_method_in_class("bar", "Foo");
    assert!(found.success());
    assert!(found
        .text
        .starts_with("Found 2 methods with name bar in class Foo:\n\n"));
    assert!(found.text.contains("- Search result 2:"));
    assert!(found.text.contains("<class>Foo</class> <method>bar</method>"));

    let no_class = engine.find_method_in_class("bar", "Missing");
    assert_eq!(no_class.status, Status::NotFound(Miss::Container));
    assert_eq!(no_class.text, "Could not find class Missing in the codebase.");

    let no_method = engine.find_method_in_class("baz", "Foo");
    assert_eq!(no_method.status, Status::NotFound(Miss::SymbolInContainer));
    assert_eq!(no_method.text, "Could not find method baz in class Foo.");
    Ok(())
}

#[test]
fn test_method_in_class_truncates_after_three() -> Result<()> {
    let harness = TestHarness::new()?;
    for dir in ["a", "b", "c", "d"] {
        harness.create_test_file(
            &format!("{}/Worker.java", dir),
            "class Worker {\n    void work() {\n        rest();\n    }\n}\n",
        )?;
    }
    let engine = harness.engine()?;

    let output = engine.find_method_in_class("work", "Worker");
    assert!(output.success());
    assert_eq!(output.summary, "Found 4 methods with name work in class Worker:\n\n");
    assert!(output.text.contains(
        "Too many results, showing full code for 3 of them, and the rest just file names:\n"
    ));
    assert_eq!(output.text.matches("<code>").count(), 3);
    assert!(output
        .text
        .ends_with("Other results are in these files:\n- <file>d/Worker.java</file> (1 matches)\n"));
    Ok(())
}

#[test]
fn test_find_method_shows_body() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "Account.java",
        "public class Account {\n    private long balance;\n\n    public Account(long opening) {\n        balance = opening;\n    }\n\n    public void deposit(long amount) {\n        balance += amount;\n    }\n}\n",
    )?;
    let engine = harness.engine()?;

    let deposit = engine.find_method("deposit");
    assert!(deposit.success());
    assert!(deposit.text.contains("<class>Account</class> <method>deposit</method>"));
    assert!(deposit.text.contains("        balance += amount;\n"));

    let constructor = engine.find_method("Account");
    assert!(constructor.success());
    assert!(constructor.text.contains("        balance = opening;\n"));

    let field = engine.find_method("balance");
    assert_eq!(field.status, Status::NotFound(Miss::Symbol));
    assert_eq!(field.text, "Could not find method balance in the codebase.");
    Ok(())
}

#[test]
fn test_find_method_collapses_after_three() -> Result<()> {
    let harness = TestHarness::new()?;
    for name in ["A", "B", "C", "D"] {
        harness.create_test_file(
            &format!("{}.java", name),
            &format!("class {} {{\n    void close() {{}}\n}}\n", name),
        )?;
    }
    let engine = harness.engine()?;

    let output = engine.find_method("close");
    assert!(output.success());
    assert!(output.text.starts_with(
        "Found 4 methods with name close in the codebase:\n\nThey appeared in the following files:\n"
    ));
    assert!(output.text.contains("- <file>D.java</file> (1 matches)\n"));
    assert!(!output.text.contains("<code>"));
    Ok(())
}
