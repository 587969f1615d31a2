//! Demo suite: a few deliberately broken tests plus tests for small
//! file-manager helpers. Files live in a scratch directory under the system
//! temp dir.

use std::fs;
use std::path::PathBuf;

use testique::prelude::*;
use testique::Namespace;

// ============================================================================
// FILE MANAGER HELPERS (code under test)
// ============================================================================

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("testique-demo");
    let _ = fs::create_dir_all(&dir);
    dir.join(name)
}

/// Contents of `name`, or `None` if it cannot be read.
fn read_file(name: &str) -> Option<String> {
    fs::read_to_string(scratch(name)).ok()
}

fn create_file(name: &str, content: &str) -> bool {
    fs::write(scratch(name), content).is_ok()
}

/// False if the file did not exist.
fn delete_file(name: &str) -> bool {
    fs::remove_file(scratch(name)).is_ok()
}

fn remove_if_exists(name: &str) -> Outcome {
    let path = scratch(name);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

// ============================================================================
// ASSORTED OUTCOMES
// ============================================================================

fn test_foo() -> Outcome {
    assert_almost_equal(6.666666677, 6.666666666699)
}

fn setup_bar() -> Outcome {
    Err("Setup bar exception.".into())
}

fn test_bar() -> Outcome {
    Ok(())
}

fn teardown_bar() -> Outcome {
    Ok(())
}

fn test_foobar() -> Outcome {
    assert_true(false)
}

fn test_foobarfoo() -> Outcome {
    Err(Failure::raised("NameError", "FooBarFoo weird name."))
}

fn teardown_foobarfoo() -> Outcome {
    Err("Teardown foobarfoo exception.".into())
}

fn test_barfoo() -> Outcome {
    let parts: Vec<&str> = "bar".split(',').collect();
    assert_equal(&parts[1], &"foo")
}

// ============================================================================
// FILE MANAGER TESTS
// ============================================================================

const READ_CONTENT: &str = "This is a test file.";

fn test_read_file_not_exist() -> Outcome {
    assert_none(&read_file("test_file_read_text.txt"))
}

fn setup_read_file_content() -> Outcome {
    fs::write(scratch("test_file_read_content.txt"), READ_CONTENT)?;
    Ok(())
}

fn test_read_file_content() -> Outcome {
    assert_equal(
        &Some(READ_CONTENT.to_string()),
        &read_file("test_file_read_content.txt"),
    )
}

fn teardown_read_file_content() -> Outcome {
    remove_if_exists("test_file_read_content.txt")
}

fn test_create_file_true() -> Outcome {
    let created = create_file("test_file_create.txt", "");
    assert_true(scratch("test_file_create.txt").exists())?;
    assert_true(created)
}

fn teardown_create_file_true() -> Outcome {
    remove_if_exists("test_file_create.txt")
}

fn test_create_file_content() -> Outcome {
    let content = "I have created a file";
    create_file("test_file_create_content.txt", content);
    assert_true(scratch("test_file_create_content.txt").exists())?;
    let written = fs::read_to_string(scratch("test_file_create_content.txt"))?;
    assert_multiline_equal(content, &written)
}

fn teardown_create_file_content() -> Outcome {
    remove_if_exists("test_file_create_content.txt")
}

fn setup_delete_file_exist() -> Outcome {
    fs::write(scratch("test_file_delete_exist.txt"), READ_CONTENT)?;
    Ok(())
}

fn test_delete_file_exist() -> Outcome {
    let deleted = delete_file("test_file_delete_exist.txt");
    assert_false(scratch("test_file_delete_exist.txt").exists())?;
    assert_true(deleted)
}

fn teardown_delete_file_exist() -> Outcome {
    remove_if_exists("test_file_delete_exist.txt")
}

fn test_delete_file_not_exist() -> Outcome {
    let deleted = delete_file("test_file_delete_not_exist.txt");
    assert_false(scratch("test_file_delete_not_exist.txt").exists())?;
    assert_false(deleted)
}

/// Every binding of the demo suite, in declaration order.
pub fn namespace() -> Namespace {
    Namespace::new()
        .action("test_foo", test_foo)
        .action("setup_bar", setup_bar)
        .action("test_bar", test_bar)
        .action("teardown_bar", teardown_bar)
        .action("test_foobar", test_foobar)
        .action("test_foobarfoo", test_foobarfoo)
        .action("teardown_foobarfoo", teardown_foobarfoo)
        .action("test_barfoo", test_barfoo)
        .action("test_read_file_not_exist", test_read_file_not_exist)
        .action("setup_read_file_content", setup_read_file_content)
        .action("test_read_file_content", test_read_file_content)
        .action("teardown_read_file_content", teardown_read_file_content)
        .action("test_create_file_true", test_create_file_true)
        .action("teardown_create_file_true", teardown_create_file_true)
        .action("test_create_file_content", test_create_file_content)
        .action("teardown_create_file_content", teardown_create_file_content)
        .action("setup_delete_file_exist", setup_delete_file_exist)
        .action("test_delete_file_exist", test_delete_file_exist)
        .action("teardown_delete_file_exist", teardown_delete_file_exist)
        .action("test_delete_file_not_exist", test_delete_file_not_exist)
        .value("read_file", read_file as fn(&str) -> Option<String>)
        .value("create_file", create_file as fn(&str, &str) -> bool)
        .value("delete_file", delete_file as fn(&str) -> bool)
}
