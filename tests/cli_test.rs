// Exit codes and output of the binary

use std::process::{Command, Output};

fn heapwalk(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_heapwalk"))
        .args(args)
        .output()
        .expect("Failed to launch heapwalk")
}

#[test]
fn test_plain_run_exits_zero() {
    let output = heapwalk(&[]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    println!("stdout:\n{}", stdout);

    assert!(stdout.contains("The value is: 26"));
    assert!(stdout.contains("p[0] == *p: true"));
    assert!(stdout.contains("[ 1 2 3 4 ]\n[ 1 2 3 4 5 6 7 8 ]\n"));
    assert!(stdout.contains("p value: 5"));
    assert!(stdout.contains("unreachable"));
    assert!(stdout.contains("square of 4 is: 16"));
    assert!(stdout.contains("Leak summary: 2 blocks (8 bytes) never released"));

    // Leaks are narrated, not reported as errors
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(!stderr.contains("Fatal"));
}

#[test]
fn test_unknown_flag_exits_two() {
    let output = heapwalk(&["--bogus"]);
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unknown argument '--bogus'"));
    assert!(stderr.contains("Usage:"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help_exits_zero() {
    let output = heapwalk(&["--help"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Usage: "));
    assert!(stdout.contains("--tui"));
    assert!(!stdout.contains("Leak summary"));
}

#[test]
fn test_allocation_failure_exits_non_zero() {
    // Enough for the first two routines only
    let output = heapwalk(&["--heap-limit", "16"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("The value is: 26"));
    assert!(stdout.contains("[ 1 2 3 4 ]"));
    assert!(!stdout.contains("[ 1 2 3 4 5 6 7 8 ]"));
    assert!(!stdout.contains("square of 4 is"));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Fatal: Out of memory"));
}
