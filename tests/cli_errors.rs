#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_in(dir: &Path, args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_aurdoc"))
		.current_dir(dir)
		.args(args)
		.output()
		.expect("command executes")
}

fn stderr_text(output: &Output) -> String {
	String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn duplicate_basenames_abort_create_before_output() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	fs::write(dir.path().join("a.txt"), b"top").expect("input writes");
	fs::create_dir(dir.path().join("sub")).expect("subdir builds");
	fs::write(dir.path().join("sub/a.txt"), b"nested").expect("input writes");

	let output = run_in(dir.path(), &["-c", "-f", "pack.erf", "a.txt", "sub/a.txt"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(stderr_text(&output).contains("duplicate entry"), "stderr names the problem");
	assert!(!dir.path().join("pack.erf").exists(), "nothing was written");
}

#[test]
fn allow_duplicates_keeps_both_members() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	fs::write(dir.path().join("a.txt"), b"top").expect("input writes");
	fs::create_dir(dir.path().join("sub")).expect("subdir builds");
	fs::write(dir.path().join("sub/a.txt"), b"nested").expect("input writes");

	let output = run_in(
		dir.path(),
		&["-c", "--allow-duplicates", "-f", "pack.erf", "a.txt", "sub/a.txt"],
	);
	assert!(output.status.success(), "create succeeds: {output:?}");

	let listed = run_in(dir.path(), &["-t", "-f", "pack.erf"]);
	let names: Vec<_> = String::from_utf8_lossy(&listed.stdout).lines().map(str::to_owned).collect();
	assert_eq!(names, vec!["a.txt", "a.txt"]);
}

#[test]
fn duplicate_add_leaves_the_archive_untouched() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	fs::write(dir.path().join("a.txt"), b"top").expect("input writes");
	assert!(run_in(dir.path(), &["-c", "-f", "pack.erf", "a.txt"]).status.success());
	let before = fs::read(dir.path().join("pack.erf")).expect("archive reads");

	let output = run_in(dir.path(), &["-a", "-f", "pack.erf", "a.txt"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(stderr_text(&output).contains("duplicate entry"));
	assert_eq!(fs::read(dir.path().join("pack.erf")).expect("archive reads"), before);
}

#[test]
fn missing_extract_targets_fail_late_but_extract_the_rest() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	fs::write(dir.path().join("a.txt"), b"alpha").expect("input writes");
	assert!(run_in(dir.path(), &["-c", "-f", "pack.erf", "a.txt"]).status.success());

	let out_dir = tempfile::TempDir::new().expect("tempdir builds");
	let archive = dir.path().join("pack.erf");
	let output = run_in(
		out_dir.path(),
		&["-x", "-f", archive.to_str().expect("utf8 path"), "a.txt", "nope.txt"],
	);

	assert_eq!(output.status.code(), Some(1));
	assert!(stderr_text(&output).contains("no such member: nope.txt"));
	assert_eq!(fs::read(out_dir.path().join("a.txt")).expect("member reads"), b"alpha");
	assert!(!out_dir.path().join("nope.txt").exists());
}

#[test]
fn missing_remove_targets_fail_after_the_rebuild() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	fs::write(dir.path().join("a.txt"), b"alpha").expect("input writes");
	fs::write(dir.path().join("b.txt"), b"beta").expect("input writes");
	assert!(run_in(dir.path(), &["-c", "-f", "pack.erf", "a.txt", "b.txt"]).status.success());

	let output = run_in(dir.path(), &["-r", "-f", "pack.erf", "a.txt", "nope.txt"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(stderr_text(&output).contains("no such member: nope.txt"));

	let listed = run_in(dir.path(), &["-t", "-f", "pack.erf"]);
	let names: Vec<_> = String::from_utf8_lossy(&listed.stdout).lines().map(str::to_owned).collect();
	assert_eq!(names, vec!["b.txt"], "found member was still removed");
}

#[test]
fn argument_errors_exit_with_status_one() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");

	let no_mode = run_in(dir.path(), &["-f", "pack.erf"]);
	assert_eq!(no_mode.status.code(), Some(1));

	let two_modes = run_in(dir.path(), &["-t", "-c", "-f", "pack.erf"]);
	assert_eq!(two_modes.status.code(), Some(1));

	let unknown = run_in(dir.path(), &["--frobnicate"]);
	assert_eq!(unknown.status.code(), Some(1));
}

#[test]
fn help_exits_clean() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	let help = run_in(dir.path(), &["-h"]);
	assert_eq!(help.status.code(), Some(0));
	assert!(String::from_utf8_lossy(&help.stdout).contains("--list"));
}

#[test]
fn unreadable_archive_exits_with_status_one() {
	let dir = tempfile::TempDir::new().expect("tempdir builds");
	let output = run_in(dir.path(), &["-t", "-f", "missing.erf"]);
	assert_eq!(output.status.code(), Some(1));
	assert!(stderr_text(&output).starts_with("error:"));
}
