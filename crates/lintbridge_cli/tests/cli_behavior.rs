//! Integration tests for CLI behavior
//!
//! The external tools are replaced by small `sh` scripts that mimic the
//! Closure Linter output format.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Helper to create a command for the lintbridge CLI
fn lintbridge_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lintbridge"));
    cmd.env_remove("LINTBRIDGE_LINT_CMD");
    cmd.env_remove("LINTBRIDGE_FIX_CMD");
    cmd
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        lintbridge_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        lintbridge_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod config_command {
    use super::*;

    #[test]
    fn prints_defaults_without_gjslintrc() {
        let project = TempDir::new().unwrap();

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("config")
            .arg(project.child("src/app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""lintFlags": "--quiet --nosummary --strict""#,
            ))
            .stdout(predicate::str::contains(r#""fixFlags": "--strict""#));
    }

    #[test]
    fn nearest_gjslintrc_wins() {
        let project = TempDir::new().unwrap();
        project
            .child(".gjslintrc")
            .write_str(r#"{ "flags": { "lint": "--root-level" } }"#)
            .unwrap();
        project
            .child("src/.gjslintrc")
            .write_str(r#"{ "flags": { "gjslint": "--nested" } }"#)
            .unwrap();

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("config")
            .arg(project.child("src/app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""lintFlags": "--nested""#))
            .stdout(predicate::str::contains(r#""fixFlags": "--strict""#));
    }

    #[test]
    fn malformed_gjslintrc_is_an_error() {
        let project = TempDir::new().unwrap();
        project.child(".gjslintrc").write_str("{ nope").unwrap();

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("config")
            .arg(project.child("app.js").path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains(".gjslintrc"));
    }

    #[test]
    fn file_outside_root_is_an_error() {
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("config")
            .arg(elsewhere.child("app.js").path())
            .assert()
            .code(2);
    }
}

#[cfg(unix)]
mod tool_commands {
    use super::*;

    /// Writes a tool script and returns the `--lint-cmd`/`--fix-cmd` value.
    fn tool(dir: &TempDir, name: &str, body: &str) -> String {
        let script = dir.child(name);
        script.write_str(&format!("#!/bin/sh\n{body}\n")).unwrap();
        format!("sh {}", script.path().display())
    }

    /// Reports a missing semicolon echoing the first line of the checked copy.
    fn lint_tool(dir: &TempDir) -> String {
        tool(
            dir,
            "lint.sh",
            r#"for last; do :; done
echo "Line 1, E:0010: Missing semicolon: $(head -n 1 "$last")"
echo "Line 3, W:0131: Single-quoted string preferred""#,
        )
    }

    /// Rewrites the checked copy to the styled text.
    fn fix_tool(dir: &TempDir) -> String {
        tool(
            dir,
            "fix.sh",
            r#"for last; do :; done
printf 'var a = 1;\n' > "$last""#,
        )
    }

    fn project_with(text: &str) -> TempDir {
        let project = TempDir::new().unwrap();
        project.child("app.js").write_str(text).unwrap();
        project
    }

    #[test]
    fn lint_reports_diagnostics_and_fails_on_errors() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint_tool(&tools))
            .arg("lint")
            .arg(project.child("app.js").path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains(
                "app.js:1: error [0010]: E:0010: Missing semicolon: var a = 1",
            ))
            .stdout(predicate::str::contains(
                "app.js:3: warning [0131]: W:0131: Single-quoted string preferred",
            ))
            .stdout(predicate::str::contains("Found 1 errors and 1 warnings"));

        // The temp copy is gone.
        assert_eq!(std::fs::read_dir(project.path()).unwrap().count(), 1);
    }

    #[test]
    fn lint_warnings_only_succeeds() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1;\n");
        let lint = tool(&tools, "lint.sh", "echo 'Line 2, W:0131: Quotes'");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint)
            .arg("lint")
            .arg(project.child("app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains("warning [0131]"));
    }

    #[test]
    fn lint_stdin_checks_unsaved_text() {
        let tools = TempDir::new().unwrap();
        let project = project_with("saved text\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint_tool(&tools))
            .arg("lint")
            .arg("--stdin")
            .arg(project.child("app.js").path())
            .write_stdin("unsaved text\n")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Missing semicolon: unsaved text"));

        project.child("app.js").assert("saved text\n");
    }

    #[test]
    fn lint_json_output() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");

        let output = lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint_tool(&tools))
            .arg("lint")
            .arg("--format")
            .arg("json")
            .arg(project.child("app.js").path())
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["errors"][0]["line"], 0);
        assert_eq!(json["errors"][0]["severity"], "error");
        assert_eq!(json["errors"][1]["code"], "0131");
    }

    #[test]
    fn lint_tool_stderr_is_an_operational_error() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");
        let lint = tool(&tools, "lint.sh", "echo 'gjslint: unknown flag' >&2");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint)
            .arg("lint")
            .arg(project.child("app.js").path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown flag"));
    }

    #[test]
    fn lint_command_from_environment() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");

        lintbridge_cmd()
            .env("LINTBRIDGE_LINT_CMD", lint_tool(&tools))
            .arg("--root")
            .arg(project.path())
            .arg("lint")
            .arg(project.child("app.js").path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("[0010]"));
    }

    #[test]
    fn lint_passes_configured_flags() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");
        project
            .child(".gjslintrc")
            .write_str(r#"{ "flags": { "lint": "--disable 0131" } }"#)
            .unwrap();
        let lint = tool(&tools, "lint.sh", r#"echo "Line 1, W:0001: args $1 $2""#);

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--lint-cmd")
            .arg(lint)
            .arg("lint")
            .arg(project.child("app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains("args --disable 0131"));
    }

    #[test]
    fn fix_rewrites_file_once() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--fix-cmd")
            .arg(fix_tool(&tools))
            .arg("fix")
            .arg(project.child("app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Fixed"));

        project.child("app.js").assert("var a = 1;\n");
        assert_eq!(std::fs::read_dir(project.path()).unwrap().count(), 1);
    }

    #[test]
    fn fix_of_styled_file_is_a_no_op() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1;\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--fix-cmd")
            .arg(fix_tool(&tools))
            .arg("fix")
            .arg(project.child("app.js").path())
            .assert()
            .success()
            .stdout(predicate::str::contains("already styled"));
    }

    #[test]
    fn fix_check_does_not_write() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--fix-cmd")
            .arg(fix_tool(&tools))
            .arg("fix")
            .arg("--check")
            .arg(project.child("app.js").path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("needs fixing"));

        project.child("app.js").assert("var a = 1\n");
    }

    #[test]
    fn fix_stdin_prints_fixed_text() {
        let tools = TempDir::new().unwrap();
        let project = project_with("saved\n");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--fix-cmd")
            .arg(fix_tool(&tools))
            .arg("fix")
            .arg("--stdin")
            .arg(project.child("app.js").path())
            .write_stdin("var a = 1\n")
            .assert()
            .success()
            .stdout("var a = 1;\n");

        project.child("app.js").assert("saved\n");
    }

    #[test]
    fn fix_failure_leaves_file_untouched() {
        let tools = TempDir::new().unwrap();
        let project = project_with("var a = 1\n");
        let fix = tool(&tools, "fix.sh", "echo 'fixjsstyle: crashed' >&2\nexit 3");

        lintbridge_cmd()
            .arg("--root")
            .arg(project.path())
            .arg("--fix-cmd")
            .arg(fix)
            .arg("fix")
            .arg(project.child("app.js").path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("crashed"));

        project.child("app.js").assert("var a = 1\n");
    }
}
