use super::*;

fn os_args(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

#[test]
fn posix_escape_wraps_in_single_quotes() {
    assert_eq!(shell_escape(OsStr::new("a b"), OsFamily::Unix), "'a b'");
    assert_eq!(
        shell_escape(OsStr::new("it's"), OsFamily::Darwin),
        "'it'\\''s'"
    );
}

#[test]
fn windows_escape_strips_expansion_characters() {
    assert_eq!(
        shell_escape(OsStr::new("C:\\Program Files\\sassc.exe"), OsFamily::Windows),
        "\"C:\\Program Files\\sassc.exe\""
    );
    assert_eq!(
        shell_escape(OsStr::new("%PATH%!\"x"), OsFamily::Windows),
        "\" PATH   x\""
    );
}

#[test]
fn command_line_escapes_program_and_every_argument() {
    let line = render_command_line(
        Path::new("/opt/my tools/sassc"),
        &os_args(&["--load-path", "./", "-s"]),
        OsFamily::Unix,
    );
    assert_eq!(line, "'/opt/my tools/sassc' '--load-path' './' '-s'");
}

#[test]
fn output_success_requires_zero_exit() {
    assert!(ProcessOutput {
        exit_code: Some(0),
        ..Default::default()
    }
    .success());
    assert!(!ProcessOutput {
        exit_code: Some(1),
        ..Default::default()
    }
    .success());
    assert!(!ProcessOutput::default().success());
}

#[test]
fn missing_program_is_a_launch_error() {
    let err = SystemRunner::new()
        .run(
            Path::new("/definitely/not/here/sassc"),
            &os_args(&["-s"]),
            Some(b"a{}"),
        )
        .unwrap_err();
    assert!(matches!(err, ScssError::ProcessLaunch { .. }), "{err}");
}

#[cfg(unix)]
#[test]
fn system_runner_pipes_stdin_to_stdout() {
    let out = SystemRunner::new()
        .run(Path::new("/bin/sh"), &os_args(&["-c", "cat"]), Some(b"a { b: c }"))
        .unwrap();
    assert!(out.success());
    assert_eq!(out.stdout, b"a { b: c }");
    assert!(out.stderr.is_empty());
}

#[cfg(unix)]
#[test]
fn system_runner_captures_stderr_and_exit_code() {
    let out = SystemRunner::new()
        .run(
            Path::new("/bin/sh"),
            &os_args(&["-c", "echo broken >&2; exit 3"]),
            Some(b"ignored"),
        )
        .unwrap();
    assert_eq!(out.exit_code, Some(3));
    assert_eq!(String::from_utf8_lossy(&out.stderr).trim(), "broken");
}

#[cfg(unix)]
#[test]
fn system_runner_handles_large_payloads() {
    let payload = "x".repeat(1 << 20);
    let out = SystemRunner::new()
        .run(
            Path::new("/bin/sh"),
            &os_args(&["-c", "cat"]),
            Some(payload.as_bytes()),
        )
        .unwrap();
    assert_eq!(out.stdout.len(), payload.len());
}

#[cfg(unix)]
#[test]
fn system_runner_without_stdin_uses_null_input() {
    let out = SystemRunner::new()
        .run(Path::new("/bin/sh"), &os_args(&["-c", "cat; echo done"]), None)
        .unwrap();
    assert!(out.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "done\n");
}

#[cfg(unix)]
#[test]
fn system_runner_kills_child_after_timeout() {
    let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(50)));
    let err = runner
        .run(Path::new("/bin/sh"), &os_args(&["-c", "exec sleep 5"]), None)
        .unwrap_err();
    assert!(matches!(err, ScssError::ProcessTimeout { .. }), "{err}");
}

#[cfg(unix)]
#[test]
fn timeout_holds_while_child_ignores_large_stdin() {
    let payload = "a".repeat(2 << 20);
    let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(100)));
    let started = std::time::Instant::now();

    let err = runner
        .run(
            Path::new("/bin/sh"),
            &os_args(&["-c", "exec sleep 3"]),
            Some(payload.as_bytes()),
        )
        .unwrap_err();

    assert!(matches!(err, ScssError::ProcessTimeout { .. }), "{err}");
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "took {:?}",
        started.elapsed()
    );
}

#[cfg(unix)]
#[test]
fn child_exiting_without_reading_stdin_is_judged_by_exit_code() {
    let payload = "a".repeat(2 << 20);
    let out = SystemRunner::new()
        .run(
            Path::new("/bin/sh"),
            &os_args(&["-c", "echo skipped; exit 4"]),
            Some(payload.as_bytes()),
        )
        .unwrap();
    assert_eq!(out.exit_code, Some(4));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "skipped\n");
}

#[test]
fn zero_timeout_means_no_bound() {
    assert_eq!(SystemRunner::new().with_timeout(Some(Duration::ZERO)).timeout(), None);
}
