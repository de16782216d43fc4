use crate::aggregator::{ProbeObserver, RunStatus, RunSummary};
use crate::config::OutputMode;
use crate::prober::{ProbeOutcome, ProbeResult, ProbeTarget};
use std::io::{self, Write};

const BANNER_WIDTH: usize = 60;

/// Renders the human-readable report. Writes to any sink; `main` hands it stdout.
pub struct Reporter<W: Write> {
    out: W,
    mode: OutputMode,
    timeout_secs: u64,
    // first write failure seen by the observer hooks, which cannot return one
    deferred: Option<io::Error>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, mode: OutputMode, timeout_secs: u64) -> Self {
        Self {
            out,
            mode,
            timeout_secs,
            deferred: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Surface any write error swallowed while probes were running.
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.deferred.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        if self.mode == OutputMode::Quiet {
            return Ok(());
        }
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "Baidu.com HTTP Connectivity Tester")?;
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "Timeout: {}s", self.timeout_secs)
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        if self.mode == OutputMode::Quiet {
            for r in &summary.results {
                writeln!(self.out, "{}: {}", r.label, status_text(r))?;
            }
            return self.out.flush();
        }

        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "SUMMARY")?;
        writeln!(self.out, "{}", rule)?;

        for r in &summary.results {
            let icon = if r.succeeded() { "✓" } else { "✗" };
            writeln!(self.out, "{} {}: {}", icon, r.label, status_text(r))?;
            if let Some(code) = r.status_code() {
                writeln!(self.out, "  Status Code: {}", code)?;
            }
            writeln!(self.out, "  Response Time: {:.3}s", r.elapsed_seconds())?;
            if let Some(err) = r.error() {
                writeln!(self.out, "  Error: {}", err)?;
            }
        }

        writeln!(self.out, "{}", rule)?;
        writeln!(
            self.out,
            "Tests Passed: {}/{}",
            summary.success_count(),
            summary.total_count()
        )?;
        writeln!(self.out, "{}", rule)?;

        let verdict = match summary.status() {
            RunStatus::AllPassed => "✓ All tests passed!",
            RunStatus::Partial => "⚠ Some tests passed, but not all",
            RunStatus::AllFailed => "✗ All tests failed",
        };
        writeln!(self.out, "\n{}\n", verdict)?;
        self.out.flush()
    }

    fn write_start(&mut self, target: &ProbeTarget<'_>) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Testing {}: {}", target.label, target.url)?;
        writeln!(self.out, "{}", "-".repeat(BANNER_WIDTH))?;
        self.out.flush()
    }

    fn write_detail(&mut self, r: &ProbeResult) -> io::Result<()> {
        let secs = r.elapsed_seconds();
        match &r.outcome {
            ProbeOutcome::Success { status, .. } => {
                writeln!(self.out, "✓ Status Code: {}", status)?;
                writeln!(self.out, "✓ Response Time: {:.3}s", secs)?;
                if let Some(to) = r.redirected_url() {
                    writeln!(self.out, "✓ Redirected to: {}", to)?;
                }
                writeln!(self.out, "✓ Connection: SUCCESS")?;
            }
            ProbeOutcome::HttpError { status, reason, .. } => {
                writeln!(self.out, "✗ HTTP Error: {} {}", status, reason)?;
                writeln!(self.out, "✗ Response Time: {:.3}s", secs)?;
                writeln!(self.out, "✗ Connection: FAILED")?;
            }
            ProbeOutcome::Transport { reason } => {
                writeln!(self.out, "✗ URL Error: {}", reason)?;
                writeln!(self.out, "✗ Response Time: {:.3}s", secs)?;
                writeln!(self.out, "✗ Connection: FAILED")?;
            }
            ProbeOutcome::Timeout { after_secs } => {
                writeln!(self.out, "✗ Timeout: Connection timed out after {}s", after_secs)?;
                writeln!(self.out, "✗ Connection: FAILED")?;
            }
            ProbeOutcome::Unexpected { description } => {
                writeln!(self.out, "✗ Unexpected Error: {}", description)?;
                writeln!(self.out, "✗ Connection: FAILED")?;
            }
        }
        self.out.flush()
    }

    fn defer(&mut self, res: io::Result<()>) {
        if let Err(e) = res {
            self.deferred.get_or_insert(e);
        }
    }
}

impl<W: Write> ProbeObserver for Reporter<W> {
    fn on_start(&mut self, target: &ProbeTarget<'_>) {
        if self.mode == OutputMode::Verbose {
            let res = self.write_start(target);
            self.defer(res);
        }
    }

    fn on_finish(&mut self, result: &ProbeResult) {
        if self.mode == OutputMode::Verbose {
            let res = self.write_detail(result);
            self.defer(res);
        }
    }
}

fn status_text(r: &ProbeResult) -> &'static str {
    if r.succeeded() { "SUCCESS" } else { "FAILED" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(label: &str, elapsed_ms: u64, outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult {
            label: label.to_string(),
            url: format!("http://{}.test", label.to_lowercase()),
            elapsed: Duration::from_millis(elapsed_ms),
            outcome,
        }
    }

    fn ok(label: &str) -> ProbeResult {
        result(
            label,
            123,
            ProbeOutcome::Success {
                status: 200,
                redirected_url: None,
            },
        )
    }

    fn not_found(label: &str) -> ProbeResult {
        result(
            label,
            45,
            ProbeOutcome::HttpError {
                status: 404,
                reason: "Not Found".to_string(),
                redirected_url: None,
            },
        )
    }

    fn render(mode: OutputMode, f: impl FnOnce(&mut Reporter<Vec<u8>>)) -> String {
        let mut reporter = Reporter::new(Vec::new(), mode, 10);
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn banner_shows_timeout() {
        let out = render(OutputMode::Normal, |r| r.banner().unwrap());
        let rule = "=".repeat(60);
        assert_eq!(
            out,
            format!("{rule}\nBaidu.com HTTP Connectivity Tester\n{rule}\nTimeout: 10s\n")
        );
    }

    #[test]
    fn quiet_prints_only_pass_fail_lines() {
        let summary = RunSummary {
            results: vec![ok("HTTP"), not_found("HTTPS")],
        };
        let out = render(OutputMode::Quiet, |r| {
            r.banner().unwrap();
            r.on_start(&ProbeTarget::new("HTTP", "http://http.test"));
            r.on_finish(&summary.results[0]);
            r.summary(&summary).unwrap();
        });
        assert_eq!(out, "HTTP: SUCCESS\nHTTPS: FAILED\n");
    }

    #[test]
    fn summary_lists_each_result_and_verdict() {
        let summary = RunSummary {
            results: vec![ok("HTTP"), not_found("HTTPS")],
        };
        let out = render(OutputMode::Normal, |r| r.summary(&summary).unwrap());

        assert!(out.starts_with(&format!("\n{}\nSUMMARY\n", "=".repeat(60))));
        assert!(out.contains("✓ HTTP: SUCCESS\n  Status Code: 200\n  Response Time: 0.123s\n"));
        assert!(out.contains(
            "✗ HTTPS: FAILED\n  Status Code: 404\n  Response Time: 0.045s\n  Error: HTTP Error: 404 Not Found\n"
        ));
        assert!(out.contains("Tests Passed: 1/2\n"));
        assert!(out.ends_with("\n⚠ Some tests passed, but not all\n\n"));
    }

    #[test]
    fn verdict_tracks_run_status() {
        let all_ok = RunSummary {
            results: vec![ok("HTTP"), ok("HTTPS")],
        };
        let out = render(OutputMode::Normal, |r| r.summary(&all_ok).unwrap());
        assert!(out.ends_with("\n✓ All tests passed!\n\n"));

        let none_ok = RunSummary {
            results: vec![not_found("HTTP"), not_found("HTTPS")],
        };
        let out = render(OutputMode::Normal, |r| r.summary(&none_ok).unwrap());
        assert!(out.contains("Tests Passed: 0/2\n"));
        assert!(out.ends_with("\n✗ All tests failed\n\n"));
    }

    #[test]
    fn verbose_success_detail_includes_redirect() {
        let redirected = result(
            "HTTP",
            2,
            ProbeOutcome::Success {
                status: 200,
                redirected_url: Some("https://www.baidu.com/".to_string()),
            },
        );
        let out = render(OutputMode::Verbose, |r| {
            r.on_start(&ProbeTarget::new("HTTP", "http://www.baidu.com"));
            r.on_finish(&redirected);
            r.take_error().unwrap();
        });
        assert_eq!(
            out,
            format!(
                "\nTesting HTTP: http://www.baidu.com\n{}\n\
                 ✓ Status Code: 200\n\
                 ✓ Response Time: 0.002s\n\
                 ✓ Redirected to: https://www.baidu.com/\n\
                 ✓ Connection: SUCCESS\n",
                "-".repeat(60)
            )
        );
    }

    #[test]
    fn verbose_failure_details() {
        let timeout = result("HTTP", 10_000, ProbeOutcome::Timeout { after_secs: 10 });
        let out = render(OutputMode::Verbose, |r| r.on_finish(&timeout));
        assert_eq!(
            out,
            "✗ Timeout: Connection timed out after 10s\n✗ Connection: FAILED\n"
        );

        let refused = result(
            "HTTPS",
            7,
            ProbeOutcome::Transport {
                reason: "Connection refused (os error 111)".to_string(),
            },
        );
        let out = render(OutputMode::Verbose, |r| r.on_finish(&refused));
        assert_eq!(
            out,
            "✗ URL Error: Connection refused (os error 111)\n\
             ✗ Response Time: 0.007s\n\
             ✗ Connection: FAILED\n"
        );
    }

    #[test]
    fn normal_mode_skips_progress() {
        let out = render(OutputMode::Normal, |r| {
            r.on_start(&ProbeTarget::new("HTTP", "http://www.baidu.com"));
            r.on_finish(&ok("HTTP"));
        });
        assert!(out.is_empty());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn observer_write_errors_are_deferred() {
        let mut reporter = Reporter::new(Broken, OutputMode::Verbose, 10);
        reporter.on_finish(&ok("HTTP"));
        let err = reporter.take_error().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(reporter.take_error().is_ok());
    }
}
