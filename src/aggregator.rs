use crate::prober::{ProbeResult, ProbeTarget, http::probe_http};
use tracing::debug;

/// Hooks fired around each probe, in target order.
pub trait ProbeObserver {
    fn on_start(&mut self, _target: &ProbeTarget<'_>) {}
    fn on_finish(&mut self, _result: &ProbeResult) {}
}

impl ProbeObserver for () {}

/// Aggregate verdict over a run, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    AllPassed,
    Partial,
    AllFailed,
}

impl RunStatus {
    pub fn from_counts(success_count: usize, total_count: usize) -> Self {
        if success_count == total_count {
            RunStatus::AllPassed
        } else if success_count > 0 {
            RunStatus::Partial
        } else {
            RunStatus::AllFailed
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::AllPassed => 0,
            RunStatus::Partial => 1,
            RunStatus::AllFailed => 2,
        }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<ProbeResult>,
}

impl RunSummary {
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    pub fn status(&self) -> RunStatus {
        RunStatus::from_counts(self.success_count(), self.total_count())
    }
}

pub struct Aggregator {
    timeout_secs: u64,
}

impl Aggregator {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    pub async fn run_all(&self, targets: &[ProbeTarget<'_>]) -> RunSummary {
        self.run_observed(targets, &mut ()).await
    }

    /// Probe each target in order, one at a time; a probe finishes before the next starts.
    pub async fn run_observed<O>(&self, targets: &[ProbeTarget<'_>], observer: &mut O) -> RunSummary
    where
        O: ProbeObserver + ?Sized,
    {
        let mut results = Vec::with_capacity(targets.len());
        for t in targets {
            observer.on_start(t);
            let result = probe_http(t.label, t.url, self.timeout_secs).await;
            observer.on_finish(&result);
            results.push(result);
        }

        let summary = RunSummary { results };
        debug!(
            "run complete: {}/{} succeeded, status {:?}",
            summary.success_count(),
            summary.total_count(),
            summary.status()
        );
        summary
    }
}
