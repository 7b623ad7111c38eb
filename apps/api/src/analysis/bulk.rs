//! Bulk analysis orchestrator.
//!
//! Fans analysis calls out to the provider in fixed-size concurrent batches,
//! pausing between batches to respect provider rate limits. Per-job failures
//! are captured as data and never escape the batch loop; every input job is
//! accounted for as analyzed, failed, or skipped. Successes are ranked by
//! suitability score, descending, with input order preserved on ties.

use std::cmp::Reverse;
use std::time::Duration;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::models::analysis::{AnalysisResult, RankedAnalysis};
use crate::models::job::JobPosting;
use crate::models::profile::ProfileData;
use crate::providers::{ProviderClient, ProviderError};

/// Pacing knobs for one bulk-analysis invocation. The batch size also bounds
/// concurrency: at most `batch_size` provider calls are in flight at once.
#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub batch_size: usize,
    /// Delay inserted between consecutive batches, never after the last.
    pub batch_pause: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            batch_size: 10,
            batch_pause: Duration::from_secs(60),
        }
    }
}

/// What happened to one input job.
#[derive(Debug)]
pub enum Outcome {
    Analyzed(AnalysisResult),
    Failed(ProviderError),
    /// Never dispatched: the configured provider has no implementation.
    Skipped,
}

/// Raw per-job result, prior to ranking. Exactly one entry exists per input
/// job, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub job: JobPosting,
    pub outcome: Outcome,
}

/// Runs the full pipeline: batched concurrent dispatch, then ranking.
///
/// `provider` is `None` when configuration resolution found no usable
/// provider; every job is then recorded as skipped without any dispatch.
pub async fn analyze_all(
    provider: Option<&dyn ProviderClient>,
    jobs: &[JobPosting],
    profile: &ProfileData,
    options: &BulkOptions,
) -> Vec<RankedAnalysis> {
    info!("starting bulk analysis for {} jobs", jobs.len());
    let outcomes = run_batches(provider, jobs, profile, options).await;
    rank(outcomes)
}

/// Dispatches jobs in consecutive `batch_size` chunks. Within a batch all
/// calls run concurrently and settle independently — one job's failure never
/// cancels a sibling. Batch *k+1* starts only after batch *k* has settled and
/// the inter-batch pause has elapsed.
pub async fn run_batches(
    provider: Option<&dyn ProviderClient>,
    jobs: &[JobPosting],
    profile: &ProfileData,
    options: &BulkOptions,
) -> Vec<BatchOutcome> {
    if jobs.is_empty() {
        return Vec::new();
    }

    let provider = match provider {
        Some(p) => p,
        None => {
            return jobs
                .iter()
                .map(|job| {
                    error!(job = %job.label(), "skipping job: unsupported AI provider");
                    BatchOutcome {
                        job: job.clone(),
                        outcome: Outcome::Skipped,
                    }
                })
                .collect();
        }
    };

    let batch_size = options.batch_size.max(1);
    let batch_count = jobs.len().div_ceil(batch_size);
    let mut outcomes = Vec::with_capacity(jobs.len());

    for (index, batch) in jobs.chunks(batch_size).enumerate() {
        info!("processing batch {}/{batch_count}", index + 1);

        let calls = batch.iter().map(|job| provider.analyze(job, profile));
        let results = join_all(calls).await;

        for (job, result) in batch.iter().zip(results) {
            let outcome = match result {
                Ok(analysis) => Outcome::Analyzed(analysis),
                Err(e) => Outcome::Failed(e),
            };
            outcomes.push(BatchOutcome {
                job: job.clone(),
                outcome,
            });
        }

        if index + 1 < batch_count {
            info!(
                "rate limit pause: waiting {:?} before next batch",
                options.batch_pause
            );
            tokio::time::sleep(options.batch_pause).await;
        }
    }

    outcomes
}

/// Logs failures, attaches each surviving job to its analysis, and sorts by
/// suitability score descending. Unscored analyses are excluded — unscored is
/// not zero. The sort is stable, so equal scores keep dispatch order.
pub fn rank(outcomes: Vec<BatchOutcome>) -> Vec<RankedAnalysis> {
    let total = outcomes.len();
    let mut failed = 0usize;
    let mut skipped = 0usize;
    let mut successes: Vec<RankedAnalysis> = Vec::new();

    for BatchOutcome { job, outcome } in outcomes {
        match outcome {
            Outcome::Analyzed(analysis) => successes.push(RankedAnalysis {
                analysis,
                job_data: job,
            }),
            Outcome::Failed(e) => {
                failed += 1;
                error!(job = %job.label(), error = %e, "job analysis failed");
            }
            Outcome::Skipped => skipped += 1,
        }
    }

    let analyzed = successes.len();
    let unscored = successes
        .iter()
        .filter(|r| r.analysis.suitability_score.is_none())
        .count();
    if unscored > 0 {
        warn!("{unscored} analyses carried no suitability score and were left unranked");
    }

    successes.retain(|r| r.analysis.suitability_score.is_some());
    successes.sort_by_key(|r| Reverse(r.analysis.suitability_score));

    info!(
        "bulk analysis complete: {analyzed} analyzed ({} ranked), {failed} failed, {skipped} skipped, {total} total",
        successes.len()
    );

    successes
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Per-job scripted behavior, keyed by job title.
    #[derive(Debug, Clone, Copy)]
    enum Script {
        Score(u8),
        Unscored,
        Fail,
    }

    /// Scripted provider: records call counts and the peak number of
    /// concurrently in-flight calls.
    struct MockProvider {
        scripts: HashMap<String, Script>,
        call_delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockProvider {
        fn new(scripts: Vec<(&str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(title, s)| (title.to_string(), s))
                    .collect(),
                call_delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.call_delay = delay;
            self
        }

        fn result(&self, score: u8) -> AnalysisResult {
            AnalysisResult {
                suitability_score: Some(score),
                analysis_summary: "mock analysis".to_string(),
                strengths: vec![],
                weaknesses: vec![],
                proposal_suggestions: vec![],
            }
        }
    }

    #[async_trait]
    impl ProviderClient for MockProvider {
        async fn analyze(
            &self,
            job: &JobPosting,
            _profile: &ProfileData,
        ) -> Result<AnalysisResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.call_delay.is_zero() {
                tokio::time::sleep(self.call_delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.scripts.get(job.label()).copied() {
                Some(Script::Fail) => Err(ProviderError::Communication(
                    "mock transport failure".to_string(),
                )),
                Some(Script::Unscored) => Ok(AnalysisResult {
                    suitability_score: None,
                    ..self.result(0)
                }),
                Some(Script::Score(score)) => Ok(self.result(score)),
                None => Ok(self.result(50)),
            }
        }

        async fn generate_proposal(
            &self,
            _job: &JobPosting,
            _profile: &ProfileData,
            _analysis: &AnalysisResult,
        ) -> Result<String, ProviderError> {
            Ok("mock proposal".to_string())
        }
    }

    fn jobs(titles: &[&str]) -> Vec<JobPosting> {
        titles
            .iter()
            .map(|t| JobPosting {
                title: Some(t.to_string()),
                ..Default::default()
            })
            .collect()
    }

    fn numbered_jobs(count: usize) -> Vec<JobPosting> {
        (0..count)
            .map(|i| JobPosting {
                title: Some(format!("job-{i}")),
                ..Default::default()
            })
            .collect()
    }

    fn options(batch_size: usize, pause_secs: u64) -> BulkOptions {
        BulkOptions {
            batch_size,
            batch_pause: Duration::from_secs(pause_secs),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_returns_immediately_with_no_pauses() {
        let provider = MockProvider::new(vec![]);
        let start = Instant::now();
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &[],
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        assert!(ranked.is_empty());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_25_jobs_make_3_batches_and_2_pauses() {
        let provider = MockProvider::new(vec![]);
        let start = Instant::now();
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &numbered_jobs(25),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        // Two inter-batch pauses, none after the final batch.
        assert_eq!(start.elapsed(), Duration::from_secs(120));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 25);
        assert_eq!(ranked.len(), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_batch_has_no_pause() {
        let provider = MockProvider::new(vec![]);
        let start = Instant::now();
        analyze_all(
            Some(&provider as &dyn ProviderClient),
            &numbered_jobs(10),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_members_run_concurrently() {
        // 10 jobs each taking 1s: a serial loop would need 10s, one
        // concurrent batch needs 1s.
        let provider = MockProvider::new(vec![]).with_delay(Duration::from_secs(1));
        let start = Instant::now();
        analyze_all(
            Some(&provider as &dyn ProviderClient),
            &numbered_jobs(10),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_never_exceeds_batch_size() {
        let provider = MockProvider::new(vec![]).with_delay(Duration::from_secs(1));
        analyze_all(
            Some(&provider as &dyn ProviderClient),
            &numbered_jobs(7),
            &ProfileData::default(),
            &options(3, 5),
        )
        .await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 7);
        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_does_not_affect_batch_siblings() {
        let provider = MockProvider::new(vec![
            ("a", Script::Score(80)),
            ("b", Script::Fail),
            ("c", Script::Score(60)),
        ]);
        let outcomes = run_batches(
            Some(&provider as &dyn ProviderClient),
            &jobs(&["a", "b", "c"]),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].outcome, Outcome::Analyzed(_)));
        assert!(matches!(outcomes[1].outcome, Outcome::Failed(_)));
        assert!(matches!(outcomes[2].outcome, Outcome::Analyzed(_)));

        let ranked = rank(outcomes);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].job_data.label(), "a");
        assert_eq!(ranked[1].job_data.label(), "c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fully_failing_batch_does_not_stop_later_batches() {
        let provider = MockProvider::new(vec![
            ("a", Script::Fail),
            ("b", Script::Fail),
            ("c", Script::Score(70)),
        ]);
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &jobs(&["a", "b", "c"]),
            &ProfileData::default(),
            &options(2, 60),
        )
        .await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job_data.label(), "c");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ranking_is_descending_and_stable_on_ties() {
        let provider = MockProvider::new(vec![
            ("a", Script::Score(90)),
            ("b", Script::Score(90)),
            ("c", Script::Score(40)),
        ]);
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &jobs(&["a", "b", "c"]),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        let order: Vec<&str> = ranked.iter().map(|r| r.job_data.label()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unscored_results_are_excluded_not_zero() {
        let provider = MockProvider::new(vec![
            ("a", Script::Unscored),
            ("b", Script::Score(0)),
        ]);
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &jobs(&["a", "b"]),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        // A true zero score still ranks; a missing score does not.
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].job_data.label(), "b");
        assert_eq!(ranked[0].analysis.suitability_score, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_provider_skips_every_job_without_dispatch() {
        let start = Instant::now();
        let outcomes = run_batches(
            None,
            &jobs(&["a", "b", "c"]),
            &ProfileData::default(),
            &options(10, 60),
        )
        .await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.outcome, Outcome::Skipped)));
        assert!(rank(outcomes).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_input_job_is_accounted_for() {
        let provider = MockProvider::new(vec![
            ("job-1", Script::Fail),
            ("job-4", Script::Fail),
            ("job-6", Script::Unscored),
        ]);
        let input = numbered_jobs(8);
        let outcomes = run_batches(
            Some(&provider as &dyn ProviderClient),
            &input,
            &ProfileData::default(),
            &options(3, 10),
        )
        .await;

        assert_eq!(outcomes.len(), input.len());
        let analyzed = outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Analyzed(_)))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Failed(_)))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Skipped))
            .count();
        assert_eq!(analyzed + failed + skipped, input.len());
        assert_eq!(failed, 2);
        assert_eq!(skipped, 0);

        // Outcomes keep input order.
        for (outcome, job) in outcomes.iter().zip(&input) {
            assert_eq!(outcome.job.label(), job.label());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_batch_size_is_clamped_to_one() {
        let provider = MockProvider::new(vec![]);
        let ranked = analyze_all(
            Some(&provider as &dyn ProviderClient),
            &numbered_jobs(2),
            &ProfileData::default(),
            &options(0, 1),
        )
        .await;
        assert_eq!(ranked.len(), 2);
        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 1);
    }

    #[test]
    fn test_default_options_match_rate_limit_contract() {
        let opts = BulkOptions::default();
        assert_eq!(opts.batch_size, 10);
        assert_eq!(opts.batch_pause, Duration::from_secs(60));
    }
}
