use async_trait::async_trait;
use parking_lot::Mutex;
use realitydefender::{
    AttemptPolicy, CancelSignal, CancellationToken, DetectionResult, Error, ErrorCode,
    EventRegistry, MediaModel, MediaResponse, PollEngine, PollEvent, ResultFetcher,
    ResultFormatter, ResultsMetadata, ResultsSummary, WatchPolicy, ERROR_EVENT, RESULT_EVENT,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

/// Fetcher whose response depends on the zero-based call number
struct ScriptedFetcher<F> {
    respond: F,
    calls: AtomicUsize,
    delay: Duration,
}

impl<F> ScriptedFetcher<F>
where
    F: Fn(usize) -> realitydefender::Result<MediaResponse> + Send + Sync,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> ResultFetcher for ScriptedFetcher<F>
where
    F: Fn(usize) -> realitydefender::Result<MediaResponse> + Send + Sync,
{
    async fn fetch_status(&self, _request_id: &str) -> realitydefender::Result<MediaResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.respond)(call)
    }
}

fn media(status: &str, score: Option<f64>, models: &[(&str, &str)]) -> MediaResponse {
    MediaResponse {
        request_id: "req-1".to_string(),
        results_summary: Some(ResultsSummary {
            status: status.to_string(),
            metadata: Some(ResultsMetadata { final_score: score }),
        }),
        models: models
            .iter()
            .map(|(name, status)| MediaModel {
                name: name.to_string(),
                status: status.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn not_found() -> realitydefender::Result<MediaResponse> {
    Err(Error::NotFound("Resource not found".to_string()))
}

fn attempts(max_attempts: u32, interval_ms: u64) -> AttemptPolicy {
    AttemptPolicy::from_options(Some(max_attempts), Some(interval_ms))
}

#[derive(Default, Clone)]
struct Recorder {
    results: Arc<Mutex<Vec<DetectionResult>>>,
    errors: Arc<Mutex<Vec<Option<ErrorCode>>>>,
}

impl Recorder {
    fn attach(registry: &EventRegistry) -> Self {
        let recorder = Recorder::default();

        let results = recorder.results.clone();
        registry.on(RESULT_EVENT, move |event| {
            if let PollEvent::Result(result) = event {
                results.lock().push((*result).clone());
            }
        });
        let errors = recorder.errors.clone();
        registry.on(ERROR_EVENT, move |event| {
            if let PollEvent::Error(err) = event {
                errors.lock().push(err.code());
            }
        });

        recorder
    }

    fn result_count(&self) -> usize {
        self.results.lock().len()
    }

    fn error_codes(&self) -> Vec<Option<ErrorCode>> {
        self.errors.lock().clone()
    }
}

fn cancel_after(token: &CancellationToken, delay: Duration) {
    let token = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        token.cancel();
    });
}

// Bounded-attempts fetch

#[tokio::test]
async fn test_final_result_returned_after_one_fetch() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", Some(12.0), &[])));
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let result = engine
        .fetch_until_final("req-1", attempts(5, 1))
        .await
        .unwrap();

    assert_eq!(result.status, "AUTHENTIC");
    assert_eq!(result.score, Some(0.12));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_exhaustion_returns_pending_result() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("ANALYZING", None, &[])));
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let result = engine
        .fetch_until_final("req-1", attempts(3, 1))
        .await
        .unwrap();

    assert_eq!(result.status, "ANALYZING");
    assert_eq!(result.score, None);
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_pending_models_keep_polling() {
    let fetcher = ScriptedFetcher::new(|call| {
        if call < 2 {
            Ok(media(
                "AUTHENTIC",
                None,
                &[("faces", "ANALYZING"), ("audio", "NOT_APPLICABLE")],
            ))
        } else {
            Ok(media(
                "AUTHENTIC",
                Some(0.2),
                &[("faces", "AUTHENTIC"), ("audio", "NOT_APPLICABLE")],
            ))
        }
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let result = engine
        .fetch_until_final("req-1", attempts(10, 1))
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 3);
    assert_eq!(result.models[0].status, "AUTHENTIC");
    assert_eq!(result.score, Some(0.2));
}

#[tokio::test]
async fn test_all_not_applicable_models_are_final() {
    let fetcher = ScriptedFetcher::new(|_| {
        Ok(media(
            "AUTHENTIC",
            None,
            &[("faces", "NOT_APPLICABLE"), ("audio", "NOT_APPLICABLE")],
        ))
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    engine
        .fetch_until_final("req-1", attempts(10, 1))
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_not_found_exhaustion_is_timeout() {
    let fetcher = ScriptedFetcher::new(|_| not_found());
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = assert_err!(engine.fetch_until_final("req-1", attempts(2, 1)).await);

    assert_eq!(err.code(), Some(ErrorCode::Timeout));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_not_found_is_retried_until_created() {
    let fetcher = ScriptedFetcher::new(|call| match call {
        0 | 1 => not_found(),
        _ => Ok(media("FAKE", Some(97.0), &[("m1", "FAKE")])),
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let result = engine
        .fetch_until_final("req-1", attempts(5, 1))
        .await
        .unwrap();

    assert_eq!(result.status, "MANIPULATED");
    assert_eq!(result.models[0].status, "MANIPULATED");
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_not_found_after_pending_is_timeout() {
    let fetcher = ScriptedFetcher::new(|call| match call {
        0 => Ok(media("ANALYZING", None, &[])),
        _ => not_found(),
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = assert_err!(engine.fetch_until_final("req-1", attempts(3, 1)).await);

    assert_eq!(err.code(), Some(ErrorCode::Timeout));
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_other_errors_are_not_retried() {
    let fetcher =
        ScriptedFetcher::new(|_| Err(Error::ServerError("Server error".to_string())));
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = engine
        .fetch_until_final("req-1", attempts(5, 1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::ServerError));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_deserialization_failure_is_terminal() {
    let fetcher = ScriptedFetcher::new(|_| {
        serde_json::from_str::<MediaResponse>("{broken").map_err(Error::from)
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = engine
        .fetch_until_final("req-1", attempts(5, 1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::UnknownError));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_cancellation_interrupts_wait() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("ANALYZING", None, &[])));
    let formatter = ResultFormatter::default();
    let token = CancellationToken::new();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(Some(token.clone()), None));

    cancel_after(&token, Duration::from_millis(20));
    let started = Instant::now();
    let err = engine
        .fetch_until_final("req-1", attempts(5, 30_000))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.code(), None);
    assert_eq!(fetcher.calls(), 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancelled_before_first_fetch() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", None, &[])));
    let formatter = ResultFormatter::default();
    let token = CancellationToken::new();
    token.cancel();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(Some(token), None));

    let err = engine
        .fetch_until_final("req-1", attempts(5, 1))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_deadline_behaves_like_cancellation() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("ANALYZING", None, &[])));
    let formatter = ResultFormatter::default();
    let deadline = Instant::now() + Duration::from_millis(20);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(None, Some(deadline)));

    let err = engine
        .fetch_until_final("req-1", attempts(5, 30_000))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(fetcher.calls(), 1);
}

// Event-driven polling

#[tokio::test]
async fn test_watch_timeout_emits_single_error() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("ANALYZING", None, &[])));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = engine
        .watch(
            "req-1",
            WatchPolicy::from_options(Some(10), Some(50)),
            &registry,
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::Timeout));
    assert_eq!(recorder.error_codes(), vec![Some(ErrorCode::Timeout)]);
    assert_eq!(recorder.result_count(), 0);
    assert_eq!(fetcher.calls(), 5);
}

#[tokio::test]
async fn test_watch_delivers_single_result() {
    let fetcher = ScriptedFetcher::new(|call| match call {
        0 => Ok(media("ANALYZING", None, &[])),
        _ => Ok(media("FAKE", Some(88.0), &[("m1", "FAKE")])),
    });
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    engine
        .watch(
            "req-1",
            WatchPolicy::from_options(Some(5), Some(1000)),
            &registry,
        )
        .await
        .unwrap();

    let results = recorder.results.lock().clone();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, "MANIPULATED");
    assert_eq!(results[0].score, Some(0.88));
    assert!(recorder.error_codes().is_empty());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_watch_zero_timeout_is_already_expired() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", None, &[])));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = engine
        .watch("req-1", WatchPolicy::from_options(None, Some(0)), &registry)
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some(ErrorCode::Timeout));
    assert_eq!(recorder.error_codes(), vec![Some(ErrorCode::Timeout)]);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_watch_not_found_is_fatal() {
    let fetcher = ScriptedFetcher::new(|_| not_found());
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let err = engine
        .watch("req-1", WatchPolicy::from_options(Some(5), Some(1000)), &registry)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(recorder.error_codes(), vec![Some(ErrorCode::NotFound)]);
    assert_eq!(recorder.result_count(), 0);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_watch_only_overall_status_keeps_polling() {
    let fetcher =
        ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", None, &[("faces", "ANALYZING")])));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    engine
        .watch("req-1", WatchPolicy::from_options(Some(5), Some(1000)), &registry)
        .await
        .unwrap();

    assert_eq!(recorder.result_count(), 1);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_watch_cancellation_during_fetch_reports_nothing() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", Some(0.3), &[])))
        .with_delay(Duration::from_millis(500));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let token = CancellationToken::new();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(Some(token.clone()), None));

    cancel_after(&token, Duration::from_millis(10));
    let err = engine
        .watch("req-1", WatchPolicy::from_options(Some(5), Some(1000)), &registry)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(recorder.result_count(), 0);
    assert!(recorder.error_codes().is_empty());
}

#[tokio::test]
async fn test_watch_cancellation_during_wait_is_silent() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("ANALYZING", None, &[])));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let token = CancellationToken::new();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(Some(token.clone()), None));

    cancel_after(&token, Duration::from_millis(20));
    let started = Instant::now();
    let err = engine
        .watch(
            "req-1",
            WatchPolicy::from_options(Some(30_000), Some(120_000)),
            &registry,
        )
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(recorder.result_count(), 0);
    assert!(recorder.error_codes().is_empty());
}

#[tokio::test]
async fn test_concurrent_watches_share_registry() {
    let first = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", Some(0.1), &[])));
    let second = ScriptedFetcher::new(|call| match call {
        0 => Ok(media("ANALYZING", None, &[])),
        _ => Ok(media("FAKE", Some(0.9), &[])),
    });
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);

    let a = PollEngine::new(&first, &formatter, CancelSignal::never());
    let b = PollEngine::new(&second, &formatter, CancelSignal::never());
    let policy = WatchPolicy::from_options(Some(5), Some(1000));

    let (ra, rb) = tokio::join!(
        a.watch("req-a", policy, &registry),
        b.watch("req-b", policy, &registry)
    );

    assert_ok!(ra);
    assert_ok!(rb);
    let mut statuses: Vec<String> = recorder
        .results
        .lock()
        .iter()
        .map(|r| r.status.clone())
        .collect();
    statuses.sort();
    assert_eq!(statuses, ["AUTHENTIC", "MANIPULATED"]);
}

#[tokio::test]
async fn test_watch_cancellation_beats_expired_budget() {
    let fetcher = ScriptedFetcher::new(|_| Ok(media("AUTHENTIC", None, &[])));
    let formatter = ResultFormatter::default();
    let registry = EventRegistry::new();
    let recorder = Recorder::attach(&registry);
    let token = CancellationToken::new();
    token.cancel();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::new(Some(token), None));

    let err = engine
        .watch("req-1", WatchPolicy::from_options(None, Some(0)), &registry)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(recorder.error_codes().is_empty());
    assert_eq!(recorder.result_count(), 0);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_unsummarized_job_keeps_polling() {
    let fetcher = ScriptedFetcher::new(|call| match call {
        0 | 1 => Ok(MediaResponse {
            request_id: "req-1".to_string(),
            overall_status: Some("ANALYZING".to_string()),
            ..Default::default()
        }),
        _ => Ok(media("AUTHENTIC", Some(0.05), &[])),
    });
    let formatter = ResultFormatter::default();
    let engine = PollEngine::new(&fetcher, &formatter, CancelSignal::never());

    let result = assert_ok!(engine.fetch_until_final("req-1", attempts(5, 1)).await);

    assert_eq!(result.status, "AUTHENTIC");
    assert_eq!(fetcher.calls(), 3);
}
