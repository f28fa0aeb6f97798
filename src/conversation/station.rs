//! Conversation station: classification, accumulation, completion.
//!
//! A single task owns the conversation state, so ingestion is serialized
//! in capture order by construction. Deadline firings from the debounce
//! timer arrive through the same event loop, which makes the
//! armed-vs-new-input race a plain generation comparison.

use crate::conversation::classifier::TranscriptClassifier;
use crate::conversation::debouncer::{CompletionDebouncer, IngestOutcome};
use crate::conversation::state::ConversationState;
use crate::intake::dispatcher::{FinalizationDispatcher, FinalizationOutcome};
use crate::output::{self, PipelineEvent};
use crate::streaming::frame::TranscriptSegment;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Station that turns ordered transcripts into a finalization decision.
pub struct ConversationStation {
    classifier: TranscriptClassifier,
    debouncer: CompletionDebouncer,
    dispatcher: FinalizationDispatcher,
    state: ConversationState,
    echo: bool,
}

impl ConversationStation {
    /// Creates a station from its three collaborators.
    pub fn new(
        classifier: TranscriptClassifier,
        debouncer: CompletionDebouncer,
        dispatcher: FinalizationDispatcher,
    ) -> Self {
        Self {
            classifier,
            debouncer,
            dispatcher,
            state: ConversationState::new(),
            echo: false,
        }
    }

    /// Enables live transcript/decision rendering to stderr.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Runs the station.
    ///
    /// Transcripts must arrive in capture order. The finalization outcome
    /// is sent once on `outcome_tx`; the station keeps consuming (and
    /// silently accumulating) transcripts afterwards until the input
    /// channel closes and no deadline is pending.
    pub async fn run(
        mut self,
        mut transcripts: mpsc::Receiver<TranscriptSegment>,
        outcome_tx: mpsc::Sender<FinalizationOutcome>,
    ) {
        let (deadline_tx, mut deadlines) = mpsc::channel::<u64>(4);
        let mut pending: Option<(u64, JoinHandle<()>)> = None;
        let mut transcripts_open = true;

        loop {
            tokio::select! {
                maybe_segment = transcripts.recv(), if transcripts_open => {
                    match maybe_segment {
                        Some(segment) => {
                            self.handle_transcript(segment, &deadline_tx, &mut pending);
                        }
                        None => transcripts_open = false,
                    }
                }
                Some(generation) = deadlines.recv() => {
                    if pending.as_ref().map(|(g, _)| *g == generation).unwrap_or(false) {
                        pending = None;
                    }
                    self.handle_deadline(generation, &outcome_tx).await;
                }
            }

            if !transcripts_open && pending.is_none() {
                break;
            }
        }
    }

    /// Classifies and ingests one transcript, then re-evaluates the
    /// debounce decision.
    fn handle_transcript(
        &mut self,
        segment: TranscriptSegment,
        deadline_tx: &mpsc::Sender<u64>,
        pending: &mut Option<(u64, JoinHandle<()>)>,
    ) {
        let meaningful = self.classifier.is_meaningful(&segment.text);
        self.state.ingest(&segment.text, meaningful);

        if self.echo {
            output::render_event(&PipelineEvent::Transcript {
                sequence: segment.sequence,
                text: segment.text,
                meaningful,
                streak: self.state.non_meaningful_streak(),
            });
        }

        // Any new input supersedes the pending deadline. Aborting an
        // already-finished task is a no-op.
        let was_armed = pending.is_some();
        if let Some((_, handle)) = pending.take() {
            handle.abort();
        }

        match self.debouncer.on_ingest(&self.state) {
            IngestOutcome::Arm { generation } => {
                let delay = self.debouncer.finalize_delay();
                if self.echo {
                    output::render_event(&PipelineEvent::Armed {
                        delay_ms: delay.as_millis() as u64,
                    });
                }
                let tx = deadline_tx.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(generation).await;
                });
                *pending = Some((generation, handle));
            }
            IngestOutcome::Settle => {
                if was_armed && self.echo {
                    output::render_event(&PipelineEvent::Disarmed);
                }
            }
        }
    }

    /// Handles a deadline firing; finalizes when it is still current.
    async fn handle_deadline(
        &mut self,
        generation: u64,
        outcome_tx: &mpsc::Sender<FinalizationOutcome>,
    ) {
        if !self.debouncer.on_deadline(generation) {
            return; // stale: input arrived after this deadline was scheduled
        }

        self.state.mark_finalized();
        let conversation = self.state.snapshot();

        if self.echo {
            output::render_event(&PipelineEvent::Finalizing {
                chars: conversation.chars().count(),
            });
        }

        let outcome = match self.dispatcher.finalize(&conversation).await {
            Ok(record) => FinalizationOutcome::Completed(record),
            Err(e) => FinalizationOutcome::Failed {
                error: e.to_string(),
            },
        };
        let _ = outcome_tx.send(outcome).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::debouncer::DebounceConfig;
    use crate::intake::extractor::MockExtractor;
    use crate::intake::record::{IntakeRecord, Priority};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn make_station(
        extractor: Arc<MockExtractor>,
        finalize_delay: Duration,
    ) -> ConversationStation {
        ConversationStation::new(
            TranscriptClassifier::new(),
            CompletionDebouncer::with_config(DebounceConfig {
                silence_segments: 3,
                finalize_delay,
            }),
            FinalizationDispatcher::new(extractor),
        )
    }

    async fn send_all(tx: &mpsc::Sender<TranscriptSegment>, texts: &[&str]) {
        for (i, text) in texts.iter().enumerate() {
            tx.send(TranscriptSegment::new(i as u64, *text))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_quiet_period_finalizes_with_accumulated_text() {
        let extractor = Arc::new(MockExtractor::new("mock").with_record(IntakeRecord {
            priority: Some(Priority::P1),
            ..Default::default()
        }));
        let station = make_station(extractor.clone(), Duration::from_millis(50));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        send_all(&tx, &["I have no heat and smell gas", "okay", "yeah", "no"]).await;

        let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("finalization within deadline")
            .expect("outcome present");

        match outcome {
            FinalizationOutcome::Completed(record) => {
                assert_eq!(record.priority, Some(Priority::P1));
            }
            other => panic!("expected Completed, got {:?}", other),
        }
        assert_eq!(
            extractor.calls(),
            vec!["I have no heat and smell gas".to_string()]
        );

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_new_input_before_deadline_cancels_and_rearms() {
        let extractor = Arc::new(MockExtractor::new("mock"));
        let station = make_station(extractor.clone(), Duration::from_millis(200));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        // Arm the debouncer
        send_all(&tx, &["the furnace is dead", "ok", "ok", "ok"]).await;
        // Caller continues before the 200ms deadline elapses
        tokio::time::sleep(Duration::from_millis(50)).await;
        send_all(&tx, &["and the pilot light will not stay lit"]).await;

        // No premature finalization from the superseded deadline
        assert!(
            timeout(Duration::from_millis(300), outcome_rx.recv())
                .await
                .is_err(),
            "superseded deadline must not finalize"
        );

        // Quiet again: re-arm and finalize with the full text
        send_all(&tx, &["ok", "ok", "ok"]).await;
        let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("finalization after re-arm")
            .expect("outcome present");
        assert!(matches!(outcome, FinalizationOutcome::Completed(_)));

        assert_eq!(
            extractor.calls(),
            vec!["the furnace is dead and the pilot light will not stay lit".to_string()]
        );

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_never_arms_without_accumulated_content() {
        let extractor = Arc::new(MockExtractor::new("mock"));
        let station = make_station(extractor.clone(), Duration::from_millis(30));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        // Five filler windows, nothing meaningful ever said
        send_all(&tx, &["ok", "ok", "ok", "ok", "ok"]).await;

        assert!(
            timeout(Duration::from_millis(200), outcome_rx.recv())
                .await
                .is_err(),
            "must not finalize an empty conversation"
        );
        assert_eq!(extractor.call_count(), 0);

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_finalization_happens_at_most_once() {
        let extractor = Arc::new(MockExtractor::new("mock"));
        let station = make_station(extractor.clone(), Duration::from_millis(30));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(2);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        send_all(&tx, &["no hot water since yesterday", "ok", "ok", "ok"]).await;
        let first = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("first finalization")
            .expect("outcome present");
        assert!(matches!(first, FinalizationOutcome::Completed(_)));

        // More transcripts after finalization: accumulated silently, never
        // a second decision
        send_all(&tx, &["ok", "ok", "ok", "ok", "also my sink drips", "ok", "ok", "ok"]).await;
        assert!(
            timeout(Duration::from_millis(200), outcome_rx.recv())
                .await
                .is_err(),
            "no second finalization"
        );
        assert_eq!(extractor.call_count(), 1);

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_extraction_failure_reported_once_no_retry() {
        let extractor = Arc::new(MockExtractor::new("mock").with_failure());
        let station = make_station(extractor.clone(), Duration::from_millis(30));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        send_all(&tx, &["basement is flooding fast", "ok", "ok", "ok"]).await;

        let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("failure outcome")
            .expect("outcome present");
        match outcome {
            FinalizationOutcome::Failed { error } => {
                assert!(error.contains("mock extraction failure"), "{}", error);
            }
            other => panic!("expected Failed, got {:?}", other),
        }

        // Still finalized: further quiet periods do not retry
        send_all(&tx, &["ok", "ok", "ok"]).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(extractor.call_count(), 1);

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_transcripts_count_toward_streak() {
        let extractor = Arc::new(MockExtractor::new("mock"));
        let station = make_station(extractor.clone(), Duration::from_millis(30));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        // Empty windows (service heard nothing) behave like filler
        send_all(&tx, &["my thermostat reads 45 degrees", "", "", ""]).await;

        let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("finalization")
            .expect("outcome present");
        assert!(matches!(outcome, FinalizationOutcome::Completed(_)));
        assert_eq!(
            extractor.calls(),
            vec!["my thermostat reads 45 degrees".to_string()]
        );

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_station_exits_when_input_closes_with_pending_deadline() {
        let extractor = Arc::new(MockExtractor::new("mock"));
        let station = make_station(extractor.clone(), Duration::from_millis(30));

        let (tx, rx) = mpsc::channel(16);
        let (outcome_tx, mut outcome_rx) = mpsc::channel(1);
        let task = tokio::spawn(station.run(rx, outcome_tx));

        send_all(&tx, &["dishwasher leaks on every cycle", "ok", "ok", "ok"]).await;
        // Close the input while the deadline is pending: the grace period
        // still elapses and finalization fires.
        drop(tx);

        let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("finalization after input closed")
            .expect("outcome present");
        assert!(matches!(outcome, FinalizationOutcome::Completed(_)));

        timeout(Duration::from_secs(1), task)
            .await
            .expect("station exits")
            .unwrap();
    }
}
