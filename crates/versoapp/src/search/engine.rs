use super::matcher::Matcher;
use super::operation::{OperationState, OperationStatus, ScanLocks, SearchHandle, SearchOutcome};
use super::{SearchMode, SearchQuery};
use crate::content::ContentAccessor;
use crate::error::{Result, VersoError};
use crate::model::{Module, VerseRecord};
use crate::store::ModuleStore;
use crate::versification::Versification;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// Receives whole percentages while a scan runs.
pub type ProgressCallback = Box<dyn FnMut(u8) + Send + 'static>;

/// Starts searches over a shared store, one at a time.
pub struct SearchEngine<S: ModuleStore + ?Sized + 'static> {
    store: Arc<S>,
    locks: Arc<ScanLocks>,
    current: Mutex<Option<Arc<OperationState>>>,
    progress_step: u8,
}

impl<S: ModuleStore + ?Sized + 'static> SearchEngine<S> {
    pub fn new(store: Arc<S>, locks: Arc<ScanLocks>) -> Self {
        Self {
            store,
            locks,
            current: Mutex::new(None),
            progress_step: 1,
        }
    }

    /// Minimum distance in percentage points between two progress reports.
    pub fn with_progress_step(mut self, step: u8) -> Self {
        self.progress_step = step.max(1);
        self
    }

    pub fn locks(&self) -> &Arc<ScanLocks> {
        &self.locks
    }

    /// Status of the most recent search, or `Idle` if none was started.
    pub fn status(&self) -> OperationStatus {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(OperationStatus::Idle, |op| op.status())
    }

    /// Requests cancellation of the running search, if any.
    pub fn cancel(&self) {
        if let Some(op) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            op.request_cancel();
        }
    }

    pub fn start(
        &self,
        module: &str,
        query: SearchQuery,
        progress: Option<ProgressCallback>,
    ) -> Result<SearchHandle> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current
            .as_ref()
            .is_some_and(|op| !op.status().is_terminal())
        {
            return Err(VersoError::OperationInProgress);
        }

        let meta = self.store.metadata(module)?;
        if !meta.module_type.is_versified() {
            return Err(VersoError::UnsupportedModuleType {
                module: module.to_string(),
                kind: meta.module_type.to_string(),
            });
        }
        if !self.store.is_readable(module) {
            return Err(VersoError::ModuleNotReadable(module.to_string()));
        }
        if query.mode == SearchMode::StrongsNumber && !meta.flags.has_strongs {
            return Err(VersoError::StrongsUnavailable(module.to_string()));
        }

        let versification = Versification::load(&*self.store, module)?;
        let span = query.scope.span(&versification);
        let state = Arc::new(OperationState::running());

        tracing::info!(
            module,
            term = %query.term,
            mode = %query.mode,
            scope = %query.scope,
            verses = span.len(),
            "search started"
        );

        let job = ScanJob {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
            state: Arc::clone(&state),
            module: meta,
            versification,
            span,
            matcher: Matcher::new(&query),
            extended: query.extended_boundaries,
            progress: ProgressReporter::new(progress, self.progress_step),
        };
        let worker = thread::Builder::new()
            .name(format!("verso-search-{}", module))
            .spawn(move || job.run())
            .map_err(VersoError::Io)?;

        *current = Some(Arc::clone(&state));
        Ok(SearchHandle::new(state, worker))
    }
}

/// Forwards progress to the caller's callback, at most once per `step` points.
struct ProgressReporter {
    callback: Option<ProgressCallback>,
    step: u8,
    last: Option<u8>,
}

impl ProgressReporter {
    fn new(callback: Option<ProgressCallback>, step: u8) -> Self {
        Self {
            callback,
            step: step.max(1),
            last: None,
        }
    }

    fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        let due = match self.last {
            None => true,
            Some(last) => percent >= last.saturating_add(self.step),
        };
        if !due {
            return;
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(percent);
        }
        self.last = Some(percent);
    }

    fn finish(&mut self) {
        if self.last != Some(100) {
            if let Some(callback) = self.callback.as_mut() {
                callback(100);
            }
            self.last = Some(100);
        }
    }
}

/// Everything the worker thread owns for one scan.
struct ScanJob<S: ModuleStore + ?Sized + 'static> {
    store: Arc<S>,
    locks: Arc<ScanLocks>,
    state: Arc<OperationState>,
    module: Module,
    versification: Versification,
    span: Range<usize>,
    matcher: Matcher,
    extended: bool,
    progress: ProgressReporter,
}

impl<S: ModuleStore + ?Sized + 'static> ScanJob<S> {
    fn run(mut self) -> SearchOutcome {
        let lock = self.locks.lock_for(&self.module.code);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let outcome = match self.scan() {
            Ok(Some(records)) => {
                self.progress.finish();
                tracing::info!(module = %self.module.code, hits = records.len(), "search completed");
                SearchOutcome::Completed(records)
            }
            Ok(None) => {
                tracing::info!(module = %self.module.code, "search cancelled");
                SearchOutcome::Cancelled
            }
            Err(e) => {
                tracing::error!(module = %self.module.code, error = %e, "search failed");
                SearchOutcome::Failed(e)
            }
        };
        self.state.finish(outcome.status());
        outcome
    }

    /// `None` when cancelled.
    fn scan(&mut self) -> Result<Option<Vec<VerseRecord>>> {
        let accessor = ContentAccessor::from_parts(
            &*self.store,
            self.module.clone(),
            self.versification.clone(),
        );
        let total = self.span.len();
        let mut hits = BTreeSet::new();

        for (done, absolute) in self.span.clone().enumerate() {
            if self.state.is_cancel_requested() {
                return Ok(None);
            }
            let matched = if self.matcher.needs_annotations() {
                self.matcher
                    .matches_annotations(&accessor.strongs_at(absolute)?)
            } else {
                self.matcher.matches_text(&accessor.raw_text_at(absolute)?)
            };
            if matched {
                hits.insert(absolute);
                if self.extended {
                    let (book, chapter, _) = self.versification.from_absolute(absolute)?;
                    let chapter_span = self.versification.chapter_span(book, chapter)?;
                    if absolute > chapter_span.start {
                        hits.insert(absolute - 1);
                    }
                    if absolute + 1 < chapter_span.end {
                        hits.insert(absolute + 1);
                    }
                }
            }
            // 100 is held back until the records are built.
            let percent = ((done + 1) * 100 / total).min(99) as u8;
            self.progress.report(percent);
        }

        let mut records = Vec::with_capacity(hits.len());
        for absolute in hits {
            if self.state.is_cancel_requested() {
                return Ok(None);
            }
            records.push(accessor.verse_at(absolute)?);
        }
        if self.state.is_cancel_requested() {
            return Ok(None);
        }
        Ok(Some(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchScope;
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::{b, sample_store};
    use std::sync::mpsc;

    fn engine() -> SearchEngine<InMemoryStore> {
        SearchEngine::new(Arc::new(sample_store()), Arc::new(ScanLocks::new()))
    }

    fn absolutes(outcome: SearchOutcome) -> Vec<usize> {
        match outcome {
            SearchOutcome::Completed(records) => records.iter().map(|r| r.absolute).collect(),
            other => panic!("expected completed search, got {:?}", other),
        }
    }

    /// A callback that hands each report to the test and then waits for a go signal.
    fn gated_progress() -> (ProgressCallback, mpsc::Receiver<u8>, mpsc::Sender<()>) {
        let (report_tx, report_rx) = mpsc::channel();
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let callback: ProgressCallback = Box::new(move |percent| {
            let _ = report_tx.send(percent);
            let _ = go_rx.recv();
        });
        (callback, report_rx, go_tx)
    }

    #[test]
    fn test_phrase_by_scope() {
        let engine = engine();
        let query = SearchQuery::phrase("the beginning");
        let all = engine.start("KJV", query.clone(), None).unwrap().wait();
        assert_eq!(absolutes(all), vec![0, 8, 9]);

        let ot = engine
            .start("KJV", query.clone().with_scope(SearchScope::OldTestament), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(ot), vec![0]);

        let nt = engine
            .start("KJV", query.with_scope(SearchScope::NewTestament), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(nt), vec![8, 9]);
    }

    #[test]
    fn test_extended_boundaries_stay_in_chapter() {
        let engine = engine();
        let outcome = engine
            .start("KJV", SearchQuery::phrase("seventh day").extended(true), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(outcome), vec![3, 4, 5]);

        let outcome = engine
            .start("KJV", SearchQuery::phrase("there was light").extended(true), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(outcome), vec![1, 2]);
    }

    #[test]
    fn test_strongs_search() {
        let engine = engine();
        let outcome = engine
            .start("KJV", SearchQuery::strongs("G2316"), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(outcome), vec![8, 9, 10, 11]);
    }

    #[test]
    fn test_pre_scan_errors() {
        let engine = engine();
        assert!(matches!(
            engine.start("NOPE", SearchQuery::phrase("x"), None),
            Err(VersoError::ModuleNotFound(_))
        ));
        assert!(matches!(
            engine.start("LOCKED", SearchQuery::phrase("x"), None),
            Err(VersoError::ModuleNotReadable(_))
        ));
        assert!(matches!(
            engine.start("StrongsGreek", SearchQuery::phrase("x"), None),
            Err(VersoError::UnsupportedModuleType { .. })
        ));
        assert!(matches!(
            engine.start("PLAIN", SearchQuery::strongs("H430"), None),
            Err(VersoError::StrongsUnavailable(_))
        ));
        assert_eq!(engine.status(), OperationStatus::Idle);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let engine = engine();
        let outcome = engine
            .start(
                "KJV",
                SearchQuery::phrase("God"),
                Some(Box::new(move |p| sink.lock().unwrap().push(p))),
            )
            .unwrap()
            .wait();
        assert!(matches!(outcome, SearchOutcome::Completed(_)));
        let reports = reports.lock().unwrap();
        assert!(reports.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn test_progress_step_spaces_reports() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let engine = engine().with_progress_step(40);
        engine
            .start(
                "KJV",
                SearchQuery::phrase("God"),
                Some(Box::new(move |p| sink.lock().unwrap().push(p))),
            )
            .unwrap()
            .wait();
        let reports = reports.lock().unwrap();
        assert!(reports.windows(2).all(|w| w[1] >= w[0] + 40 || w[1] == 100));
        assert!(reports.len() <= 4);
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn test_cancel_discards_results() {
        let engine = engine();
        let (callback, reports, go) = gated_progress();
        let handle = engine
            .start("KJV", SearchQuery::phrase("God"), Some(callback))
            .unwrap();
        reports.recv().unwrap();
        handle.cancel();
        handle.cancel();
        drop(go);

        let outcome = handle.wait();
        assert!(matches!(outcome, SearchOutcome::Cancelled));
        assert_eq!(engine.status(), OperationStatus::Cancelled);
        assert!(!reports.try_iter().any(|p| p == 100));
    }

    #[test]
    fn test_single_flight_per_engine() {
        let engine = engine();
        let (callback, reports, go) = gated_progress();
        let handle = engine
            .start("KJV", SearchQuery::phrase("God"), Some(callback))
            .unwrap();
        reports.recv().unwrap();
        assert_eq!(engine.status(), OperationStatus::Running);
        assert!(matches!(
            engine.start("PLAIN", SearchQuery::phrase("end"), None),
            Err(VersoError::OperationInProgress)
        ));

        drop(go);
        assert!(matches!(handle.wait(), SearchOutcome::Completed(_)));
        let next = engine
            .start("PLAIN", SearchQuery::phrase("end"), None)
            .unwrap()
            .wait();
        assert_eq!(absolutes(next), vec![1]);
    }

    #[test]
    fn test_store_failure_mid_scan() {
        let mut store = sample_store();
        store.set_simulated_read_failure("KJV", b("Ps"), 1, 1);
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let engine = SearchEngine::new(Arc::new(store), Arc::new(ScanLocks::new()));
        let outcome = engine
            .start(
                "KJV",
                SearchQuery::phrase("God"),
                Some(Box::new(move |p| sink.lock().unwrap().push(p))),
            )
            .unwrap()
            .wait();
        assert!(matches!(outcome, SearchOutcome::Failed(VersoError::Store(_))));
        assert_eq!(engine.status(), OperationStatus::Failed);
        assert!(!reports.lock().unwrap().contains(&100));
    }

    #[test]
    fn test_engines_sharing_locks_both_complete() {
        let store = Arc::new(sample_store());
        let locks = Arc::new(ScanLocks::new());
        let first = SearchEngine::new(Arc::clone(&store), Arc::clone(&locks));
        let second = SearchEngine::new(store, locks);
        let a = first.start("KJV", SearchQuery::multi_word("love god"), None).unwrap();
        let b = second.start("KJV", SearchQuery::multi_word("love god"), None).unwrap();
        assert_eq!(absolutes(a.wait()), vec![10, 11]);
        assert_eq!(absolutes(b.wait()), vec![10, 11]);
    }
}
