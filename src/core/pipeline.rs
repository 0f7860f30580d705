//! Record pipeline
//!
//! Offers each record to every configured sink, in order, on the calling thread.
//! Every `filter` and `emit` call runs under the pipeline's [`Dispatcher`], so a
//! failing sink neither reaches the caller nor prevents later sinks from running.

use super::{
    dispatcher::Dispatcher, metrics::LoggerMetrics, record::Record, sink::Sink,
};
use std::sync::Arc;

pub struct Pipeline {
    sinks: Vec<Box<dyn Sink>>,
    dispatcher: Dispatcher,
}

impl Pipeline {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            sinks: Vec::new(),
            dispatcher,
        }
    }

    /// Create a builder for Pipeline
    ///
    /// # Example
    /// ```no_run
    /// use rust_logger_core::prelude::*;
    ///
    /// let pipeline = Pipeline::builder()
    ///     .sink(FileSink::builder("/var/log/app.log").interval(10).build().unwrap())
    ///     .dispatcher(Dispatcher::builder(categories![ErrorCategory::Io]).build())
    ///     .build();
    ///
    /// let record = Record::new(LogLevel::Info, "started", EMPTY_PACK);
    /// pipeline.dispatch(&record, "started\n");
    /// ```
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Appends a sink; it is visited after every sink added before it.
    pub fn add_sink(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    /// Offers `record` to every sink in order.
    ///
    /// A sink whose `filter` fails or returns `false` is skipped for this record
    /// only. Failures are absorbed by the dispatcher.
    pub fn dispatch(&self, record: &Record<'_>, formatted: &str) {
        let metrics = self.dispatcher.metrics();
        metrics.record_dispatched();

        for sink in &self.sinks {
            let accepted = self
                .dispatcher
                .protect(|| sink.filter(record))
                .unwrap_or(false);
            if !accepted {
                metrics.record_rejected();
                continue;
            }

            if self
                .dispatcher
                .protect(|| sink.emit(record, formatted))
                .is_some()
            {
                metrics.record_emitted();
            }
        }
    }

    /// Number of configured sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Sink names in visiting order.
    pub fn sink_names(&self) -> impl Iterator<Item = &str> {
        self.sinks.iter().map(|sink| sink.name())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    /// Shared handle to the metrics, e.g. for a reporting thread.
    pub fn shared_metrics(&self) -> Arc<LoggerMetrics> {
        Arc::clone(self.dispatcher.metrics())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Dispatcher::default())
    }
}

/// Builder for constructing a [`Pipeline`] with a fluent API
pub struct PipelineBuilder {
    sinks: Vec<Box<dyn Sink>>,
    dispatcher: Option<Dispatcher>,
}

impl PipelineBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            dispatcher: None,
        }
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Set the dispatcher guarding sink calls
    ///
    /// Defaults to [`Dispatcher::new`].
    #[must_use = "builder methods return a new value"]
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Build the Pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            sinks: self.sinks,
            dispatcher: self.dispatcher.unwrap_or_default(),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CategoryChain, LoggerError, MemoryDiagnostic, Result, EMPTY_PACK,
    };
    use parking_lot::Mutex;

    struct ScriptedSink {
        name: &'static str,
        accept: bool,
        fail_emit: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Sink for ScriptedSink {
        fn filter(&self, _record: &Record<'_>) -> Result<bool> {
            self.calls.lock().push(format!("{}.filter", self.name));
            Ok(self.accept)
        }

        fn emit(&self, _record: &Record<'_>, _formatted: &str) -> Result<()> {
            self.calls.lock().push(format!("{}.emit", self.name));
            if self.fail_emit {
                return Err(LoggerError::other(format!("{} is broken", self.name)));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn sink(
        name: &'static str,
        accept: bool,
        fail_emit: bool,
        calls: &Arc<Mutex<Vec<String>>>,
    ) -> ScriptedSink {
        ScriptedSink {
            name,
            accept,
            fail_emit,
            calls: Arc::clone(calls),
        }
    }

    #[test]
    fn test_builder_default() {
        let pipeline = PipelineBuilder::default().build();
        assert!(pipeline.is_empty());

        let record = Record::new(2, "nobody listens", EMPTY_PACK);
        pipeline.dispatch(&record, "nobody listens\n");
        assert_eq!(pipeline.metrics().records_dispatched(), 1);
    }

    #[test]
    fn test_visits_sinks_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let diagnostic = Arc::new(MemoryDiagnostic::new());
        let pipeline = Pipeline::builder()
            .sink(sink("first", true, true, &calls))
            .sink(sink("second", false, false, &calls))
            .sink(sink("third", true, false, &calls))
            .dispatcher(
                Dispatcher::builder(CategoryChain::EMPTY)
                    .shared_diagnostic(diagnostic.clone())
                    .strict(false)
                    .build(),
            )
            .build();

        assert_eq!(
            pipeline.sink_names().collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );

        let record = Record::new(2, "hello", EMPTY_PACK);
        pipeline.dispatch(&record, "hello\n");

        assert_eq!(
            *calls.lock(),
            vec![
                "first.filter",
                "first.emit",
                "second.filter",
                "third.filter",
                "third.emit",
            ]
        );
        assert_eq!(
            diagnostic.messages(),
            vec!["logging core error occurred: first is broken"]
        );

        let metrics = pipeline.metrics();
        assert_eq!(metrics.records_dispatched(), 1);
        assert_eq!(metrics.sink_emits(), 1);
        assert_eq!(metrics.sink_rejections(), 1);
        assert_eq!(metrics.failures_unhandled(), 1);
    }

    #[test]
    fn test_add_sink_after_construction() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut pipeline = Pipeline::default();
        pipeline.add_sink(Box::new(sink("late", true, false, &calls)));

        pipeline.dispatch(&Record::new(0, "m", EMPTY_PACK), "m");
        assert_eq!(*calls.lock(), vec!["late.filter", "late.emit"]);
        assert_eq!(pipeline.len(), 1);
    }
}
