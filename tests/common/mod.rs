//! Shared helpers for the integration tests.

use std::sync::{Arc, Mutex};

use cascade::{
    CompileOptions, CompileResult, DebugOptions, Logger, StreamLogger, WarnOptions, compile_string,
};

/// One call received by a recording logger.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Warn(String, WarnOptions),
    Debug(String, DebugOptions),
}

pub type Events = Arc<Mutex<Vec<Event>>>;

/// A logger that defines both slots and records every call in order.
#[allow(dead_code)]
pub fn recording_logger() -> (Logger, Events) {
    let events = Events::default();
    let warn_events = Arc::clone(&events);
    let debug_events = Arc::clone(&events);
    let logger = Logger::new()
        .on_warn(move |message, options| {
            warn_events
                .lock()
                .unwrap()
                .push(Event::Warn(message.to_owned(), options.clone()));
            Ok(())
        })
        .on_debug(move |message, options| {
            debug_events
                .lock()
                .unwrap()
                .push(Event::Debug(message.to_owned(), options.clone()));
            Ok(())
        });
    (logger, events)
}

/// Compile `source` with `options`, sending undefined slots to a buffer.
/// Returns the result and whatever the buffer received.
#[allow(dead_code)]
pub fn compile_capturing(
    source: &str,
    options: CompileOptions<'_>,
) -> (CompileResult<String>, String) {
    let fallback = StreamLogger::new(Vec::new());
    let options = CompileOptions {
        fallback: Some(&fallback),
        ..options
    };
    let result = compile_string(source, &options);
    drop(options);
    let output = String::from_utf8(fallback.into_inner()).unwrap();
    (result, output)
}

#[allow(dead_code)]
pub fn events(events: &Events) -> Vec<Event> {
    events.lock().unwrap().clone()
}
