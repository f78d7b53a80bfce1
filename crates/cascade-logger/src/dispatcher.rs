//! The single choke point for warnings and debug messages.

use cascade_span::Span;

use crate::error::{Channel, ReportError};
use crate::fallback::FallbackLogger;
use crate::logger::Logger;
use crate::message::{Loggable, derive_message};
use crate::options::{DebugOptions, WarnOptions};
use crate::stack::StackTrace;

/// Routes each diagnostic to exactly one sink.
///
/// If the logger defines the slot for a diagnostic's kind, that callback is
/// invoked once and nothing else sees the message. Otherwise the fallback
/// receives it. Calls are synchronous, in order, and nothing is batched,
/// deduplicated or remembered between calls.
///
/// A dispatcher borrows its logger for one compilation and cannot outlive it.
#[derive(Clone, Copy)]
pub struct Dispatcher<'l> {
    logger: &'l Logger,
    fallback: &'l dyn FallbackLogger,
}

impl<'l> Dispatcher<'l> {
    pub fn new(logger: &'l Logger, fallback: &'l dyn FallbackLogger) -> Self {
        Self { logger, fallback }
    }

    /// Report a warning. The stack is rendered at the moment of the call.
    pub fn warn(
        &self,
        message: &str,
        span: Option<Span>,
        deprecation: bool,
        stack: &dyn StackTrace,
    ) -> Result<(), ReportError> {
        let options = WarnOptions {
            deprecation,
            span,
            stack: Some(stack.render()),
        };
        match self.logger.warn_callback() {
            Some(callback) => {
                callback(message, &options).map_err(|source| ReportError::Callback {
                    channel: Channel::Warn,
                    source,
                })
            }
            None => self
                .fallback
                .warn(message, &options)
                .map_err(|source| ReportError::Fallback {
                    channel: Channel::Warn,
                    source,
                }),
        }
    }

    /// Report a debug message anchored at the `@debug` statement.
    pub fn debug(&self, message: &str, span: Span) -> Result<(), ReportError> {
        let options = DebugOptions { span };
        match self.logger.debug_callback() {
            Some(callback) => {
                callback(message, &options).map_err(|source| ReportError::Callback {
                    channel: Channel::Debug,
                    source,
                })
            }
            None => self
                .fallback
                .debug(message, &options)
                .map_err(|source| ReportError::Fallback {
                    channel: Channel::Debug,
                    source,
                }),
        }
    }

    /// [`Self::warn`] with the message derived from a value.
    pub fn warn_value<V: Loggable + ?Sized>(
        &self,
        value: &V,
        span: Option<Span>,
        deprecation: bool,
        stack: &dyn StackTrace,
    ) -> Result<(), ReportError> {
        self.warn(&derive_message(value), span, deprecation, stack)
    }

    /// [`Self::debug`] with the message derived from a value.
    pub fn debug_value<V: Loggable + ?Sized>(
        &self,
        value: &V,
        span: Span,
    ) -> Result<(), ReportError> {
        self.debug(&derive_message(value), span)
    }
}
