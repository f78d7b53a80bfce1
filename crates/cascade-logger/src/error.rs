//! Errors raised while dispatching a diagnostic.

use derive_more::Display;

use crate::logger::CallbackError;

/// Which reporter slot a diagnostic was routed to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Channel {
    #[display("warn")]
    Warn,
    #[display("debug")]
    Debug,
}

/// A diagnostic could not be delivered. There are no retries: the surrounding
/// compilation fails.
#[derive(Debug, Display)]
pub enum ReportError {
    #[display("{channel} callback failed: {source}")]
    Callback {
        channel: Channel,
        source: CallbackError,
    },

    #[display("failed to write {channel} message: {source}")]
    Fallback {
        channel: Channel,
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn channel(&self) -> Channel {
        match self {
            ReportError::Callback { channel, .. } | ReportError::Fallback { channel, .. } => {
                *channel
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Callback { source, .. } => Some(&**source),
            ReportError::Fallback { source, .. } => Some(source),
        }
    }
}
