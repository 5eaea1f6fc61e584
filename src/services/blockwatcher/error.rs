//! Polling engine error types.

use crate::utils::logging::error::{BoxedSource, ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Errors raised by the polling engine. None of them stop the polling loop.
#[derive(ThisError, Debug)]
pub enum BlockWatcherError {
	/// The head number could not be fetched; the tick is skipped
	#[error("Head unavailable: {0}")]
	HeadUnavailable(ErrorContext),

	/// A single block could not be processed and is skipped for good
	#[error("Processing error: {0}")]
	ProcessingError(ErrorContext),

	/// The polling schedule could not be set up
	#[error("Scheduler error: {0}")]
	SchedulerError(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockWatcherError {
	pub fn head_unavailable(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::HeadUnavailable(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn processing_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ProcessingError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn scheduler_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SchedulerError(ErrorContext::new_with_log(msg, source, metadata))
	}
}

impl TraceableError for BlockWatcherError {
	fn trace_id(&self) -> String {
		match self {
			Self::HeadUnavailable(ctx) | Self::ProcessingError(ctx) | Self::SchedulerError(ctx) => {
				ctx.trace_id.clone()
			}
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
