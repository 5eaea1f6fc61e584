//! Logging setup driven by environment variables.
//!
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn` or `error`
//! - `LOG_DATA_DIR`: directory for log files, default `logs/`
//! - `LOG_MAX_SIZE`: size after which a new file is started, either bytes or a
//!   human readable size such as `500MB`; default 1 GiB

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{
		self,
		format::Writer,
		{FmtContext, FormatEvent, FormatFields},
	},
	prelude::*,
	registry::LookupSpan,
};

use crate::utils::parsing::parse_string_to_bytes_size;

const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;
const LOG_FILE_NAME: &str = "parser.log";

lazy_static! {
	static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap();
}

/// Event formatter that removes colour codes before writing to a file.
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

/// Builds `<base>-<date>.<index>.log` from `<base>.log`.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let trimmed = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", trimmed, date_str, index)
}

/// Returns the first rolled path for `date_str` whose file is missing or still below
/// `max_size` bytes.
///
/// # Arguments
/// * `file_path` - Candidate path for today's first file
/// * `base_file_path` - Path the rolled names are derived from
/// * `date_str` - Current UTC date
/// * `max_size` - Size limit in bytes
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut final_path = file_path.to_string();
	let mut index = 2;
	while let Ok(meta) = metadata(&final_path) {
		if meta.len() <= max_size {
			break;
		}
		final_path = compute_rolled_file_path(base_file_path, date_str, index);
		index += 1;
	}
	final_path
}

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

fn parse_level(level: &str) -> tracing::Level {
	match level.trim().to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	}
}

/// Reads `LOG_MAX_SIZE`, accepting plain byte counts or sizes like `100MB`.
fn parse_log_max_size(raw: Option<String>) -> Result<u64, String> {
	match raw {
		None => Ok(DEFAULT_LOG_MAX_SIZE),
		Some(value) => match value.trim().parse::<u64>() {
			Ok(bytes) => Ok(bytes),
			Err(_) => parse_string_to_bytes_size(value.trim())
				.map_err(|e| format!("LOG_MAX_SIZE: {}", e)),
		},
	}
}

/// Installs the global tracing subscriber.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let log_mode = env::var("LOG_MODE")
		.unwrap_or_else(|_| "stdout".to_string())
		.to_lowercase();
	let level = parse_level(&env::var("LOG_LEVEL").unwrap_or_default());

	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level.to_string()));

	if log_mode != "file" {
		subscriber
			.with(
				fmt::layer()
					.event_format(create_log_format(true))
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;
		info!("Logging is successfully configured (mode: stdout)");
		return Ok(());
	}

	let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
	let base_file_path = format!("{}/{}", log_dir.trim_end_matches('/'), LOG_FILE_NAME);
	let date_str = Utc::now().format("%Y-%m-%d").to_string();
	let max_size = parse_log_max_size(env::var("LOG_MAX_SIZE").ok())?;

	let first_path = compute_rolled_file_path(&base_file_path, &date_str, 1);
	if let Some(parent) = Path::new(&first_path).parent() {
		create_dir_all(parent)?;
	}
	let final_path = space_based_rolling(&first_path, &base_file_path, &date_str, max_size);

	let final_path = Path::new(&final_path);
	let file_appender = tracing_appender::rolling::never(
		final_path.parent().unwrap_or(Path::new(".")),
		final_path.file_name().unwrap_or_default(),
	);

	subscriber
		.with(
			fmt::layer()
				.event_format(StripAnsiFormatter {
					inner: create_log_format(false),
				})
				.with_writer(file_appender)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;

	info!(path = %final_path.display(), "Logging is successfully configured (mode: file)");
	Ok(())
}
