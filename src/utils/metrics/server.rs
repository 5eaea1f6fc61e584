//! Metrics endpoint
//!
//! Served by the API server at `GET /metrics` for Prometheus scraping.

use actix_web::{HttpResponse, Responder};
use tracing::error;

use crate::{
	api::ParserData,
	utils::metrics::{gather_metrics, update_parser_metrics},
};

/// Refreshes the state gauges from the parser and encodes the registry
pub async fn metrics_handler(parser: ParserData) -> impl Responder {
	update_parser_metrics(parser.subscription_count(), parser.get_current_block());

	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}
