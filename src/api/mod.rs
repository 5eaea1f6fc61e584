//! HTTP query surface.
//!
//! Thin actix-web layer over [`Parser`]; every JSON response uses the
//! [`types::ApiResponse`] envelope.

mod handlers;
pub mod types;

use actix_web::{
	dev::Server,
	middleware::{Compress, DefaultHeaders, NormalizePath},
	web, App, HttpServer,
};
use std::sync::Arc;
use tracing::info;

use crate::{services::parser::Parser, utils::metrics::server::metrics_handler};

pub use handlers::{get_current_block, get_transactions, subscribe};

/// Shared parser handed to every handler
pub type ParserData = web::Data<Arc<dyn Parser>>;

/// Registers the API routes on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(
		web::scope("/v1")
			.route("/blocks/latest", web::get().to(get_current_block))
			.route("/subscribe", web::post().to(subscribe))
			.route("/transactions/{address}", web::get().to(get_transactions)),
	)
	.route("/metrics", web::get().to(metrics_handler));
}

/// Binds the API server.
///
/// The returned server must be awaited to run; stop it through its handle.
///
/// # Arguments
/// * `bind_address` - `host:port` to listen on
/// * `parser` - Operations exposed by the routes
///
/// # Returns
/// * `std::io::Result<Server>` - Error when the address cannot be bound
pub fn create_api_server(bind_address: &str, parser: Arc<dyn Parser>) -> std::io::Result<Server> {
	info!("Starting API server on {}", bind_address);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::new(parser.clone()))
			.configure(configure)
	})
	.workers(2)
	.bind(bind_address)?
	.shutdown_timeout(5)
	.run())
}
