//! Route handlers.

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::api::{
	types::{ApiResponse, SubscribeRequest},
	ParserData,
};

/// `GET /v1/blocks/latest`
pub async fn get_current_block(parser: ParserData) -> impl Responder {
	HttpResponse::Ok().json(ApiResponse::success(parser.get_current_block()))
}

/// `POST /v1/subscribe`
///
/// The body is decoded by hand so that a malformed payload gets the same JSON envelope
/// as every other response.
#[instrument(skip_all)]
pub async fn subscribe(parser: ParserData, body: web::Bytes) -> impl Responder {
	let request: SubscribeRequest = match serde_json::from_slice(&body) {
		Ok(request) => request,
		Err(e) => {
			tracing::debug!(error = %e, "Rejected subscribe body");
			return HttpResponse::BadRequest().json(ApiResponse::message("Invalid request body"));
		}
	};

	let address = match request.address.as_deref().map(str::trim) {
		Some(address) if !address.is_empty() => address,
		_ => return HttpResponse::BadRequest().json(ApiResponse::message("Missing address")),
	};

	if !parser.subscribe(address) {
		return HttpResponse::BadRequest().json(ApiResponse::message("Failed to subscribe"));
	}

	HttpResponse::Ok().json(ApiResponse::message("subscription successful"))
}

/// `GET /v1/transactions/{address}`
pub async fn get_transactions(parser: ParserData, path: web::Path<String>) -> impl Responder {
	let transactions = parser.get_transactions(&path.into_inner());
	HttpResponse::Ok().json(ApiResponse::success(transactions))
}
