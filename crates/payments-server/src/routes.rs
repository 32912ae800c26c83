use actix_web::middleware::from_fn;
use actix_web::{get, web, HttpMessage, HttpRequest, HttpResponse};

use crate::error::PaymentError;
use crate::form::FormFields;
use crate::metrics::PaymentMetrics;
use crate::middleware::track_duration;
use crate::payment::PaymentStatus;

pub const PAYMENTS_ACK: &str = "payments requested";

/// Largest form body accepted on `/payments`.
pub const MAX_FORM_BYTES: usize = 10 << 20;

/// Mount `POST /payments` (timed) and `GET /metrics`.
///
/// The timer wraps the POST route only; other methods are answered with 405
/// by the resource and are not timed.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/payments")
            .app_data(web::PayloadConfig::new(MAX_FORM_BYTES))
            .route(web::post().to(payments).wrap(from_fn(track_duration))),
    )
    .service(metrics_endpoint);
}

/// Accept a payment notification and count its outcome.
///
/// The acknowledgement is the same for both outcomes; only a body that cannot
/// be read as form data is rejected, and it is not counted.
pub async fn payments(
    req: HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
    metrics: web::Data<PaymentMetrics>,
) -> Result<HttpResponse, PaymentError> {
    let form = read_form(&req, body)?;
    let status = PaymentStatus::classify(form.get("status"));
    metrics.record_payment(status);

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(PAYMENTS_ACK))
}

/// Validate the query string and decode the body when it is declared as
/// `application/x-www-form-urlencoded`. Other content types yield an empty
/// form, and their body is never inspected.
fn read_form(
    req: &HttpRequest,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<FormFields, PaymentError> {
    let mime = req
        .mime_type()
        .map_err(|e| PaymentError::InvalidContentType(e.to_string()))?;

    FormFields::parse(req.query_string())?;

    match mime {
        Some(mime) if mime.essence_str() == "application/x-www-form-urlencoded" => {
            let body = body.map_err(|e| PaymentError::UnreadableBody(e.to_string()))?;
            Ok(FormFields::from_bytes(&body)?)
        }
        _ => Ok(FormFields::default()),
    }
}

#[get("/metrics")]
pub async fn metrics_endpoint(metrics: web::Data<PaymentMetrics>) -> HttpResponse {
    match metrics.exposition() {
        Ok(text) => HttpResponse::Ok()
            .content_type(metrics.content_type())
            .body(text),
        Err(e) => {
            tracing::error!(error = %e, "failed to render metrics");
            HttpResponse::InternalServerError().finish()
        }
    }
}
