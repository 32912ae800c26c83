use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error};

use crate::metrics::PaymentMetrics;

/// Label used when a request did not match a registered route.
pub const UNMATCHED_HANDLER: &str = "unmatched";

/// Time the wrapped service and record the elapsed seconds in the duration
/// histogram, labeled with the matched route pattern.
///
/// Use with `actix_web::middleware::from_fn`. The response passes through
/// untouched. The timer also records if the inner service errors or the
/// request future is dropped.
pub async fn track_duration(
    metrics: web::Data<PaymentMetrics>,
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    // The route pattern, not the raw path, so percent-encoded aliases of the
    // same route share one series.
    let handler = req
        .match_pattern()
        .unwrap_or_else(|| UNMATCHED_HANDLER.to_string());
    let timer = metrics.start_timer(&handler);
    let result = next.call(req).await;
    timer.observe_duration();
    result
}
