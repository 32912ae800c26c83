use prometheus::proto::Metric;
use prometheus::{
    Encoder, HistogramOpts, HistogramTimer, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder, DEFAULT_BUCKETS,
};

use crate::payment::PaymentStatus;

pub const PAYMENTS_TOTAL: &str = "ecommerce_payments_total";
pub const HTTP_DURATION: &str = "ecommerce_http_duration";

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("metric registration failed: {0}")]
    Registration(#[source] prometheus::Error),

    #[error("metric encoding failed: {0}")]
    Encode(#[source] prometheus::Error),

    #[error("exposition is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Registry plus the two instruments the service reports.
///
/// Built once at startup and shared with every worker through `web::Data`.
/// Each instance owns its own [`Registry`], so nothing here touches the
/// prometheus default registry.
pub struct PaymentMetrics {
    registry: Registry,
    payments_total: IntCounterVec,
    http_duration: HistogramVec,
}

impl PaymentMetrics {
    /// Create and register both instruments.
    ///
    /// Fails if a metric with the same name is already registered, which only
    /// happens through a programming error at startup.
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Register the instruments into an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let payments_total = IntCounterVec::new(
            Opts::new(PAYMENTS_TOTAL, "Total number of payments processed"),
            &["status"],
        )
        .map_err(MetricsError::Registration)?;

        let http_duration = HistogramVec::new(
            HistogramOpts::new(HTTP_DURATION, "HTTP duration in seconds")
                .buckets(DEFAULT_BUCKETS.to_vec()),
            &["handler"],
        )
        .map_err(MetricsError::Registration)?;

        registry
            .register(Box::new(payments_total.clone()))
            .map_err(MetricsError::Registration)?;
        registry
            .register(Box::new(http_duration.clone()))
            .map_err(MetricsError::Registration)?;

        // The status label set is closed; expose both series from the start.
        for status in PaymentStatus::ALL {
            payments_total.with_label_values(&[status.as_label()]);
        }

        Ok(Self {
            registry,
            payments_total,
            http_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_payment(&self, status: PaymentStatus) {
        self.payments_total
            .with_label_values(&[status.as_label()])
            .inc();
    }

    pub fn observe_duration(&self, handler: &str, seconds: f64) {
        self.http_duration
            .with_label_values(&[handler])
            .observe(seconds);
    }

    /// Start a timer that records into the duration histogram when it is
    /// stopped or dropped.
    pub fn start_timer(&self, handler: &str) -> HistogramTimer {
        self.http_duration
            .with_label_values(&[handler])
            .start_timer()
    }

    /// Current count for `status`, read from a gathered snapshot.
    pub fn payments_recorded(&self, status: PaymentStatus) -> u64 {
        self.find_series(PAYMENTS_TOTAL, "status", status.as_label())
            .map(|m| m.get_counter().value() as u64)
            .unwrap_or(0)
    }

    /// Observations recorded for `handler`. Reading never creates a series.
    pub fn duration_samples(&self, handler: &str) -> u64 {
        self.find_series(HTTP_DURATION, "handler", handler)
            .map(|m| m.get_histogram().get_sample_count())
            .unwrap_or(0)
    }

    pub fn duration_sum(&self, handler: &str) -> f64 {
        self.find_series(HTTP_DURATION, "handler", handler)
            .map(|m| m.get_histogram().get_sample_sum())
            .unwrap_or(0.0)
    }

    /// Label values currently present on the duration histogram.
    pub fn duration_handlers(&self) -> Vec<String> {
        self.registry
            .gather()
            .iter()
            .filter(|mf| mf.get_name() == HTTP_DURATION)
            .flat_map(|mf| mf.get_metric().iter())
            .flat_map(|m| m.get_label().iter())
            .filter(|l| l.get_name() == "handler")
            .map(|l| l.get_value().to_string())
            .collect()
    }

    fn find_series(&self, name: &str, label: &str, value: &str) -> Option<Metric> {
        self.registry
            .gather()
            .into_iter()
            .find(|mf| mf.get_name() == name)?
            .get_metric()
            .iter()
            .find(|m| {
                m.get_label()
                    .iter()
                    .any(|l| l.get_name() == label && l.get_value() == value)
            })
            .cloned()
    }

    /// Render every registered metric in the Prometheus text format.
    ///
    /// Gathers a fresh snapshot on each call.
    pub fn exposition(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(MetricsError::Encode)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}
