//! Payment notification intake with Prometheus metrics.
//!
//! `POST /payments` accepts a form-encoded notification, classifies its
//! `status` field as success or failure and counts the outcome. Handler
//! latency is recorded by a timing middleware. `GET /metrics` serves the
//! text exposition of both instruments.
//!
//! # Modules
//!
//! - [`config`] — Bind address and port ([`ServerConfig`](config::ServerConfig))
//! - [`metrics`] — Injected Prometheus registry ([`PaymentMetrics`](metrics::PaymentMetrics))
//! - [`middleware`] — Request timing ([`track_duration`](middleware::track_duration))
//! - [`routes`] — HTTP endpoints and route wiring ([`configure`](routes::configure))
//! - [`form`] — Strict form decoding
//! - [`payment`] — Outcome classification

pub mod config;
pub mod error;
pub mod form;
pub mod metrics;
pub mod middleware;
pub mod payment;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::PaymentError;
pub use metrics::{MetricsError, PaymentMetrics};
pub use payment::PaymentStatus;
