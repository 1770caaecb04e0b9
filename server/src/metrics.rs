//! Prometheus metrics & middleware helper.

use actix_web::{get, HttpResponse, Responder};
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::ApiResult;

/// HTTP request metrics, served at `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});

/// Registry for domain counters, served at `/metrics/membership`.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Join / leave results by operation and outcome label.
pub static MEMBERSHIP_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "membership_outcomes_total",
            "Join / leave attempts by outcome",
        ),
        &["op", "outcome"],
    )
    .expect("membership counter opts");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("register membership counter");
    counter
});

/// Bump the outcome counter for one join / leave call.
pub fn record_membership<T>(op: &str, res: &ApiResult<T>) {
    MEMBERSHIP_OUTCOMES
        .with_label_values(&[op, outcome_label(res)])
        .inc();
}

fn outcome_label<T>(res: &ApiResult<T>) -> &'static str {
    use crate::error::ApiError::*;
    match res {
        Ok(_) => "ok",
        Err(Full) => "full",
        Err(Conflict(_)) => "duplicate",
        Err(NotFound(_)) => "not_found",
        Err(Validation(_)) => "invalid",
        Err(_) => "error",
    }
}

/// GET /metrics/membership
#[get("/metrics/membership")]
pub async fn membership_metrics() -> impl Responder {
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buf) {
        log::error!("encoding membership metrics failed: {e}");
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn outcomes_are_labelled_by_error_kind() {
        assert_eq!(outcome_label::<()>(&Ok(())), "ok");
        assert_eq!(outcome_label::<()>(&Err(ApiError::Full)), "full");
        assert_eq!(
            outcome_label::<()>(&Err(ApiError::conflict("dup"))),
            "duplicate"
        );
        assert_eq!(
            outcome_label::<()>(&Err(ApiError::internal("boom"))),
            "error"
        );
    }

    #[test]
    fn recording_bumps_the_counter() {
        let before = MEMBERSHIP_OUTCOMES
            .with_label_values(&["leave", "not_found"])
            .get();
        record_membership::<()>("leave", &Err(ApiError::not_found("x")));
        let after = MEMBERSHIP_OUTCOMES
            .with_label_values(&["leave", "not_found"])
            .get();
        assert!(after > before);
    }
}
