use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use nef_qod::{QodError, SessionOutcome};

use crate::state::AppState;

#[derive(Debug, Default)]
pub struct Metrics {
    pub requests_total: AtomicU64,
    pub requests_inflight: AtomicU64,
    pub status_2xx: AtomicU64,
    pub status_4xx: AtomicU64,
    pub status_5xx: AtomicU64,
    pub sessions_forwarded_total: AtomicU64,
    pub sessions_forward_skipped_total: AtomicU64,
    pub token_failures_total: AtomicU64,
    pub upstream_timeouts_total: AtomicU64,
    pub upstream_rejections_total: AtomicU64,
}

impl Metrics {
    pub fn record_outcome(&self, outcome: SessionOutcome) {
        let counter = match outcome {
            SessionOutcome::Forwarded => &self.sessions_forwarded_total,
            SessionOutcome::ForwardingDisabled => &self.sessions_forward_skipped_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, error: &QodError) {
        let counter = match error {
            QodError::TokenAcquisitionFailed(_) => &self.token_failures_total,
            QodError::UpstreamTimeout { .. } => &self.upstream_timeouts_total,
            QodError::UpstreamRejected { .. } => &self.upstream_rejections_total,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub async fn metrics_handler(State(st): State<AppState>) -> impl IntoResponse {
    let m = &st.metrics;
    let body = format!(
        "nef_qod_requests_total {}\nnef_qod_requests_inflight {}\nnef_qod_responses_2xx {}\nnef_qod_responses_4xx {}\nnef_qod_responses_5xx {}\nnef_qod_sessions_forwarded_total {}\nnef_qod_sessions_forward_skipped_total {}\nnef_qod_token_failures_total {}\nnef_qod_upstream_timeouts_total {}\nnef_qod_upstream_rejections_total {}\n",
        m.requests_total.load(Ordering::Relaxed),
        m.requests_inflight.load(Ordering::Relaxed),
        m.status_2xx.load(Ordering::Relaxed),
        m.status_4xx.load(Ordering::Relaxed),
        m.status_5xx.load(Ordering::Relaxed),
        m.sessions_forwarded_total.load(Ordering::Relaxed),
        m.sessions_forward_skipped_total.load(Ordering::Relaxed),
        m.token_failures_total.load(Ordering::Relaxed),
        m.upstream_timeouts_total.load(Ordering::Relaxed),
        m.upstream_rejections_total.load(Ordering::Relaxed),
    );
    (axum::http::StatusCode::OK, body)
}

pub async fn track_requests(
    State(st): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, std::convert::Infallible> {
    st.metrics.requests_inflight.fetch_add(1, Ordering::Relaxed);
    let resp = next.run(req).await;
    st.metrics.requests_inflight.fetch_sub(1, Ordering::Relaxed);
    st.metrics.requests_total.fetch_add(1, Ordering::Relaxed);

    let status = resp.status().as_u16();
    if status >= 500 {
        st.metrics.status_5xx.fetch_add(1, Ordering::Relaxed);
    } else if status >= 400 {
        st.metrics.status_4xx.fetch_add(1, Ordering::Relaxed);
    } else if status >= 200 {
        st.metrics.status_2xx.fetch_add(1, Ordering::Relaxed);
    }

    Ok(resp)
}
