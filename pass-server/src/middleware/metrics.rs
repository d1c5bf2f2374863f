use crate::server::{PASS_HTTP_REQUESTS, PASS_STAGE_DURATION};
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse},
};
use futures::Future;
use futures_util::future::FutureExt;
use pass_core::pipeline::{LogObserver, Outcome, Stage, StageObserver};
use std::time::Duration;

pub(crate) fn collect_metrics<
    B: MessageBody,
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
>(
    req: ServiceRequest,
    srv: &S,
) -> impl Future<Output = Result<ServiceResponse<B>, actix_web::Error>> {
    let path = req.match_pattern().unwrap_or_else(|| "-".to_string());

    srv.call(req).map(move |res| {
        let status = match &res {
            Ok(resp) => resp.status(),
            Err(e) => e.as_response_error().status_code(),
        };

        PASS_HTTP_REQUESTS
            .with_label_values(&[path.as_str(), status.as_str()])
            .inc();

        res
    })
}

/// Logs stage boundaries and records their duration.
#[derive(Debug, Default)]
pub(crate) struct MetricsObserver;

impl StageObserver for MetricsObserver {
    fn stage_finished(&self, request_id: &str, stage: Stage, elapsed: Duration, outcome: Outcome) {
        LogObserver.stage_finished(request_id, stage, elapsed, outcome);

        PASS_STAGE_DURATION
            .with_label_values(&[stage.as_str(), outcome.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}
