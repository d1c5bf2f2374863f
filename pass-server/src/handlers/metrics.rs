use crate::Error;
use actix_web::HttpRequest;
use prometheus::{Encoder, TextEncoder};

pub async fn metrics(_req: HttpRequest) -> Result<String, Error> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(Error::Prometheus)?;

    String::from_utf8(buffer).map_err(|_e| Error::Unexpected)
}
