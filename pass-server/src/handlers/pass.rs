use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, web::Data, web::Json, HttpResponse};

use pass_core::pipeline::PassGenerator;
use pass_core::request::PassRequest;

use crate::util::{request_id, REQUEST_ID_HEADER};

/// Assemble, sign and return a membership pass.
///
/// The pipeline blocks on asset IO and signing, so it runs on the blocking thread pool and
/// never stalls the workers serving other requests.
pub async fn generate_pass(
    generator: Data<PassGenerator>,
    body: Json<PassRequest>,
) -> Result<HttpResponse, crate::Error> {
    let request = body.into_inner();
    let id = request_id();

    let generator = generator.into_inner();
    let job_id = id.clone();
    let archive = web::block(move || generator.generate(&job_id, &request))
        .await
        .map_err(|_e| crate::Error::Unexpected)?
        .map_err(|source| crate::Error::Pipeline {
            request_id: id.clone(),
            source,
        })?;

    log::debug!(
        "request={id}, serial={}, delivered {} bytes",
        archive.serial_number,
        archive.bytes.len()
    );

    Ok(HttpResponse::Ok()
        .content_type(archive.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(archive.filename().to_string())],
        })
        .insert_header((header::CONTENT_LENGTH, archive.bytes.len().to_string()))
        .insert_header((REQUEST_ID_HEADER, id))
        .body(archive.bytes))
}
