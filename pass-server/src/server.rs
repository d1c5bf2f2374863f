use actix_cors::Cors;
use actix_web::{
    error::JsonPayloadError,
    http::header,
    middleware::Logger,
    web,
    web::{resource, Data},
    App, HttpRequest, HttpServer,
};

use crate::middleware::metrics::{collect_metrics, MetricsObserver};
use crate::opts::*;
use crate::util::*;
use crate::{handlers, PassServerError};

use pass_core::pipeline::PassGenerator;

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

pub(crate) const GENERATE_PASS_PATH: &str = "/generate-pass";

/// Maximum size of a pass request body.
const JSON_LIMIT: usize = 64 * 1024;

lazy_static! {
    pub(crate) static ref PASS_HTTP_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "pass_http_requests",
        "Requests to the pass service by route and response status.",
        &["path", "status"]
    )
    .expect("could not initialize metrics");
    pub(crate) static ref PASS_STAGE_DURATION: HistogramVec = register_histogram_vec!(
        "pass_stage_duration_seconds",
        "Duration of each pass pipeline stage.",
        &["stage", "outcome"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("could not initialize metrics");
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    crate::Error::BadRequest(err.to_string()).into()
}

/// Register all routes of the service.
pub(crate) fn routes(generator: Data<PassGenerator>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(resource("/metrics").route(web::get().to(handlers::metrics)))
            .service(resource("/health").route(web::get().to(handlers::health)))
            .service(
                resource(GENERATE_PASS_PATH)
                    .app_data(generator)
                    .app_data(
                        web::JsonConfig::default()
                            .limit(JSON_LIMIT)
                            .error_handler(json_error),
                    )
                    .wrap_fn(collect_metrics)
                    .route(web::post().to(handlers::generate_pass)),
            );
    }
}

#[actix_rt::main]
pub async fn exec(server_opts: ServerOpts) -> Result<(), PassServerError> {
    let ServerOpts {
        host,
        port,
        pipeline,
    } = server_opts;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let generator = Data::new(build_generator(&pipeline)?.with_observer(MetricsObserver));

    log::info!("serving passes on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(
                Logger::new("request=%{PATH}xi, status=%s, response_time=%D ms")
                    .custom_request_replace("PATH", |req| {
                        req.match_pattern().unwrap_or("-".to_string())
                    }),
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_header(header::CONTENT_TYPE)
                    .expose_headers(vec![header::CONTENT_DISPOSITION])
                    .max_age(86400),
            )
            .configure(routes(generator.clone()))
    })
    .bind(format!("{host}:{port}"))?
    .shutdown_timeout(1)
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use actix_http::Request;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{test, App, Error};

    use openssl::x509::X509;
    use pass_core::assets::MemoryAssetStore;
    use pass_core::manifest::sha1_hex;
    use pass_core::request::PassRequest;
    use pass_core::signer::verify;
    use pass_core::test::{read_archive, TestSetup};
    use pass_core::{MANIFEST_FILE, PKPASS_CONTENT_TYPE, SIGNATURE_FILE};

    use std::collections::BTreeMap;

    pub(crate) fn jane_doe() -> PassRequest {
        PassRequest {
            name: "Jane Doe".to_string(),
            membership_number: "12345".to_string(),
            brand_name: "CU".to_string(),
            expiration_date: None,
        }
    }

    pub(crate) async fn setup_with(
        generator: PassGenerator,
    ) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
        test::init_service(App::new().configure(routes(Data::new(generator)))).await
    }

    pub(crate) async fn default_setup() -> (
        impl Service<Request, Response = ServiceResponse, Error = Error>,
        X509,
    ) {
        let TestSetup {
            config,
            assets,
            signer,
            certificate,
        } = TestSetup::new();

        let generator =
            PassGenerator::new(config, assets, signer).with_observer(MetricsObserver);

        (setup_with(generator).await, certificate)
    }

    fn post(body: &PassRequest) -> Request {
        test::TestRequest::post()
            .uri(GENERATE_PASS_PATH)
            .set_json(body)
            .to_request()
    }

    #[actix_web::test]
    async fn test_health() {
        let (app, _) = default_setup().await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "OK");
    }

    #[actix_web::test]
    async fn test_generate_pass() {
        let (app, certificate) = default_setup().await;

        let resp = test::call_service(&app, post(&jane_doe())).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers().clone();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), PKPASS_CONTENT_TYPE);
        assert!(headers
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("membership.pkpass"));
        assert!(headers.contains_key(REQUEST_ID_HEADER));

        let body = test::read_body(resp).await;
        assert_eq!(
            headers.get(header::CONTENT_LENGTH).unwrap(),
            body.len().to_string().as_str()
        );

        let files = read_archive(&body);
        let names: Vec<_> = files.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["icon.png", "logo.png", "manifest.json", "pass.json", "signature"]
        );

        let pass: serde_json::Value = serde_json::from_slice(&files["pass.json"]).unwrap();
        assert_eq!(pass["organizationName"], "Jane Doe");
        assert_eq!(pass["serialNumber"], "12345");
        assert_eq!(pass["backgroundColor"], "rgb(128,0,128)");
        assert_eq!(pass["foregroundColor"], "rgb(255,255,255)");
        assert!(pass.get("expirationDate").is_none());

        let manifest: BTreeMap<String, String> =
            serde_json::from_slice(&files[MANIFEST_FILE]).unwrap();
        assert_eq!(manifest.len(), 3);
        for (name, digest) in &manifest {
            assert_eq!(digest, &sha1_hex(&files[name]));
        }

        assert!(verify(&files[SIGNATURE_FILE], &files[MANIFEST_FILE], &certificate).is_ok());
    }

    #[actix_web::test]
    async fn test_generate_pass_with_expiration() {
        let (app, _) = default_setup().await;

        let mut body = jane_doe();
        body.expiration_date = Some("2030-12-31T23:59:59+09:00".to_string());

        let resp = test::call_service(&app, post(&body)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let files = read_archive(&test::read_body(resp).await);
        let pass: serde_json::Value = serde_json::from_slice(&files["pass.json"]).unwrap();
        assert_eq!(pass["expirationDate"], "2030-12-31T23:59:59+09:00");
    }

    #[actix_web::test]
    async fn test_validation_error() {
        let (app, _) = default_setup().await;

        let mut body = jane_doe();
        body.membership_number = String::new();

        let resp = test::call_service(&app, post(&body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], true);
        assert_eq!(err["request_id"].as_str().map(str::len), Some(16));
        assert_eq!(err["kind"], "request");
        assert_eq!(err["stage"], "validate");
    }

    #[actix_web::test]
    async fn test_malformed_body() {
        let (app, _) = default_setup().await;

        let req = test::TestRequest::post()
            .uri(GENERATE_PASS_PATH)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(r#"{"name":"Jane Doe","brand_name":"CU"}"#)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(err["kind"], "request");
        assert!(err["stage"].is_null());
        assert!(err["request_id"].is_null());
    }

    #[actix_web::test]
    async fn test_wrong_method() {
        let (app, _) = default_setup().await;

        let req = test::TestRequest::get().uri(GENERATE_PASS_PATH).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn test_missing_asset() {
        let TestSetup { config, signer, .. } = TestSetup::new();
        let assets = MemoryAssetStore::new().with_asset("cu", "icon.png", "icon");
        let app = setup_with(PassGenerator::new(config, assets, signer)).await;

        let resp = test::call_service(&app, post(&jane_doe())).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            PKPASS_CONTENT_TYPE
        );

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(err["kind"], "service");
        assert_eq!(err["stage"], "bundle");
    }

    #[actix_web::test]
    async fn test_signing_error() {
        let TestSetup { config, assets, .. } = TestSetup::new();
        let failing = |_: &[u8]| -> Result<Vec<u8>, pass_core::error::Error> {
            Err(pass_core::error::Error::Signing("key unavailable".to_string()))
        };
        let app = setup_with(PassGenerator::new(config, assets, failing)).await;

        let resp = test::call_service(&app, post(&jane_doe())).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let id = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let err: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(err["kind"], "service");
        assert_eq!(err["stage"], "sign");
        assert_eq!(err["request_id"], id.as_str());
        assert!(err["message"].as_str().unwrap().contains("key unavailable"));
    }

    #[actix_web::test]
    async fn test_concurrent_requests() {
        let (app, certificate) = default_setup().await;

        let bodies: Vec<PassRequest> = (0..6)
            .map(|i| PassRequest {
                membership_number: format!("{}", 1000 + i),
                brand_name: if i % 2 == 0 { "CU" } else { "kt" }.to_string(),
                ..jane_doe()
            })
            .collect();

        let responses = futures::future::join_all(
            bodies.iter().map(|body| test::call_service(&app, post(body))),
        )
        .await;

        for (body, resp) in bodies.iter().zip(responses) {
            assert_eq!(resp.status(), StatusCode::OK);

            let files = read_archive(&test::read_body(resp).await);
            let pass: serde_json::Value = serde_json::from_slice(&files["pass.json"]).unwrap();
            let manifest: BTreeMap<String, String> =
                serde_json::from_slice(&files[MANIFEST_FILE]).unwrap();

            assert_eq!(pass["serialNumber"], body.membership_number.as_str());
            assert_eq!(manifest["pass.json"], sha1_hex(&files["pass.json"]));
            assert_eq!(
                files["logo.png"],
                format!("{} logo", body.brand_name.to_lowercase()).into_bytes()
            );
            assert!(verify(&files[SIGNATURE_FILE], &files[MANIFEST_FILE], &certificate).is_ok());
        }
    }
}
