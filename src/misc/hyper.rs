use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::ConfigBuilderExt;
use std::sync::Arc;
use std::time::Duration;
use tower::util::BoxCloneSyncService;
use tower::{ServiceBuilder, ServiceExt};

/// Sends one request and yields the response with its body fully read.
pub type Transport = BoxCloneSyncService<Request<Full<Bytes>>, Response<Bytes>, tower::BoxError>;

pub fn tls_config() -> Result<rustls::ClientConfig, rustls::Error> {
    Ok(rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::aws_lc_rs::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_webpki_roots()
    .with_no_client_auth())
}

pub type Client = hyper_util::client::legacy::Client<Connector, Full<Bytes>>;
type Connector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

pub fn client(tls_config: rustls::ClientConfig) -> Client {
    let mut connector = hyper_util::client::legacy::connect::HttpConnector::new();
    connector.enforce_http(false);
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(connector);
    hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(connector)
}

/// `timeout` bounds the whole exchange, body included.
pub fn transport(tls_config: rustls::ClientConfig, timeout: Option<Duration>) -> Transport {
    let service = ServiceBuilder::new()
        .layer(tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer::new([
            AUTHORIZATION,
        ]))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().include_headers(true)),
        )
        .service(client(tls_config))
        .map_err(tower::BoxError::from)
        .and_then(collect);
    BoxCloneSyncService::new(
        ServiceBuilder::new()
            .option_layer(timeout.map(tower::timeout::TimeoutLayer::new))
            .service(service),
    )
}

pub async fn collect<B>(response: Response<B>) -> Result<Response<Bytes>, tower::BoxError>
where
    B: http_body::Body,
    B::Error: Into<tower::BoxError>,
{
    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(Into::<tower::BoxError>::into)?
        .to_bytes();
    Ok(Response::from_parts(parts, body))
}
