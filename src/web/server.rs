use prometheus::{Encoder, Registry, TextEncoder};
use tiny_http::{Header, Method, Request, Response, ResponseBox, Server};

use crate::web::{Result, WebError};

/// Serves the registry in the Prometheus text format on the telemetry path
/// and a small landing page on `/`.
#[derive(Clone)]
pub struct MetricsServer {
    registry: Registry,
    telemetry_path: String,
}

impl MetricsServer {
    pub fn new(registry: Registry, telemetry_path: &str) -> MetricsServer {
        MetricsServer {
            registry,
            telemetry_path: telemetry_path.to_string(),
        }
    }

    pub fn telemetry_path(&self) -> &str {
        &self.telemetry_path
    }

    /// Route an HTTP request to the appropriate handler
    fn route_request(&self, request: &Request) -> Result<ResponseBox> {
        let url = request.url();
        let path = url.split('?').next().unwrap_or("");

        match request.method() {
            Method::Get | Method::Head if path == self.telemetry_path => self.metrics(),
            Method::Get | Method::Head if path == "/" => self.landing_page(),
            _ => self.not_found(),
        }
    }

    fn handle_request(&self, request: Request) {
        log::debug!("HTTP {:?} {:?}", request.method(), request.url());

        let response = match self.route_request(&request) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Request failed: {}", err);
                Response::from_string(err.to_string())
                    .with_status_code(500)
                    .boxed()
            }
        };

        if let Err(err) = request.respond(response) {
            log::info!("Failed to write response to client: {:?}", err);
        }
    }

    fn metrics(&self) -> Result<ResponseBox> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;

        Ok(Response::from_data(buffer)
            .with_header(content_type(encoder.format_type())?)
            .boxed())
    }

    fn landing_page(&self) -> Result<ResponseBox> {
        let body = format!(
            "<html>\n\
             <head><title>BIND Exporter</title></head>\n\
             <body>\n\
             <h1>BIND Exporter</h1>\n\
             <p>Version {}</p>\n\
             <p><a href=\"{}\">Metrics</a></p>\n\
             </body>\n\
             </html>\n",
            env!("CARGO_PKG_VERSION"),
            self.telemetry_path
        );

        Ok(Response::from_string(body)
            .with_header(content_type("text/html; charset=utf-8")?)
            .boxed())
    }

    fn not_found(&self) -> Result<ResponseBox> {
        Ok(Response::from_string("Not found")
            .with_status_code(404)
            .boxed())
    }

    /// Handles requests on an already bound server until it shuts down
    pub fn serve(&self, server: Server) {
        for request in server.incoming_requests() {
            self.handle_request(request);
        }
    }

    pub fn run(&self, address: &str) -> Result<()> {
        let server = Server::http(address).map_err(|err| WebError::Bind {
            address: address.to_string(),
            reason: err.to_string(),
        })?;

        log::info!(
            "Listening on {}, metrics at {}",
            address,
            self.telemetry_path
        );

        self.serve(server);
        Ok(())
    }
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).map_err(|_| WebError::InvalidHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_header() {
        let header = content_type("text/plain; version=0.0.4").unwrap();
        assert!(header.field.equiv("content-type"));
        assert_eq!(header.value.as_str(), "text/plain; version=0.0.4");
    }

    #[test]
    fn test_bind_failure() {
        let server = MetricsServer::new(Registry::new(), "/metrics");
        let err = server.run("not an address").unwrap_err();
        assert!(matches!(err, WebError::Bind { .. }));
    }
}
