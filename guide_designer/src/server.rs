use std::io::Read;

use anyhow::anyhow;
use sequence_retriever::SequenceSource;
use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Method, Response, Server};
use tracing::{error, info};

use crate::errors::{DesignError, ValidationError};
use crate::export::{guides_to_csv, CSV_FILE_NAME};
use crate::fasta::first_record;
use crate::models::{CrisprRequest, DesignRequest, ErrorBody, ScanResult};
use crate::scoring::ScoringSettings;
use crate::sequence_map::render_page;
use crate::workflow::{design_guides, parse_request, parse_request_body};

const JSON: &str = "application/json";

/// A fully rendered HTTP answer, independent of the transport.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub headers: Vec<(&'static str, String)>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: String) -> Self {
        Self {
            status,
            content_type,
            body,
            headers: vec![("Access-Control-Allow-Origin", "*".to_string())],
        }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::new(status, JSON, body),
            Err(e) => Self::error(500, format!("Failed to encode response: {}", e)),
        }
    }

    pub fn error(status: u16, message: String) -> Self {
        Self::json(status, &ErrorBody { error: message })
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body.into_bytes()).with_status_code(self.status);
        let headers = std::iter::once(("Content-Type", self.content_type.to_string())).chain(self.headers);
        for (name, value) in headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => error!("Dropping invalid header {}: {}", name, value),
            }
        }
        response
    }
}

fn status_for(err: &DesignError) -> u16 {
    match err {
        DesignError::Validation(_) => 400,
        DesignError::Resolution(_) => 502,
    }
}

/// Routes requests to the guide design workflow.
pub struct GuideService<S> {
    source: S,
    scoring: ScoringSettings,
}

impl<S: SequenceSource> GuideService<S> {
    pub fn new(source: S, scoring: ScoringSettings) -> Self {
        Self { source, scoring }
    }

    fn design(&self, request: Result<DesignRequest, ValidationError>) -> Result<ScanResult, DesignError> {
        let mut scorer = self.scoring.build();
        design_guides(request?, &self.source, scorer.as_mut())
    }

    fn fasta_request(body: &str) -> Result<DesignRequest, ValidationError> {
        let record = first_record(body)?;
        info!("Scanning FASTA record {}", record.id);
        parse_request(CrisprRequest {
            sequence: Some(record.sequence),
            gene: None,
        })
    }

    pub fn handle(&self, method: &Method, path: &str, body: &str) -> Reply {
        let outcome = match (method, path) {
            (Method::Options, _) => {
                return Reply::new(204, "text/plain", String::new())
                    .with_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
                    .with_header("Access-Control-Allow-Headers", "*");
            }
            (Method::Get, "/") => {
                return Reply::json(
                    200,
                    &json!({"message": "Welcome to the CRISPR guide designer API!"}),
                );
            }
            (Method::Post, "/workflow/crispr") => {
                self.design(parse_request_body(body)).map(|result| Reply::json(200, &result))
            }
            (Method::Post, "/workflow/crispr/fasta") => {
                self.design(Self::fasta_request(body)).map(|result| Reply::json(200, &result))
            }
            (Method::Post, "/workflow/crispr/csv") => self.design(parse_request_body(body)).map(|result| {
                match guides_to_csv(&result.guides) {
                    Ok(csv) => Reply::new(200, "text/csv", csv).with_header(
                        "Content-Disposition",
                        format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
                    ),
                    Err(e) => Reply::error(500, format!("Failed to write CSV: {}", e)),
                }
            }),
            (Method::Post, "/workflow/crispr/map") => self
                .design(parse_request_body(body))
                .map(|result| Reply::new(200, "text/html; charset=utf-8", render_page(&result))),
            (_, "/" | "/workflow/crispr" | "/workflow/crispr/fasta" | "/workflow/crispr/csv" | "/workflow/crispr/map") => {
                return Reply::error(405, format!("Method {} not allowed on {}", method, path));
            }
            _ => return Reply::error(404, format!("No route for {}", path)),
        };

        outcome.unwrap_or_else(|err| Reply::error(status_for(&err), err.to_string()))
    }
}

pub fn bind(addr: &str) -> anyhow::Result<Server> {
    Server::http(addr).map_err(|e| anyhow!("failed to bind {}: {}", addr, e))
}

/// Handles requests one at a time until the server shuts down.
pub fn run<S: SequenceSource>(server: Server, service: &GuideService<S>) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let path = request.url().split('?').next().unwrap_or("/").to_string();

        let mut body = String::new();
        let reply = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => service.handle(&method, &path, &body),
            Err(e) => Reply::error(400, ValidationError::MalformedBody(e.to_string()).to_string()),
        };

        info!("{} {} -> {}", method, path, reply.status);
        if let Err(e) = request.respond(reply.into_response()) {
            error!("Failed to send response for {} {}: {}", method, path, e);
        }
    }
}

pub fn serve<S: SequenceSource>(service: &GuideService<S>, addr: &str) -> anyhow::Result<()> {
    let server = bind(addr)?;
    info!("Listening on http://{}", addr);
    run(server, service);
    Ok(())
}
