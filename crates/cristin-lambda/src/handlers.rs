//! The two request handlers and their mapping of failures onto HTTP
//! statuses and problem bodies.
//!
//! Every inbound invocation ends here with a response; no error is ever
//! returned to the hosting runtime.

use std::borrow::Cow;
use std::collections::HashMap;

use lambda_http::http::{header, StatusCode};
use lambda_http::{Body, Request, Response};
use serde::Serialize;
use tracing::{error, warn};

use cristin_client::enrich::{get_project, query_and_enrich};
use cristin_client::nva::{shape_project, shape_query_response};
use cristin_client::validate::{
    validate_lookup_params, validate_query_params, LANGUAGE_PARAMETER,
};
use cristin_client::{CristinApi, UpstreamError};

use crate::config::AppConfig;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

pub const ERROR_MESSAGE_BACKEND_FETCH_FAILED: &str =
    "Your request cannot be processed at this time due to an upstream error";
pub const ERROR_MESSAGE_SERVER_ERROR: &str =
    "Internal server error. Contact application administrator.";
const ERROR_MESSAGE_UNKNOWN_PATH: &str = "Unknown resource path";

/// Problem body emitted on every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ProblemDetail {
    pub status: u16,
    pub title: &'static str,
    pub detail: String,
}

/// The two public operations, bound to one upstream client and one loaded
/// configuration.
pub struct Api<C> {
    client: C,
    config: AppConfig,
}

impl<C: CristinApi> Api<C> {
    pub fn new(client: C, config: AppConfig) -> Self {
        Self { client, config }
    }

    /// Route an invocation to the matching operation and always produce a
    /// response.
    pub async fn handle(&self, request: &Request) -> Response<Body> {
        let path = request.uri().path().to_owned();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["project"] => self.query_projects(request).await,
            ["project", id] => self.get_one_project(id, request).await,
            _ => self.problem(StatusCode::NOT_FOUND, ERROR_MESSAGE_UNKNOWN_PATH),
        }
    }

    async fn query_projects(&self, request: &Request) -> Response<Body> {
        let raw = query_parameters(request);
        let params = match validate_query_params(&raw) {
            Ok(params) => params,
            Err(e) => return self.problem(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        match query_and_enrich(&self.client, &params).await {
            Ok(outcome) => self.json(&shape_query_response(&outcome, &params)),
            Err(e) => self.upstream_problem(&e),
        }
    }

    async fn get_one_project(&self, raw_id: &str, request: &Request) -> Response<Body> {
        let raw = query_parameters(request);
        let params = match validate_lookup_params(
            Some(raw_id),
            raw.get(LANGUAGE_PARAMETER).map(String::as_str),
        ) {
            Ok(params) => params,
            Err(e) => return self.problem(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        match get_project(&self.client, &params).await {
            Ok(record) => self.json(&shape_project(&record, params.language)),
            Err(UpstreamError::NotFound) => self.problem(
                StatusCode::NOT_FOUND,
                &format!("Project with id {} not found", params.id),
            ),
            Err(e) => self.upstream_problem(&e),
        }
    }

    fn json<T: Serialize>(&self, body: &T) -> Response<Body> {
        match serde_json::to_string(body) {
            Ok(text) => self.response(StatusCode::OK, APPLICATION_JSON, text),
            Err(e) => {
                error!(error = %e, "response serialization failed");
                self.problem(StatusCode::INTERNAL_SERVER_ERROR, ERROR_MESSAGE_SERVER_ERROR)
            }
        }
    }

    fn upstream_problem(&self, upstream_error: &UpstreamError) -> Response<Body> {
        match upstream_error {
            UpstreamError::Url(_) => {
                error!(error = %upstream_error, "upstream url construction failed");
                self.problem(StatusCode::INTERNAL_SERVER_ERROR, ERROR_MESSAGE_SERVER_ERROR)
            }
            _ => {
                warn!(error = %upstream_error, "upstream call failed");
                self.problem(StatusCode::BAD_GATEWAY, ERROR_MESSAGE_BACKEND_FETCH_FAILED)
            }
        }
    }

    fn problem(&self, status: StatusCode, detail: &str) -> Response<Body> {
        let body = ProblemDetail {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error"),
            detail: detail.to_owned(),
        };
        let text = serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_owned());
        self.response(status, APPLICATION_PROBLEM_JSON, text)
    }

    fn response(&self, status: StatusCode, content_type: &str, body: String) -> Response<Body> {
        let built = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .header(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                &self.config.allowed_origin,
            )
            .body(Body::Text(body));
        match built {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "building response failed");
                let mut fallback = Response::new(Body::Empty);
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            }
        }
    }
}

/// Extract query parameters from the request URI. Works identically for
/// API Gateway invocations and hand-built test requests; repeated keys keep
/// the first value.
fn query_parameters(request: &Request) -> HashMap<String, String> {
    let Some(query) = request.uri().query() else {
        return HashMap::new();
    };
    let mut parameters = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if let (Some(key), Some(value)) = (decode_component(key), decode_component(value)) {
            parameters.entry(key).or_insert(value);
        }
    }
    parameters
}

fn decode_component(raw: &str) -> Option<String> {
    let raw = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&raw)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
