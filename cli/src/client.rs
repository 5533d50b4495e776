use anyhow::anyhow;
use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::{Method, Request, StatusCode};
use sparcheck::{QueryExecutor, ResultFormat, TransportError};
use std::io;
use std::time::Duration;
use tracing::debug;
use url::Url;
use url::form_urlencoded::Serializer;

const ACCEPTED: &str = "application/json, application/sparql-results+json";

/// Runs queries against a QLever-compatible HTTP endpoint.
///
/// The parameters are `query`, `send` and `action`, the last one selecting the result encoding.
/// Any status other than `200 OK` is a transport error.
pub struct HttpExecutor {
    client: oxhttp::Client,
    endpoint: Url,
    send: u64,
    post: bool,
}

impl HttpExecutor {
    pub fn new(
        endpoint: Url,
        send: u64,
        post: bool,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut client = oxhttp::Client::new()
            .with_redirection_limit(5)
            .with_user_agent(concat!("sparcheck/", env!("CARGO_PKG_VERSION")))
            .map_err(|e| anyhow!("invalid user agent: {e}"))?;
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Ok(Self {
            client,
            endpoint,
            send,
            post,
        })
    }

    fn query_url(&self, sparql: &str, format: ResultFormat) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .extend_pairs(parameters(sparql, &self.send.to_string(), format));
        url
    }

    fn form_body(&self, sparql: &str, format: ResultFormat) -> String {
        Serializer::new(String::new())
            .extend_pairs(parameters(sparql, &self.send.to_string(), format))
            .finish()
    }
}

fn parameters<'a>(sparql: &'a str, send: &'a str, format: ResultFormat) -> [(&'a str, &'a str); 3] {
    [("query", sparql), ("send", send), ("action", format.action())]
}

impl QueryExecutor for HttpExecutor {
    fn execute(&self, sparql: &str, format: ResultFormat) -> Result<String, TransportError> {
        let response = if self.post {
            debug!(endpoint = %self.endpoint, %format, "sending POST query");
            let request = Request::builder()
                .method(Method::POST)
                .uri(self.endpoint.as_str())
                .header(ACCEPT, ACCEPTED)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(self.form_body(sparql, format).into_bytes())
                .map_err(io::Error::other)?;
            self.client.request(request)?
        } else {
            let url = self.query_url(sparql, format);
            debug!(%url, "sending GET query");
            let request = Request::builder()
                .uri(url.as_str())
                .header(ACCEPT, ACCEPTED)
                .body(())
                .map_err(io::Error::other)?;
            self.client.request(request)?
        };
        let status = response.status();
        let body = response.into_body().to_string()?;
        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
