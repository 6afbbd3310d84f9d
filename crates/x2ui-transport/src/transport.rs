use log::{debug, error, info};
use std::sync::Arc;

use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse, RequestBody};

/// Executes one request to completion. Implementations never retry.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub type TransportRef = Arc<dyn Transport + Send + Sync>;

/// Blocking HTTP transport. No timeout is applied.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    #[inline]
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    #[inline]
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn read(resp: ureq::Response) -> Result<HttpResponse, TransportError> {
        let status = resp.status();
        let status_text = resp.status_text().to_owned();
        let body = resp
            .into_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        info!("{} {}", req.method, req.url);

        let url = url::Url::parse(&req.url).map_err(|e| TransportError::Url {
            url: req.url.clone(),
            reason: e.to_string(),
        })?;

        let mut r = self.agent.request_url(&req.method, &url);
        for (k, v) in req.headers.iter() {
            r = r.set(k, v);
        }
        if let Some(ct) = req.content_type() {
            r = r.set("Content-Type", &ct);
        }

        let resp = match &req.body {
            RequestBody::Empty => r.call(),
            RequestBody::Json(body) => r.send_string(body),
            RequestBody::Multipart(form) => r.send_bytes(&form.encode()),
        };

        match resp {
            Ok(ok) => Self::read(ok),
            Err(ureq::Error::Status(code, resp)) => {
                debug!("{} {} answered {code}", req.method, req.url);
                Self::read(resp)
            }
            Err(ureq::Error::Transport(t)) => {
                error!("http request failed: {t}");
                Err(TransportError::Io(t.to_string()))
            }
        }
    }
}
