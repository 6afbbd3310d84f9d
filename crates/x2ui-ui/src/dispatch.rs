//! Backend dispatcher.
//!
//! Requests are queued by the binder and the sub-controllers and executed by [`Client::pump`].
//! Every request is tagged with the generation of the UI region it will write into; a response
//! arriving after a newer request for the same region was issued is dropped.

use ahash::AHashMap;
use log::{debug, error, info, warn};
use std::collections::VecDeque;

use x2ui_core::{UiError, UiResult};
use x2ui_transport::{Endpoints, HttpRequest, HttpResponse, RequestBody, TransportRef};
use x2ui_view::{ApplicationFeature, DataListItem, ResponseView, ValidationErrors};

use crate::client::Client;
use crate::dom::ElementId;
use crate::table::TableId;

/// Header carrying the signed-in identity.
pub const USER_HEADER: &str = "x2.user";

/// Upper bound on requests executed by one `run_until_idle`.
const IDLE_LIMIT: usize = 10_000;

/// Part of the UI a response writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Children of a target element.
    Element(ElementId),
    /// Feature title and body.
    Feature,
    /// Side menu.
    Menu,
    /// Rows of a table.
    TableRows(TableId),
    /// Row count and pager of a table.
    TableSize(TableId),
    /// Items of a data list.
    DataList(ElementId),
}

/// What happens to a successful response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Completion {
    RunAction { context: Option<ElementId> },
    RunFeature,
    ApplicationMenu,
    UserLogin,
    TablePage { table: TableId },
    TableSize { table: TableId },
    DataListSaved { dialog: ElementId },
}

#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    pub path: String,
    pub body: RequestBody,
    pub completion: Completion,
    pub region: Option<(Region, u64)>,
    /// Busy button when the request was issued.
    pub button: Option<ElementId>,
}

/// Classified failure of one round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestFailure {
    /// No HTTP response at all.
    Transport(String),
    /// `400` with a structured `{message, errors}` body.
    Validation(ValidationErrors),
    /// `400` with any other body.
    BadRequest(String),
    /// `5xx`; the body is shown verbatim.
    Server(String),
    /// Any other non-2xx status.
    Status { code: u16, text: String, body: String },
    /// A 2xx body that could not be read.
    Parse(String),
    /// A local capability failed.
    Script { message: String, stack: String },
}

impl RequestFailure {
    pub fn classify(resp: &HttpResponse) -> Self {
        match resp.status {
            400 => match ValidationErrors::parse(&resp.body) {
                Some(v) => RequestFailure::Validation(v),
                None => RequestFailure::BadRequest(resp.body.clone()),
            },
            s if s >= 500 => RequestFailure::Server(resp.body.clone()),
            code => RequestFailure::Status {
                code,
                text: resp.status_text.clone(),
                body: resp.body.clone(),
            },
        }
    }

    pub fn from_error(err: &UiError) -> Self {
        match err.root() {
            UiError::Script { message, stack } => RequestFailure::Script {
                message: message.clone(),
                stack: stack.clone(),
            },
            UiError::Transport(s) => RequestFailure::Transport(s.clone()),
            UiError::View(s) => RequestFailure::Parse(s.clone()),
            other => RequestFailure::Script {
                message: other.to_string(),
                stack: String::new(),
            },
        }
    }

    /// Bold banner label.
    pub fn label(&self) -> &str {
        match self {
            RequestFailure::Parse(_) => "parsererror",
            RequestFailure::Script { .. } => "400",
            _ => "error",
        }
    }

    /// Banner detail text.
    pub fn detail(&self) -> String {
        match self {
            RequestFailure::Transport(s) => s.clone(),
            RequestFailure::Validation(v) => v.message.clone().unwrap_or_default(),
            RequestFailure::BadRequest(body) | RequestFailure::Server(body) => body.clone(),
            RequestFailure::Status { text, body, .. } => {
                if body.trim().is_empty() {
                    text.clone()
                } else {
                    body.clone()
                }
            }
            RequestFailure::Parse(s) => s.clone(),
            RequestFailure::Script { message, stack } => format!("{message} - {stack}"),
        }
    }

    #[inline]
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            RequestFailure::Validation(v) => Some(v),
            _ => None,
        }
    }
}

pub(crate) struct Dispatcher {
    transport: TransportRef,
    endpoints: Endpoints,
    queue: VecDeque<PendingRequest>,
    generations: AHashMap<Region, u64>,
    max_per_pump: usize,
}

impl Dispatcher {
    pub fn new(transport: TransportRef, endpoints: Endpoints, max_per_pump: u32) -> Self {
        Self {
            transport,
            endpoints,
            queue: VecDeque::new(),
            generations: AHashMap::new(),
            max_per_pump: max_per_pump.max(1) as usize,
        }
    }

    #[inline]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn bump(&mut self, region: Region) -> u64 {
        let g = self.generations.entry(region).or_insert(0);
        *g += 1;
        *g
    }

    #[inline]
    fn is_current(&self, region: Region, generation: u64) -> bool {
        self.generations.get(&region).copied().unwrap_or(0) == generation
    }

    pub fn generation(&self, region: Region) -> u64 {
        self.generations.get(&region).copied().unwrap_or(0)
    }
}

impl Client {
    /// Queues one POST to `<app_root>/events/<path>`.
    pub(crate) fn send(
        &mut self,
        path: String,
        body: RequestBody,
        completion: Completion,
        region: Option<Region>,
    ) {
        let region = region.map(|r| (r, self.dispatcher.bump(r)));
        debug!("queued {path} ({completion:?})");
        self.dispatcher.queue.push_back(PendingRequest {
            path,
            body,
            completion,
            region,
            button: self.session.active_button(),
        });
    }

    /// Requests waiting for `pump`.
    #[inline]
    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Current generation of `region`.
    #[inline]
    pub fn region_generation(&self, region: Region) -> u64 {
        self.dispatcher.generation(region)
    }

    /// Executes up to `max_requests_per_pump` queued requests and applies their responses.
    ///
    /// A local capability failing while a response is applied stops the pump and is returned;
    /// the remaining requests stay queued.
    pub fn pump(&mut self) -> UiResult<usize> {
        let mut n = 0usize;
        while n < self.dispatcher.max_per_pump {
            let Some(req) = self.dispatcher.queue.pop_front() else {
                break;
            };
            n += 1;
            self.execute(req)?;
        }
        Ok(n)
    }

    /// Pumps until no request is queued.
    pub fn run_until_idle(&mut self) -> UiResult<usize> {
        let mut total = 0usize;
        while self.dispatcher.pending() > 0 {
            if total >= IDLE_LIMIT {
                warn!("dispatch: still busy after {IDLE_LIMIT} requests, yielding");
                break;
            }
            total += self.pump()?;
        }
        Ok(total)
    }

    fn execute(&mut self, req: PendingRequest) -> UiResult<()> {
        let url = self.dispatcher.endpoints.url(&req.path);
        let mut http = HttpRequest::post(url).with_body(req.body.clone());
        if let Some(user) = self.session.auth_header() {
            http = http.with_header(USER_HEADER, user);
        }

        let result = self.dispatcher.transport.execute(&http);

        if let Some((region, generation)) = req.region {
            if !self.dispatcher.is_current(region, generation) {
                debug!("dispatch: stale response for {} dropped ({region:?})", req.path);
                if req.button.is_some() && req.button == self.session.active_button() {
                    self.enable_active_button();
                }
                return Ok(());
            }
        }

        match result {
            Err(e) => {
                error!("dispatch: {} failed: {e}", req.path);
                self.handle_backend_error(&RequestFailure::Transport(e.to_string()));
                Ok(())
            }
            Ok(resp) if !resp.is_success() => {
                warn!("dispatch: {} answered {} {}", req.path, resp.status, resp.status_text);
                self.handle_backend_error(&RequestFailure::classify(&resp));
                Ok(())
            }
            Ok(resp) => {
                info!("dispatch: {} answered {}", req.path, resp.status);
                self.complete(req.completion, &resp.body)
            }
        }
    }

    fn complete(&mut self, completion: Completion, body: &str) -> UiResult<()> {
        match completion {
            Completion::RunAction { context } => {
                let Some(view) = self.read_view(body) else {
                    return Ok(());
                };
                self.run_action(&view, context)
            }
            Completion::RunFeature => {
                let Some(view) = self.read_view(body) else {
                    return Ok(());
                };
                self.run_feature(&view)
            }
            Completion::UserLogin => {
                let Some(view) = self.read_view(body) else {
                    return Ok(());
                };
                self.complete_sign_in(&view)
            }
            Completion::ApplicationMenu => {
                match serde_json::from_str::<Vec<ApplicationFeature>>(body) {
                    Ok(features) => self.application_menu(&features),
                    Err(e) => {
                        self.handle_backend_error(&RequestFailure::Parse(e.to_string()));
                        Ok(())
                    }
                }
            }
            Completion::TablePage { table } => {
                match serde_json::from_str::<serde_json::Value>(body) {
                    Ok(rows) => self.table_rows_loaded(table, &rows),
                    Err(e) => {
                        self.handle_backend_error(&RequestFailure::Parse(e.to_string()));
                        Ok(())
                    }
                }
            }
            Completion::TableSize { table } => {
                match serde_json::from_str::<serde_json::Value>(body) {
                    Ok(total) => {
                        self.table_size_loaded(table, &total);
                        Ok(())
                    }
                    Err(e) => {
                        self.handle_backend_error(&RequestFailure::Parse(e.to_string()));
                        Ok(())
                    }
                }
            }
            Completion::DataListSaved { dialog } => {
                match serde_json::from_str::<DataListItem>(body) {
                    Ok(item) => {
                        self.datalist_saved(dialog, item);
                        Ok(())
                    }
                    Err(e) => {
                        self.handle_backend_error(&RequestFailure::Parse(e.to_string()));
                        Ok(())
                    }
                }
            }
        }
    }

    fn read_view(&mut self, body: &str) -> Option<ResponseView> {
        match ResponseView::parse(body) {
            Ok(view) => Some(view),
            Err(e) => {
                self.handle_backend_error(&RequestFailure::Parse(e.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_status() {
        let v = RequestFailure::classify(&HttpResponse::new(
            400,
            r#"{ "message": "Invalid input", "errors": [ { "key": "email", "message": "invalid" } ] }"#,
        ));
        assert_eq!(v.detail(), "Invalid input");
        assert!(v.validation().is_some());

        let raw = RequestFailure::classify(&HttpResponse::new(400, "missing name"));
        assert_eq!(raw, RequestFailure::BadRequest("missing name".to_owned()));

        let server = RequestFailure::classify(&HttpResponse::new(503, "down for maintenance"));
        assert_eq!(server.detail(), "down for maintenance");
        assert_eq!(server.label(), "error");

        let other = RequestFailure::classify(&HttpResponse::new(404, ""));
        assert_eq!(other.detail(), "Not Found");
    }

    #[test]
    fn script_failures_show_message_and_stack() {
        let f = RequestFailure::from_error(&UiError::with_action(
            "save",
            UiError::script("no dialog", "at datalist.save(d1)"),
        ));
        assert_eq!(f.label(), "400");
        assert_eq!(f.detail(), "no dialog - at datalist.save(d1)");
    }
}
