use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};
use crate::transport::Transport;

struct Route {
    fragment: String,
    queued: VecDeque<Result<HttpResponse, TransportError>>,
    always: Option<HttpResponse>,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    log: Vec<HttpRequest>,
}

/// In-memory transport answering from canned responses; records every request.
///
/// A request is answered by the first route whose URL fragment it contains and that still has
/// something to say: queued answers are consumed in order, then the route's fixed answer is
/// repeated. Unmatched requests get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    state: Mutex<State>,
}

impl ScriptedTransport {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers the next matching request once.
    pub fn respond(&self, fragment: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(fragment, Ok(HttpResponse::new(status, body)));
        self
    }

    /// Fails the next matching request once without any response.
    pub fn fail(&self, fragment: &str, reason: &str) -> &Self {
        self.push(fragment, Err(TransportError::Io(reason.to_owned())));
        self
    }

    /// Answers every matching request once queued answers run out.
    pub fn respond_always(&self, fragment: &str, status: u16, body: impl Into<String>) -> &Self {
        let mut st = self.state.lock();
        let resp = HttpResponse::new(status, body);
        match st.routes.iter_mut().find(|r| r.fragment == fragment) {
            Some(route) => route.always = Some(resp),
            None => st.routes.push(Route {
                fragment: fragment.to_owned(),
                queued: VecDeque::new(),
                always: Some(resp),
            }),
        }
        self
    }

    fn push(&self, fragment: &str, answer: Result<HttpResponse, TransportError>) {
        let mut st = self.state.lock();
        match st.routes.iter_mut().find(|r| r.fragment == fragment) {
            Some(route) => route.queued.push_back(answer),
            None => st.routes.push(Route {
                fragment: fragment.to_owned(),
                queued: VecDeque::from([answer]),
                always: None,
            }),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().log.clone()
    }

    pub fn take_requests(&self) -> Vec<HttpRequest> {
        std::mem::take(&mut self.state.lock().log)
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Event paths of all recorded requests, in order.
    pub fn paths(&self) -> Vec<String> {
        self.state
            .lock()
            .log
            .iter()
            .map(|r| r.event_path().to_owned())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut st = self.state.lock();
        st.log.push(request.clone());

        for route in st.routes.iter_mut() {
            if !request.url.contains(&route.fragment) {
                continue;
            }
            if let Some(answer) = route.queued.pop_front() {
                return answer;
            }
            if let Some(always) = &route.always {
                return Ok(always.clone());
            }
        }

        Ok(HttpResponse::new(
            404,
            format!("no scripted response for {}", request.url),
        ))
    }
}
