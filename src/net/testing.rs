//! Scripted transport and navigator shared by coordinator tests.
//!
//! Replies are queued per `(method, path)`. A deferred reply hands the test a
//! oneshot sender so it decides exactly when the "server" answers, which is
//! how interleavings across suspension points are driven.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;

use super::client::{ApiError, ApiRequest, ApiResponse, Transport};
use super::config::ApiConfig;
use super::types::Method;
use crate::util::navigation::Navigator;

pub(crate) type Reply = Result<ApiResponse, ApiError>;

enum Scripted {
    Ready(Reply),
    Deferred(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct TransportInner {
    replies: HashMap<(Method, String), VecDeque<Scripted>>,
    calls: Vec<ApiRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Rc<RefCell<TransportInner>>,
}

fn key(method: Method, path: &str) -> (Method, String) {
    (method, ApiConfig::default().endpoint(path))
}

pub(crate) fn reply(status: u16, body: serde_json::Value) -> Reply {
    Ok(ApiResponse { status, body })
}

impl ScriptedTransport {
    pub(crate) fn on(&self, method: Method, path: &str, reply: Reply) {
        self.inner
            .borrow_mut()
            .replies
            .entry(key(method, path))
            .or_default()
            .push_back(Scripted::Ready(reply));
    }

    pub(crate) fn defer(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .borrow_mut()
            .replies
            .entry(key(method, path))
            .or_default()
            .push_back(Scripted::Deferred(rx));
        tx
    }

    pub(crate) fn calls(&self) -> Vec<ApiRequest> {
        self.inner.borrow().calls.clone()
    }

    pub(crate) fn call_count(&self, method: Method, path: &str) -> usize {
        let (method, url) = key(method, path);
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Reply> {
        let next = {
            let mut inner = self.inner.borrow_mut();
            let next = inner
                .replies
                .get_mut(&(request.method, request.url.clone()))
                .and_then(VecDeque::pop_front);
            inner.calls.push(request.clone());
            next
        };
        async move {
            match next {
                Some(Scripted::Ready(reply)) => reply,
                Some(Scripted::Deferred(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".to_owned()))),
                None => Err(ApiError::Network(format!("no scripted reply for {}", request.url))),
            }
        }
    }
}

#[derive(Clone)]
pub(crate) struct RecordingNavigator {
    current: String,
    redirects: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub(crate) fn at(path: &str) -> Self {
        Self { current: path.to_owned(), redirects: Rc::default() }
    }

    pub(crate) fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.clone()
    }

    fn hard_redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_owned());
    }
}
