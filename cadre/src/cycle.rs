//! The request cycle orchestrator.
//!
//! [`RequestCycle`] owns the registries, the catalog, and the collaborator
//! handles, and sequences one request: resolve the page, run the handler
//! pipeline, merge router metadata, consume a pending flash, then either
//! run the output pipeline or stash the result and redirect.

use crate::catalog::UnitCatalog;
use crate::dispatch::Dispatcher;
use crate::flash;
use crate::output::{OutputPipeline, RenderedResponse};
use crate::registry::ModuleRegistry;
use cadre_core::{Config, FormatKind, ResponseState, SessionStore};
use cadre_std::diagnostics::{DiagnosticLog, MessageLog};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// How the request arrived, which determines the response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A full-page browser request; renders a document.
    Http,
    /// An asynchronous browser request; renders a structured object.
    Ajax,
    /// A terminal invocation; renders a document.
    Cli,
}

impl RequestKind {
    /// Stable name for router metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Http => "HTTP",
            RequestKind::Ajax => "AJAX",
            RequestKind::Cli => "CLI",
        }
    }

    /// The output format this request kind produces.
    pub fn format_kind(&self) -> FormatKind {
        match self {
            RequestKind::Ajax => FormatKind::Structured,
            RequestKind::Http | RequestKind::Cli => FormatKind::Document,
        }
    }
}

/// One incoming request, after field extraction and filtering (which happen
/// upstream of this crate).
#[derive(Debug, Clone)]
pub struct Request {
    /// How the request arrived.
    pub kind: RequestKind,
    /// The requested page, if one was named.
    pub page: Option<String>,
    /// Posted form fields. A non-empty post on an HTTP request marks the
    /// request state-changing.
    pub post: Map<String, Value>,
}

impl Request {
    /// An HTTP request for `page`.
    pub fn http(page: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Http,
            page: Some(page.into()),
            post: Map::new(),
        }
    }

    /// An AJAX request for `page`.
    pub fn ajax(page: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Ajax,
            page: Some(page.into()),
            post: Map::new(),
        }
    }

    /// A CLI request for `page`.
    pub fn cli(page: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Cli,
            page: Some(page.into()),
            post: Map::new(),
        }
    }

    /// A request that names no page; resolves to the home page.
    pub fn without_page(kind: RequestKind) -> Self {
        Self {
            kind,
            page: None,
            post: Map::new(),
        }
    }

    /// Attach a posted field.
    pub fn with_post(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.post.insert(key.into(), value.into());
        self
    }

    /// Whether this request should be answered with a redirect after
    /// processing instead of a rendered body.
    pub fn is_state_changing(&self) -> bool {
        self.kind == RequestKind::Http && !self.post.is_empty()
    }
}

/// What one cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A rendered response body.
    Rendered(RenderedResponse),
    /// Redirect instruction; the computed result was stashed in the session
    /// for the follow-up request. No output was rendered.
    Redirect {
        /// Page the client should re-request.
        location: String,
    },
}

/// Sequences Dispatcher → OutputPipeline for one request and implements the
/// flash/redirect carry-over.
///
/// Constructed once per process and handed by reference into request
/// handling; registrations and catalog entries are made at startup through
/// the `*_mut` accessors.
pub struct RequestCycle {
    handlers: ModuleRegistry,
    outputs: ModuleRegistry,
    catalog: UnitCatalog,
    config: Box<dyn Config>,
    allowed_pages: HashSet<String>,
    diagnostics: DiagnosticLog,
    messages: MessageLog,
}

impl RequestCycle {
    /// Create an engine over the given configuration.
    pub fn new(config: Box<dyn Config>) -> Self {
        let diagnostics = DiagnosticLog::new();
        let mut allowed_pages = HashSet::new();
        allowed_pages.insert("home".to_string());
        allowed_pages.insert("notfound".to_string());
        Self {
            handlers: ModuleRegistry::new(diagnostics.clone()),
            outputs: ModuleRegistry::new(diagnostics.clone()),
            catalog: UnitCatalog::new(),
            config,
            allowed_pages,
            diagnostics,
            messages: MessageLog::new(),
        }
    }

    /// The handler-unit registry.
    pub fn handlers(&self) -> &ModuleRegistry {
        &self.handlers
    }

    /// The handler-unit registry, for startup registration.
    pub fn handlers_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.handlers
    }

    /// The output-unit registry.
    pub fn outputs(&self) -> &ModuleRegistry {
        &self.outputs
    }

    /// The output-unit registry, for startup registration.
    pub fn outputs_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.outputs
    }

    /// The unit factory catalog, for startup registration.
    pub fn catalog_mut(&mut self) -> &mut UnitCatalog {
        &mut self.catalog
    }

    /// Allow a page key to be requested.
    pub fn allow_page(&mut self, page: impl Into<String>) {
        self.allowed_pages.insert(page.into());
    }

    /// The shared diagnostic log.
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// The shared user-message log.
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Process one request against `session` and produce its outcome.
    pub async fn run(&self, request: &Request, session: &mut dyn SessionStore) -> CycleOutcome {
        let page = self.resolve_page(request);
        let authenticated = session.is_active();
        tracing::debug!(%page, kind = request.kind.as_str(), authenticated, "request cycle start");

        let dispatcher =
            Dispatcher::new(&self.handlers, &self.catalog, self.config.as_ref(), &self.diagnostics);
        let mut state = dispatcher
            .run(&page, ResponseState::new(), authenticated)
            .await;

        state.insert("router_page_name", page.clone());
        state.insert("router_request_kind", request.kind.as_str());
        state.insert("router_format_name", request.kind.format_kind().as_str());
        state.insert("router_login_state", authenticated);

        if let Some((flashed, messages)) = flash::consume(session, &page) {
            state.merge(flashed);
            for message in messages {
                self.messages.push(message);
            }
        }

        // A state-changing request stashes its result and redirects instead
        // of rendering, so a resubmission can't repeat the change.
        if request.is_state_changing() && authenticated {
            flash::stash(session, &page, state, self.messages.drain());
            return CycleOutcome::Redirect { location: page };
        }

        let kind = request.kind.format_kind();
        let pipeline = OutputPipeline::new(&self.outputs, &self.catalog, &self.diagnostics);
        let mut response = pipeline.run(&page, &state, kind, authenticated).await;
        if let RenderedResponse::Structured(object) = &mut response {
            object.insert("router_user_msgs", self.messages.snapshot());
        }
        CycleOutcome::Rendered(response)
    }

    fn resolve_page(&self, request: &Request) -> String {
        match &request.page {
            None => "home".to_string(),
            Some(page) if self.allowed_pages.contains(page) => page.clone(),
            Some(_) => "notfound".to_string(),
        }
    }
}
