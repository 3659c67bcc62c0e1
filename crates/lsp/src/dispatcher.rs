use crate::from_json;
use crate::server::LspServerState;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn result_to_response<R>(
    id: lsp_server::RequestId,
    result: Result<R::Result>,
) -> lsp_server::Response
where
    R: lsp_types::request::Request + 'static,
    R::Params: DeserializeOwned + 'static,
    R::Result: Serialize + 'static,
{
    match result {
        Ok(resp) => lsp_server::Response::new_ok(id, &resp),
        Err(e) => lsp_server::Response::new_err(
            id,
            lsp_server::ErrorCode::InternalError as i32,
            e.to_string(),
        ),
    }
}

#[must_use = "RequestDispatcher::finish not called"]
pub(crate) struct RequestDispatcher<'a> {
    state: &'a mut LspServerState,
    request: Option<lsp_server::Request>,
}

impl<'a> RequestDispatcher<'a> {
    pub fn new(state: &'a mut LspServerState, request: lsp_server::Request) -> Self {
        RequestDispatcher {
            state,
            request: Some(request),
        }
    }

    /// Takes the request if it is an `R`. Bad params are answered with `InvalidParams`.
    fn parse<R>(&mut self) -> Option<(lsp_server::RequestId, R::Params)>
    where
        R: lsp_types::request::Request + 'static,
        R::Params: DeserializeOwned + 'static,
    {
        let req = match self.request.take() {
            Some(req) if req.method == R::METHOD => req,
            other => {
                self.request = other;
                return None;
            }
        };

        match from_json(R::METHOD, req.params) {
            Ok(params) => Some((req.id, params)),
            Err(err) => {
                let response = lsp_server::Response::new_err(
                    req.id,
                    lsp_server::ErrorCode::InvalidParams as i32,
                    err.to_string(),
                );
                self.state.respond(response);
                None
            }
        }
    }

    pub fn on_sync<R>(
        &mut self,
        f: fn(&mut LspServerState, R::Params) -> Result<R::Result>,
    ) -> &mut Self
    where
        R: lsp_types::request::Request + 'static,
        R::Params: DeserializeOwned + 'static,
        R::Result: Serialize + 'static,
    {
        if let Some((id, params)) = self.parse::<R>() {
            let response = result_to_response::<R>(id, f(self.state, params));
            self.state.respond(response);
        }
        self
    }

    pub fn finish(&mut self) {
        if let Some(req) = self.request.take() {
            tracing::error!("unknown request: {:?}", req);
            let response = lsp_server::Response::new_err(
                req.id,
                lsp_server::ErrorCode::MethodNotFound as i32,
                "unknown request".to_string(),
            );
            self.state.respond(response);
        }
    }
}

#[must_use = "NotificationDispatcher::finish not called"]
pub(crate) struct NotificationDispatcher<'a> {
    state: &'a mut LspServerState,
    notification: Option<lsp_server::Notification>,
}

impl<'a> NotificationDispatcher<'a> {
    pub fn new(state: &'a mut LspServerState, notification: lsp_server::Notification) -> Self {
        NotificationDispatcher {
            state,
            notification: Some(notification),
        }
    }

    /// Handler failures and malformed params are logged, never answered.
    pub fn on<N>(
        &mut self,
        handle_notification_fn: fn(&mut LspServerState, N::Params) -> Result<()>,
    ) -> &mut Self
    where
        N: lsp_types::notification::Notification + 'static,
        N::Params: DeserializeOwned + Send + 'static,
    {
        let Some(notification) = self.notification.take() else {
            return self;
        };
        let params = match notification.extract::<N::Params>(N::METHOD) {
            Ok(it) => it,
            Err(lsp_server::ExtractError::JsonError { method, error }) => {
                tracing::error!("invalid notification\nMethod: {method}\n error: {error}");
                return self;
            }
            Err(lsp_server::ExtractError::MethodMismatch(notification)) => {
                self.notification = Some(notification);
                return self;
            }
        };
        if let Err(err) = handle_notification_fn(self.state, params) {
            tracing::error!("{} failed: {:#}", N::METHOD, err);
        }
        self
    }

    pub fn finish(&mut self) {
        if let Some(notification) = &self.notification {
            if !notification.method.starts_with("$/") {
                tracing::error!("unhandled notification: {:?}", notification);
            }
        }
    }
}
