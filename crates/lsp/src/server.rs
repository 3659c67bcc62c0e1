use crate::config::Config;
use crate::dispatcher::NotificationDispatcher;
use crate::dispatcher::RequestDispatcher;
use crate::document::Document;
use crate::handlers;
use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use lsp_types::notification::Notification;
use std::collections::HashMap;
use std::time::Instant;

pub(crate) struct LspServerState {
    pub config: Config,

    // Documents the client has opened, keyed by uri
    pub open_docs: HashMap<lsp_types::Uri, Document>,

    // Incoming requests with their method and arrival time. Nothing is sent to the client.
    pub req_queue: lsp_server::ReqQueue<(String, Instant), ()>,

    pub sender: Sender<lsp_server::Message>,

    pub shutdown_requested: bool,
}

impl LspServerState {
    pub fn new(sender: Sender<lsp_server::Message>, config: Config) -> Self {
        Self {
            config,
            open_docs: HashMap::new(),
            req_queue: lsp_server::ReqQueue::default(),
            sender,
            shutdown_requested: false,
        }
    }

    pub fn run(&mut self, receiver: Receiver<lsp_server::Message>) -> Result<()> {
        for message in &receiver {
            if let lsp_server::Message::Notification(notification) = &message {
                if notification.method == lsp_types::notification::Exit::METHOD {
                    return Ok(());
                }
            }
            self.handle_message(message);
        }
        Ok(())
    }

    fn handle_message(&mut self, message: lsp_server::Message) {
        tracing::debug!("handling message {:?}", message);
        let start_time = Instant::now();

        match message {
            lsp_server::Message::Request(req) => self.on_request(req, start_time),
            lsp_server::Message::Response(resp) => {
                tracing::warn!("ignoring response to a request never sent: {:?}", resp.id)
            }
            lsp_server::Message::Notification(notif) => self.on_notification(notif),
        }
    }

    fn on_request(&mut self, req: lsp_server::Request, start_time: Instant) {
        self.req_queue
            .incoming
            .register(req.id.clone(), (req.method.clone(), start_time));
        if self.shutdown_requested {
            self.respond(lsp_server::Response::new_err(
                req.id,
                lsp_server::ErrorCode::InvalidRequest as i32,
                "shutdown was requested".to_string(),
            ));
            return;
        }

        RequestDispatcher::new(self, req)
            .on_sync::<lsp_types::request::Shutdown>(|state, _request| {
                state.shutdown_requested = true;
                Ok(())
            })
            .on_sync::<lsp_types::request::Completion>(handlers::text_document::completion)
            .on_sync::<lsp_types::request::ResolveCompletionItem>(
                handlers::text_document::completion_resolve,
            )
            .finish();
    }

    fn on_notification(&mut self, notif: lsp_server::Notification) {
        NotificationDispatcher::new(self, notif)
            .on::<lsp_types::notification::DidOpenTextDocument>(handlers::text_document::did_open)
            .on::<lsp_types::notification::DidChangeTextDocument>(
                handlers::text_document::did_change,
            )
            .on::<lsp_types::notification::DidCloseTextDocument>(
                handlers::text_document::did_close,
            )
            .finish();
    }

    /// Answers a registered request and logs how long it took.
    pub(crate) fn respond(&mut self, response: lsp_server::Response) {
        if let Some((method, start)) = self.req_queue.incoming.complete(&response.id) {
            let duration = start.elapsed();
            tracing::info!("handled {} req#{} in {:?}", method, response.id, duration);
            self.send(response.into());
        }
    }

    pub(crate) fn send(&mut self, message: lsp_server::Message) {
        if let Err(err) = self.sender.send(message) {
            tracing::error!("error sending lsp message to the outgoing channel: {}", err);
        }
    }

    pub(crate) fn send_notification<N: lsp_types::notification::Notification>(
        &mut self,
        params: N::Params,
    ) {
        let not = lsp_server::Notification::new(N::METHOD.to_string(), params);
        self.send(not.into());
    }
}
