use crate::backend::api_client::{ApiError, DocumentApi};
use crate::compare::CompareRequest;
use crate::document::{ShareRequest, UploadRequest};
use crate::messages::{Listing, ResponseMessage};
use crate::session::Session;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::debug;

type WakeFn = Arc<dyn Fn() + Send + Sync>;

/// Runs API calls on background threads and reports each outcome as a
/// [`ResponseMessage`]. Every call gets its own thread; nothing is retried.
#[derive(Clone)]
pub struct ApiWorker {
    api: Arc<dyn DocumentApi>,
    sender: Sender<ResponseMessage>,
    waker: Option<WakeFn>,
}

impl ApiWorker {
    pub fn new(api: Arc<dyn DocumentApi>) -> (Self, Receiver<ResponseMessage>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                api,
                sender,
                waker: None,
            },
            receiver,
        )
    }

    /// Called after every delivered message, e.g. to repaint the UI
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn sender(&self) -> Sender<ResponseMessage> {
        self.sender.clone()
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn DocumentApi) -> ResponseMessage + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        let waker = self.waker.clone();

        thread::spawn(move || {
            let message = job(api.as_ref());
            // The receiving view may be gone by now; its response is simply dropped.
            if sender.send(message).is_err() {
                debug!("Response receiver dropped, discarding message");
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    pub fn login(&self, email: String, password: String) {
        self.spawn(move |api| {
            let result = api.login(&email, &password);
            ResponseMessage::LoggedIn { email, result }
        });
    }

    pub fn load_files(&self, session: &Session, listing: Listing) {
        let session = session.clone();
        self.spawn(move |api| {
            let result = match listing {
                Listing::Owned => api.list_files(&session),
                Listing::Shared => api.list_shared(&session),
            };
            ResponseMessage::FilesLoaded { listing, result }
        });
    }

    /// Execute a request issued by a [`crate::compare::VersionComparator`]
    pub fn run_compare(&self, session: &Session, request: CompareRequest) {
        let session = session.clone();
        match request {
            CompareRequest::LoadDocument { ticket, file_id } => self.spawn(move |api| {
                ResponseMessage::DocumentLoaded {
                    ticket,
                    file_id,
                    result: api.get_document(&session, file_id),
                }
            }),
            CompareRequest::FetchDiff { ticket, selection } => self.spawn(move |api| {
                ResponseMessage::DiffLoaded {
                    ticket,
                    result: api.compare(&session, selection),
                }
            }),
        }
    }

    pub fn upload(&self, session: &Session, request: UploadRequest) {
        let session = session.clone();
        self.spawn(move |api| ResponseMessage::Uploaded(api.upload(&session, &request)));
    }

    pub fn share(&self, session: &Session, request: ShareRequest) {
        let session = session.clone();
        self.spawn(move |api| ResponseMessage::Shared(api.share(&session, &request)));
    }

    /// Fetch one version and write it to `destination`
    pub fn download_to(
        &self,
        session: &Session,
        listing: Listing,
        virtual_path: String,
        revision: Option<u32>,
        destination: PathBuf,
    ) {
        let session = session.clone();
        self.spawn(move |api| {
            let result = api
                .download(&session, &virtual_path, revision)
                .and_then(|bytes| fs::write(&destination, bytes).map_err(ApiError::from))
                .map(|()| Some(destination));
            ResponseMessage::Downloaded { listing, result }
        });
    }
}
