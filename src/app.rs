use crate::backend::api_client::DocumentApi;
use crate::backend::worker::ApiWorker;
use crate::config::Config;
use crate::constant::{DEFAULT_WINDOW_TITLE, PENDING_REPAINT_MILLIS};
use crate::document::{Document, FileId};
use crate::messages::{Listing, ResponseMessage};
use crate::session::Session;
use crate::style::configure_style;
use crate::ui::compare::{CompareAction, CompareSlot};
use crate::ui::files::{FilesAction, FilesView};
use crate::ui::login::{LoginAction, LoginView};
use crate::ui::share::{ShareAction, ShareDialog};
use crate::ui::title_bar::{NavTarget, TitleBar, TitleBarAction, TitleBarState};
use crate::ui::upload::{UploadAction, UploadView};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Files(Listing),
    Upload,
    /// Returns to `back` when closed
    Compare { back: Listing },
}

pub struct DocShellApp {
    config: Config,
    session: Option<Session>,
    worker: ApiWorker,
    receiver: Receiver<ResponseMessage>,
    screen: Screen,
    login: LoginView,
    my_files: FilesView,
    shared_files: FilesView,
    upload: UploadView,
    /// Holds a view only while the compare screen is shown
    compare: CompareSlot,
    share: Option<ShareDialog>,
    downloads_in_flight: usize,
}

impl DocShellApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, api: Arc<dyn DocumentApi>) -> Self {
        configure_style(&cc.egui_ctx, config.settings.font_size);

        let ctx = cc.egui_ctx.clone();
        let (worker, receiver) = ApiWorker::new(api);
        let worker = worker.with_waker(move || ctx.request_repaint());

        Self {
            login: LoginView::with_email(config.settings.last_email.clone()),
            config,
            session: None,
            worker,
            receiver,
            screen: Screen::Login,
            my_files: FilesView::new(Listing::Owned),
            shared_files: FilesView::new(Listing::Shared),
            upload: UploadView::default(),
            compare: CompareSlot::default(),
            share: None,
            downloads_in_flight: 0,
        }
    }

    fn files_view_mut(&mut self, listing: Listing) -> &mut FilesView {
        match listing {
            Listing::Owned => &mut self.my_files,
            Listing::Shared => &mut self.shared_files,
        }
    }

    /// The listing whose screen is visible, or the one the compare screen returns to
    fn current_listing(&self) -> Listing {
        match self.screen {
            Screen::Files(listing) | Screen::Compare { back: listing } => listing,
            Screen::Login | Screen::Upload => Listing::Owned,
        }
    }

    fn show_screen(&mut self, screen: Screen) {
        if !matches!(screen, Screen::Compare { .. }) {
            self.compare.close();
        }
        self.screen = screen;

        if let Screen::Files(listing) = screen {
            self.refresh(listing);
        }
    }

    fn refresh(&mut self, listing: Listing) {
        let Some(session) = self.session.clone() else {
            return;
        };
        self.files_view_mut(listing).set_loading();
        self.worker.load_files(&session, listing);
    }

    fn open_compare(&mut self, file_id: FileId) {
        let Some(session) = &self.session else {
            return;
        };
        let back = self.current_listing();
        let request = self.compare.open(file_id);
        self.worker.run_compare(session, request);
        self.screen = Screen::Compare { back };
    }

    fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Logged out {}", session.email());
        }
        self.compare.close();
        self.share = None;
        self.my_files = FilesView::new(Listing::Owned);
        self.shared_files = FilesView::new(Listing::Shared);
        self.upload = UploadView::default();
        self.login = LoginView::with_email(self.config.settings.last_email.clone());
        self.screen = Screen::Login;
    }

    fn start_download(&mut self, ctx: &egui::Context, document: Document, revision: Option<u32>) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let worker = self.worker.clone();
        let sender = self.worker.sender();
        let directory = self.config.download_dir();
        let listing = self.current_listing();
        let ctx = ctx.clone();
        self.downloads_in_flight += 1;

        std::thread::spawn(move || {
            let destination = rfd::FileDialog::new()
                .set_directory(&directory)
                .set_file_name(&document.file_name)
                .save_file();
            match destination {
                Some(destination) => {
                    worker.download_to(
                        &session,
                        listing,
                        document.virtual_path,
                        revision,
                        destination,
                    )
                }
                None => {
                    let message = ResponseMessage::Downloaded {
                        listing,
                        result: Ok(None),
                    };
                    if sender.send(message).is_err() {
                        debug!("Response receiver dropped, discarding message");
                    }
                    ctx.request_repaint();
                }
            }
        });
    }

    fn pick_upload_file(&self, ctx: &egui::Context) {
        let sender = self.worker.sender();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let path = rfd::FileDialog::new().pick_file();
            if sender.send(ResponseMessage::UploadFilePicked(path)).is_err() {
                debug!("Response receiver dropped, discarding message");
            }
            ctx.request_repaint();
        });
    }

    fn handle_response(&mut self, message: ResponseMessage) {
        match message {
            ResponseMessage::LoggedIn { email, result } => match result {
                Ok(auth) => {
                    let session = Session::from_auth(auth, &email);
                    info!(user_id = ?session.user_id(), "Logged in as {}", session.email());
                    self.config.set_last_email(session.email());
                    self.session = Some(session);
                    self.login.on_success();
                    self.show_screen(Screen::Files(Listing::Owned));
                }
                Err(e) => {
                    warn!("Login failed for {}: {}", email, e);
                    self.login.on_failure();
                }
            },
            ResponseMessage::FilesLoaded { listing, result } => {
                if self.session.is_none() {
                    debug!("Discarding file listing received after logout");
                    return;
                }
                let view = self.files_view_mut(listing);
                match result {
                    Ok(files) => view.apply_files(files),
                    Err(e) => {
                        error!("Failed to load {:?} files: {}", listing, e);
                        view.apply_error();
                    }
                }
            }
            ResponseMessage::DocumentLoaded {
                ticket,
                file_id,
                result,
            } => {
                if let (Some(request), Some(session)) = (
                    self.compare.document_loaded(ticket, file_id, result),
                    &self.session,
                ) {
                    self.worker.run_compare(session, request);
                }
            }
            ResponseMessage::DiffLoaded { ticket, result } => {
                self.compare.diff_loaded(ticket, result);
            }
            ResponseMessage::Uploaded(result) => {
                match &result {
                    Ok(receipt) => info!("Uploaded version {}", receipt.version),
                    Err(e) => error!("Upload failed: {}", e),
                }
                self.upload.apply_result(&result);
            }
            ResponseMessage::Shared(result) => {
                if let Err(e) = &result {
                    error!("Share failed: {}", e);
                }
                let Some(dialog) = self.share.as_mut() else {
                    return;
                };
                if let Some(notice) = dialog.apply_result(result) {
                    self.share = None;
                    self.my_files.show_notice(notice);
                }
            }
            ResponseMessage::Downloaded { listing, result } => {
                self.downloads_in_flight = self.downloads_in_flight.saturating_sub(1);
                match &result {
                    Ok(Some(path)) => info!("Downloaded to {}", path.display()),
                    Ok(None) => debug!("Download cancelled"),
                    Err(e) => error!("Download failed: {}", e),
                }
                self.files_view_mut(listing).apply_download(&result);
            }
            ResponseMessage::UploadFilePicked(path) => {
                if let Some(path) = path {
                    self.upload.set_file(path);
                }
            }
        }
    }

    fn handle_files_action(&mut self, ctx: &egui::Context, action: FilesAction) {
        match action {
            FilesAction::Refresh => self.refresh(self.current_listing()),
            FilesAction::Download { document, revision } => {
                self.start_download(ctx, document, revision)
            }
            FilesAction::Compare(file_id) => self.open_compare(file_id),
            FilesAction::UploadNewVersion {
                virtual_path,
                file_name,
            } => {
                self.upload = UploadView::for_new_version(virtual_path, file_name);
                self.show_screen(Screen::Upload);
            }
            FilesAction::Share(document) => self.share = Some(ShareDialog::new(&document)),
        }
    }

    fn is_active(&self) -> bool {
        self.downloads_in_flight > 0
            || self.my_files.is_active()
            || self.shared_files.is_active()
            || self.compare.is_busy()
    }
}

impl eframe::App for DocShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_response(message);
        }

        let active = match self.screen {
            Screen::Files(listing) => Some(match listing {
                Listing::Owned => NavTarget::MyFiles,
                Listing::Shared => NavTarget::SharedWithMe,
            }),
            Screen::Upload => Some(NavTarget::Upload),
            Screen::Login | Screen::Compare { .. } => None,
        };

        let mut title_action = None;
        egui::TopBottomPanel::top("title_bar_panel").show(ctx, |ui| {
            title_action = TitleBar::show(
                ui,
                TitleBarState {
                    title: DEFAULT_WINDOW_TITLE,
                    user_email: self.session.as_ref().map(Session::email),
                    active,
                    busy: self.downloads_in_flight > 0,
                },
            );
        });
        match title_action {
            Some(TitleBarAction::Navigate(NavTarget::MyFiles)) => {
                self.show_screen(Screen::Files(Listing::Owned))
            }
            Some(TitleBarAction::Navigate(NavTarget::SharedWithMe)) => {
                self.show_screen(Screen::Files(Listing::Shared))
            }
            Some(TitleBarAction::Navigate(NavTarget::Upload)) => {
                if self.upload.is_new_version() {
                    self.upload = UploadView::default();
                }
                self.show_screen(Screen::Upload)
            }
            Some(TitleBarAction::Logout) => self.logout(),
            None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.screen {
            Screen::Login => {
                if let Some(LoginAction::Submit { email, password }) = self.login.show(ui) {
                    debug!("Submitting login for {}", email);
                    self.worker.login(email, password);
                }
            }
            Screen::Files(listing) => {
                if let Some(action) = self.files_view_mut(listing).show(ui) {
                    self.handle_files_action(ctx, action);
                }
            }
            Screen::Upload => match self.upload.show(ui) {
                Some(UploadAction::PickFile) => self.pick_upload_file(ctx),
                Some(UploadAction::Submit(request)) => {
                    if let Some(session) = &self.session {
                        info!("Uploading {} to {}", request.name, request.virtual_path);
                        self.worker.upload(session, request);
                    }
                }
                None => {}
            },
            Screen::Compare { back } => {
                let action = self.compare.view_mut().and_then(|c| c.show(ui));
                match action {
                    Some(CompareAction::Request(request)) => {
                        if let Some(session) = &self.session {
                            self.worker.run_compare(session, request);
                        }
                    }
                    Some(CompareAction::Back) => self.show_screen(Screen::Files(back)),
                    None => {}
                }
            }
        });

        if let Some(dialog) = self.share.as_mut() {
            match dialog.show(ctx) {
                Some(ShareAction::Submit(request)) => {
                    if let Some(session) = &self.session {
                        info!("Sharing file {} with {}", request.file_id, request.user_email);
                        self.worker.share(session, request);
                    }
                }
                Some(ShareAction::Cancel) => self.share = None,
                None => {}
            }
        }

        if self.is_active() {
            ctx.request_repaint_after(Duration::from_millis(PENDING_REPAINT_MILLIS));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.config.save() {
            error!("Failed to save settings on exit: {}", e);
        }
    }
}
