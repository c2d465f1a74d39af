use crate::api::AnalyticsApi;
use crate::config::Config;
use crate::event::{self, InputKey};
use crate::feeds::{FeedData, FeedMessage, Issued, RequestId, RequestSeq, Ticket};
use crate::ui::{
    self,
    widgets::{self, Action, Navigation, PageView, Route},
};
use anyhow::Result;
use ratatui::DefaultTerminal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Navigation shell state: the mounted page and the fetches it owns.
pub struct App {
    config: Config,
    api: Arc<dyn AnalyticsApi>,
    view: Box<dyn PageView>,
    /// Generation of the mounted page; bumped on every navigation
    mount: u64,
    seq: RequestSeq,
    tasks: HashMap<RequestId, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<FeedMessage>,
    rx: mpsc::UnboundedReceiver<FeedMessage>,
    should_quit: bool,
}

impl App {
    /// Create the app and mount the start page. Must run inside a tokio
    /// runtime since mounting spawns the page's fetches.
    pub fn new(config: Config, api: Arc<dyn AnalyticsApi>, start: Navigation) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let view = widgets::mount(Navigation::to(start.route), &config);

        let mut app = Self {
            config,
            api,
            view,
            mount: 0,
            seq: RequestSeq::new(),
            tasks: HashMap::new(),
            tx,
            rx,
            should_quit: false,
        };
        app.navigate(start);
        app
    }

    pub fn view(&self) -> &dyn PageView {
        self.view.as_ref()
    }

    pub fn route(&self) -> Route {
        self.view.route()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Tear down the current page and mount a fresh one.
    ///
    /// Fetches owned by the old page are aborted and the generation bump
    /// makes any result already in the channel stale.
    pub fn navigate(&mut self, nav: Navigation) {
        self.cancel_all();
        self.mount += 1;
        tracing::info!("Navigating to {} (mount {})", nav.route.title(), self.mount);

        self.view = widgets::mount(nav, &self.config);
        let issued = self.view.on_mount(&mut self.seq);
        self.spawn_all(issued);
    }

    pub fn handle_key(&mut self, key: InputKey) {
        match key {
            InputKey::CharCtrl('c') => self.should_quit = true,
            InputKey::Char('q') if !self.view.captures_text() => self.should_quit = true,
            InputKey::Tab => self.navigate(Navigation::to(self.route().next())),
            InputKey::BackTab => self.navigate(Navigation::to(self.route().prev())),
            InputKey::F(n @ 1..=3) => {
                let route = Route::ALL[(n - 1) as usize];
                if route != self.route() {
                    self.navigate(Navigation::to(route));
                }
            }
            key => match self.view.handle_key(key, &mut self.seq) {
                Some(Action::Fetch(issued)) => self.spawn_all(issued),
                Some(Action::Navigate(nav)) => self.navigate(nav),
                None => {}
            },
        }
    }

    /// Route a fetch result to the mounted page, dropping results for
    /// pages that have since been torn down.
    pub fn handle_feed_message(&mut self, message: FeedMessage) {
        let FeedMessage { ticket, data } = message;

        if ticket.mount != self.mount {
            tracing::debug!(
                "Dropping response {} for unmounted view (mount {}, current {})",
                ticket.request,
                ticket.mount,
                self.mount
            );
            return;
        }

        self.tasks.remove(&ticket.request);
        self.view.update_data(ticket.request, data);
    }

    /// Apply every result that has already arrived.
    pub fn drain_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle_feed_message(message);
            handled += 1;
        }
        handled
    }

    /// Wait for the next fetch result without applying it.
    pub async fn next_message(&mut self) -> Option<FeedMessage> {
        self.rx.recv().await
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            self.drain_messages();
            terminal.draw(|frame| ui::render(frame, self))?;

            if let Some(key) = event::poll()? {
                self.handle_key(key);
            }
            tokio::task::yield_now().await;
        }

        tracing::info!("Shutting down");
        self.cancel_all();
        Ok(())
    }

    fn spawn_all(&mut self, issued: Vec<Issued>) {
        for request in issued {
            self.spawn(request);
        }
    }

    fn spawn(&mut self, issued: Issued) {
        if let Some(old) = issued.supersedes.and_then(|id| self.tasks.remove(&id)) {
            tracing::debug!("Aborting superseded request {:?}", issued.supersedes);
            old.abort();
        }

        let ticket = Ticket {
            mount: self.mount,
            request: issued.id,
        };
        tracing::debug!("Request {} -> {:?}", issued.id, issued.request);

        let fetcher = issued.request.into_fetcher(self.api.clone());
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let data = match fetcher.fetch().await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Request {} failed: {:#}", ticket.request, e);
                    FeedData::Error(e.to_string())
                }
            };
            // The receiver only goes away at shutdown
            let _ = tx.send(FeedMessage { ticket, data });
        });
        self.tasks.insert(issued.id, handle);
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
