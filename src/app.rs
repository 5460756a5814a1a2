use crate::cache::KvStore;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::jokes::cache::JokeCache;
use crate::jokes::client::JokeClient;
use crate::jokes::service::{JokeService, ListSnapshot, ServiceEvent};
use crate::net::{Connectivity, StaticProbe, TcpProbe};
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a status-bar notice stays up before the key hints return
const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
  /// Latest state snapshot from the joke service
  snapshot: ListSnapshot,

  /// Selected row in the joke list
  selected: usize,

  /// Transient status-bar notice and its expiry
  notice: Option<(String, Instant)>,

  /// Application configuration
  config: Config,

  /// The joke service; the app never mutates joke state directly
  service: JokeService,

  /// Service events, wired into the main loop by `run`
  service_rx: Option<mpsc::UnboundedReceiver<ServiceEvent>>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub async fn new(config: Config) -> Result<Self> {
    let store = match config.cache.path.as_deref() {
      Some(path) => KvStore::open_at(path)?,
      None => KvStore::open()?,
    };
    let cache = JokeCache::new(Arc::new(store));

    let client = JokeClient::new(config.api.endpoint()?, config.api.timeout())?;

    let connectivity: Arc<dyn Connectivity> = if config.offline {
      Arc::new(StaticProbe(false))
    } else {
      Arc::new(TcpProbe::default())
    };

    let (service_tx, service_rx) = mpsc::unbounded_channel();
    let service = JokeService::new(
      client,
      cache,
      connectivity,
      config.cache.max_jokes,
      service_tx,
    );

    Ok(Self {
      snapshot: ListSnapshot::default(),
      selected: 0,
      notice: None,
      config,
      service,
      service_rx: Some(service_rx),
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));

    // Service events feed the same loop as key presses and ticks
    if let Some(mut service_rx) = self.service_rx.take() {
      let tx = events.sender();
      tokio::spawn(async move {
        while let Some(ev) = service_rx.recv().await {
          if tx.send(Event::Service(ev)).is_err() {
            break;
          }
        }
      });
    }

    // Seed the list from the cache and probe connectivity once
    let service = self.service.clone();
    tokio::spawn(async move {
      service.initialize().await;
    });

    // Main loop
    while !self.should_quit {
      // Draw UI
      terminal.draw(|frame| ui::draw(frame, self))?;

      // Handle events
      if let Some(event) = events.next().await {
        self.handle_event(event)?;
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.expire_notice(),
      Event::Service(service_event) => self.handle_service_event(service_event),
    }
    Ok(())
  }

  fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
    match key.code {
      // Quit
      KeyCode::Char('q') => {
        self.should_quit = true;
      }
      KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.should_quit = true;
      }

      // Navigation
      KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
      KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),

      // Operations
      KeyCode::Char('f') | KeyCode::Char(' ') => self.fetch_joke(),
      KeyCode::Char('d') => self.delete_selected(),
      KeyCode::Char('r') => self.recheck_connectivity(),

      _ => {}
    }
  }

  fn handle_service_event(&mut self, event: ServiceEvent) {
    match event {
      ServiceEvent::State(snapshot) => {
        self.snapshot = snapshot;
        self.clamp_selection();
      }
      ServiceEvent::Notice(text) => {
        self.notice = Some((text, Instant::now() + NOTICE_TTL));
      }
    }
  }

  fn fetch_joke(&self) {
    let service = self.service.clone();
    tokio::spawn(async move {
      service.fetch_joke().await;
    });
  }

  /// Ask the service to delete the selected row. Out-of-range indexes (an
  /// empty list, or a fetch landing first) come back as a notice.
  fn delete_selected(&self) {
    let service = self.service.clone();
    let index = self.selected;
    tokio::spawn(async move {
      service.delete_joke(index).await;
    });
  }

  fn recheck_connectivity(&self) {
    let service = self.service.clone();
    tokio::spawn(async move {
      service.check_connectivity().await;
    });
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.snapshot.jokes.len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn clamp_selection(&mut self) {
    let len = self.snapshot.jokes.len();
    if len == 0 {
      self.selected = 0;
    } else if self.selected >= len {
      self.selected = len - 1;
    }
  }

  fn expire_notice(&mut self) {
    if let Some((_, expires_at)) = &self.notice {
      if Instant::now() >= *expires_at {
        self.notice = None;
      }
    }
  }

  // Accessors for UI rendering
  pub fn snapshot(&self) -> &ListSnapshot {
    &self.snapshot
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn notice(&self) -> Option<&str> {
    self.notice.as_ref().map(|(text, _)| text.as_str())
  }

  pub fn api_url(&self) -> &str {
    &self.config.api.url
  }

  pub fn max_jokes(&self) -> usize {
    self.service.max_jokes()
  }
}
