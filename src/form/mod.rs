//! Interactive form variant: credential fields, a single trigger and an
//! append-only log panel. The run itself happens on a worker thread; only the
//! form thread touches the panel and the trigger.

pub mod worker;

use crate::adapters::connector_for;
use crate::config::Settings;
use crate::core::ConnectorFactory;
use crate::domain::model::{Engine, RunOutcome};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;
use tracing::Level;
pub use worker::{ChannelLogger, UiEvent};

/// Editable form values. Database fields belong to the selected engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub engine: Engine,
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl FormFields {
    /// Pre-filled from settings, first engine selected.
    pub fn prefilled(settings: &Settings) -> Self {
        let engine = Engine::ALL[0];
        let creds = settings.credentials(engine);
        Self {
            engine,
            host: creds.host.clone(),
            user: creds.user.clone(),
            password: creds.password.clone(),
            database: creds.database.clone(),
            supabase_url: settings.supabase_url.clone().unwrap_or_default(),
            supabase_key: settings.supabase_key.clone().unwrap_or_default(),
        }
    }

    /// The form values win over the defaults they were pre-filled from.
    pub fn apply_to(&self, base: &Settings) -> Settings {
        let mut settings = base.clone();
        let creds = settings.credentials_mut(self.engine);
        creds.host = self.host.trim().to_string();
        creds.user = self.user.clone();
        creds.password = self.password.clone();
        creds.database = self.database.trim().to_string();

        let non_empty = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        settings.supabase_url = non_empty(&self.supabase_url);
        settings.supabase_key = non_empty(&self.supabase_key);
        settings
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPanel {
    lines: Vec<String>,
}

impl LogPanel {
    pub fn append(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// The run button. Counts transitions so callers can check it was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    enabled: bool,
    disabled_count: usize,
    enabled_count: usize,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_count: 0,
            enabled_count: 0,
        }
    }
}

impl Trigger {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_count
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.disabled_count += 1;
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.enabled_count += 1;
    }
}

struct ActiveRun {
    events: Receiver<UiEvent>,
    worker: JoinHandle<()>,
}

pub struct SyncForm {
    pub fields: FormFields,
    settings: Settings,
    panel: LogPanel,
    trigger: Trigger,
    connectors: ConnectorFactory,
    active: Option<ActiveRun>,
    last_outcome: Option<RunOutcome>,
}

impl SyncForm {
    pub fn new(settings: Settings) -> Self {
        Self {
            fields: FormFields::prefilled(&settings),
            settings,
            panel: LogPanel::default(),
            trigger: Trigger::default(),
            connectors: connector_for,
            active: None,
            last_outcome: None,
        }
    }

    pub fn with_connector_factory(mut self, connectors: ConnectorFactory) -> Self {
        self.connectors = connectors;
        self
    }

    /// Switches the dropdown and reloads the database fields for that engine.
    pub fn select_engine(&mut self, engine: Engine) {
        let creds = self.settings.credentials(engine);
        self.fields.engine = engine;
        self.fields.host = creds.host.clone();
        self.fields.user = creds.user.clone();
        self.fields.password = creds.password.clone();
        self.fields.database = creds.database.clone();
    }

    pub fn panel(&self) -> &LogPanel {
        &self.panel
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    /// Starts a run unless one is already in flight. Returns whether it started.
    pub fn submit(&mut self) -> bool {
        if !self.trigger.is_enabled() {
            return false;
        }
        self.trigger.disable();
        self.last_outcome = None;

        let settings = self.fields.apply_to(&self.settings);
        let (tx, rx) = mpsc::channel();
        match worker::spawn_run(self.fields.engine, settings, self.connectors, tx) {
            Ok(handle) => {
                self.active = Some(ActiveRun {
                    events: rx,
                    worker: handle,
                });
                true
            }
            Err(e) => {
                self.panel.append(worker::format_line(
                    Level::ERROR,
                    &format!("Failed to start worker: {}", e),
                ));
                self.trigger.enable();
                false
            }
        }
    }

    /// Drains pending worker events without blocking. Returns `true` once the
    /// run has finished.
    pub fn pump(&mut self) -> bool {
        loop {
            let event = match &self.active {
                None => return true,
                Some(run) => match run.events.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Empty) => return false,
                    Err(TryRecvError::Disconnected) => UiEvent::Finished(None),
                },
            };
            if self.handle(event) {
                return true;
            }
        }
    }

    /// Blocks until the current run finishes, appending its lines as they arrive.
    pub fn wait(&mut self) -> Option<&RunOutcome> {
        loop {
            let event = match &self.active {
                None => break,
                Some(run) => run.events.recv().unwrap_or(UiEvent::Finished(None)),
            };
            if self.handle(event) {
                break;
            }
        }
        self.last_outcome.as_ref()
    }

    fn handle(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Log(line) => {
                self.panel.append(line);
                false
            }
            UiEvent::Finished(outcome) => {
                if let Some(run) = self.active.take() {
                    // 完成事件在 worker 結束前送出，這裡只等它收尾
                    let _ = run.worker.join();
                }
                match &outcome {
                    Some(outcome) => self
                        .panel
                        .append(worker::format_line(Level::INFO, &format!("Run {}", outcome))),
                    None => self.panel.append(worker::format_line(
                        Level::ERROR,
                        "Unexpected error: the sync worker stopped without a result",
                    )),
                }
                self.last_outcome = outcome;
                self.trigger.enable();
                true
            }
        }
    }
}
