//! Scripted driver implementing the Driver trait.
//!
//! `ScriptedDriver` stands in for the terminal. It replays a fixed script of
//! input events and records every render, so the production
//! [`keeper_app::Runtime`] can run unchanged in tests. Gateway completions
//! still arrive through the runtime's bridge; a script waits for them with
//! [`ScriptedDriver::wait_until`].

use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use keeper_app::{App, AppEvent, Driver, KeyInput};

/// Pause between checks of an unmet wait.
const WAIT_POLL: Duration = Duration::from_millis(1);

/// Checks before an unmet wait fails the run.
const WAIT_LIMIT: u32 = 5_000;

/// Error type for the scripted driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError(pub String);

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script error: {}", self.0)
    }
}

impl std::error::Error for ScriptError {}

type Condition = Box<dyn Fn(&App) -> bool + Send>;

enum Step {
    Event(AppEvent),
    WaitUntil { label: String, condition: Condition },
}

/// Renders observed so far.
#[derive(Default)]
struct Recorded {
    renders: usize,
    last: Option<App>,
    stopped: bool,
}

/// Inspection handle for a [`ScriptedDriver`] that has been moved into a
/// runtime.
#[derive(Clone)]
pub struct ScriptHandle {
    recorded: Arc<Mutex<Recorded>>,
}

impl ScriptHandle {
    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        lock(&self.recorded).renders
    }

    /// App state at the latest render.
    pub fn last_render(&self) -> Option<App> {
        lock(&self.recorded).last.clone()
    }

    /// Whether the runtime released the driver.
    pub fn stopped(&self) -> bool {
        lock(&self.recorded).stopped
    }
}

/// Driver that replays a script.
///
/// When the script runs out the driver sends Ctrl+C so the runtime exits.
pub struct ScriptedDriver {
    steps: VecDeque<Step>,
    waited: u32,
    recorded: Arc<Mutex<Recorded>>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDriver {
    /// Create a driver with an empty script.
    pub fn new() -> Self {
        Self { steps: VecDeque::new(), waited: 0, recorded: Arc::new(Mutex::new(Recorded::default())) }
    }

    /// Append an event.
    #[must_use]
    pub fn event(mut self, event: AppEvent) -> Self {
        self.steps.push_back(Step::Event(event));
        self
    }

    /// Append a key press.
    #[must_use]
    pub fn key(self, key: KeyInput) -> Self {
        self.event(AppEvent::Key(key))
    }

    /// Append one key press per character of `text`.
    #[must_use]
    pub fn type_text(self, text: &str) -> Self {
        text.chars().fold(self, |driver, ch| driver.key(KeyInput::Char(ch)))
    }

    /// Append a navigation.
    #[must_use]
    pub fn navigate(self, location: &str) -> Self {
        self.event(AppEvent::Navigate { location: location.to_string() })
    }

    /// Hold the script until the latest render satisfies `condition`.
    #[must_use]
    pub fn wait_until(
        mut self,
        label: &str,
        condition: impl Fn(&App) -> bool + Send + 'static,
    ) -> Self {
        self.steps
            .push_back(Step::WaitUntil { label: label.to_string(), condition: Box::new(condition) });
        self
    }

    /// Handle for inspecting renders after the driver is moved.
    pub fn handle(&self) -> ScriptHandle {
        ScriptHandle { recorded: Arc::clone(&self.recorded) }
    }

    /// Whether a wait at the front of the script is satisfied. Events count
    /// as ready.
    fn front_ready(&self) -> Result<bool, ScriptError> {
        let Some(Step::WaitUntil { label, condition }) = self.steps.front() else {
            return Ok(true);
        };
        let recorded = lock(&self.recorded);
        if recorded.last.as_ref().is_some_and(|app| condition(app)) {
            return Ok(true);
        }
        if self.waited >= WAIT_LIMIT {
            return Err(ScriptError(format!("gave up waiting for {label}")));
        }
        Ok(false)
    }
}

impl Driver for ScriptedDriver {
    type Error = ScriptError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if !self.front_ready()? {
            self.waited += 1;
            tokio::time::sleep(WAIT_POLL).await;
            return Ok(None);
        }

        self.waited = 0;
        match self.steps.pop_front() {
            Some(Step::Event(event)) => Ok(Some(event)),
            Some(Step::WaitUntil { .. }) => Ok(None),
            None => Ok(Some(AppEvent::Key(KeyInput::Interrupt))),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let mut recorded = lock(&self.recorded);
        recorded.renders += 1;
        recorded.last = Some(app.clone());
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.recorded).stopped = true;
    }
}

fn lock(recorded: &Mutex<Recorded>) -> MutexGuard<'_, Recorded> {
    recorded.lock().unwrap_or_else(PoisonError::into_inner)
}
