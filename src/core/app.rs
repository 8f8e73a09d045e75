use crate::api::ConfigApi;
use crate::core::action_bindings::ActionBindings;
use crate::core::event::Action;
use crate::core::event_queue::{AppEvent, EventQueue};
use crate::core::reducer::{Effect, Reducer};
use crate::core::state::AppState;
use crate::input::Input;
use crate::task::{TaskExecutor, TaskRequest};
use crate::terminal::{KeyEvent, Terminal, TerminalSize};
use crate::ui::renderer::{RenderFrame, Renderer};
use crate::ui::theme::Theme;
use crate::ui::view::View;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const ERROR_TIMEOUT: Duration = Duration::from_secs(2);

pub struct App {
    pub state: AppState,
    renderer: Renderer,
    action_bindings: ActionBindings,
    event_queue: EventQueue,
    executor: TaskExecutor,
    theme: Theme,
    in_flight: usize,
    error_timeout: Duration,
}

impl App {
    pub fn new(api: Arc<dyn ConfigApi>) -> Self {
        Self {
            state: AppState::new(),
            renderer: Renderer::new(),
            action_bindings: ActionBindings::new(),
            event_queue: EventQueue::new(),
            executor: TaskExecutor::new(api),
            theme: Theme::default_theme(),
            in_flight: 0,
            error_timeout: ERROR_TIMEOUT,
        }
    }

    pub fn with_error_timeout(mut self, error_timeout: Duration) -> Self {
        self.error_timeout = error_timeout;
        self
    }

    /// Fills the key input and submits it as if the user pressed Enter.
    pub fn submit_api_key(&mut self, raw: &str) {
        self.state.key_input.set_value(raw.to_string());
        self.event_queue.push(AppEvent::Action(Action::Submit));
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        self.event_queue.push(AppEvent::Key(key_event));
    }

    /// Collects finished tasks and processes every ready event.
    pub fn tick(&mut self) -> bool {
        for completion in self.executor.drain_ready() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.event_queue
                .push(AppEvent::Action(Action::TaskCompleted(completion)));
        }

        let mut processed_any = false;
        loop {
            let now = Instant::now();
            let Some(event) = self.event_queue.pop_ready(now) else {
                break;
            };
            self.dispatch_event(event);
            processed_any = true;
        }
        processed_any
    }

    /// Ticks until no task is in flight or `timeout` elapses.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.tick();
            if self.in_flight == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    pub fn frame(&mut self, size: TerminalSize) -> RenderFrame {
        let view = View::build(&self.state, &self.theme);
        self.renderer.render(&view, &self.theme, size)
    }

    pub fn render(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        let frame = self.frame(terminal.size());
        terminal.render_frame(&frame)
    }

    pub fn should_exit(&self) -> bool {
        self.state.should_exit
    }

    fn dispatch_event(&mut self, event: AppEvent) {
        let action = match event {
            AppEvent::Key(key_event) => {
                let mode = self.state.input_mode();
                match self.action_bindings.handle_key(mode, &key_event) {
                    Some(action) => action,
                    None => return,
                }
            }
            AppEvent::Action(action) => action,
        };
        let effects = Reducer::reduce(&mut self.state, action, self.error_timeout);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ClearErrorAfter(id, delay) => {
                    self.event_queue.schedule_error_clear(id, delay)
                }
                Effect::CancelClearError(id) => self.event_queue.cancel_error_clear(&id),
                Effect::Spawn(request) => self.spawn(request),
            }
        }
    }

    fn spawn(&mut self, request: TaskRequest) {
        self.in_flight += 1;
        self.executor.spawn(request);
    }
}
