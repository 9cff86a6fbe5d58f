//! Terminal front end for the wireframe viewer
//!
//! Runs the cooperative main loop: drain pending keyboard input (the control
//! surface), then let the frame scheduler decide whether a frame is due.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wf3d_core::control::cycle_model;
use wf3d_core::{
    Canvas, Color, Command, FontSize, FrameScheduler, MeshStore, Pipeline, Registry, Settings,
};

pub mod cli;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Scale change per key press
const SCALE_STEP: f32 = 0.1;

/// Idle time per loop iteration
const LOOP_SLEEP: Duration = Duration::from_millis(1);

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Step through the model list by this many entries
    Cycle(isize),
    Command(Command),
}

/// Map a key to an action, given the current scale
pub fn key_action(code: KeyCode, scale: f32) -> Option<Action> {
    let set_scale = |scale: f32| {
        Action::Command(Command::SetDisplay {
            text: None,
            scale: Some(scale),
        })
    };
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('n') | KeyCode::Tab | KeyCode::Right => Some(Action::Cycle(1)),
        KeyCode::Char('p') | KeyCode::BackTab | KeyCode::Left => Some(Action::Cycle(-1)),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(set_scale(scale + SCALE_STEP)),
        KeyCode::Char('-') | KeyCode::Down => Some(set_scale(scale - SCALE_STEP)),
        KeyCode::Char('r') => Some(Action::Command(Command::Reload)),
        _ => None,
    }
}

/// Main application struct for terminal wireframe rendering
pub struct TerminalApp {
    registry: Registry,
    store: Box<dyn MeshStore>,
    pipeline: Pipeline,
    scheduler: FrameScheduler,
    renderer: AsciiRenderer,
    running: bool,
    /// Last control-surface failure, shown until the next successful command
    last_error: Option<String>,
}

impl TerminalApp {
    pub fn new(registry: Registry, store: Box<dyn MeshStore>, settings: &Settings) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(
            registry,
            store,
            settings,
            width as usize,
            height as usize,
        ))
    }

    /// Build the app for a terminal of `cols` x `rows` cells
    pub fn with_size(
        registry: Registry,
        store: Box<dyn MeshStore>,
        settings: &Settings,
        cols: usize,
        rows: usize,
    ) -> Self {
        Self {
            registry,
            store,
            pipeline: Pipeline::new(&settings.render),
            scheduler: FrameScheduler::new(&settings.scheduler),
            renderer: AsciiRenderer::new(cols, rows),
            running: true,
            last_error: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        log::info!("rendered {} frames", self.scheduler.frames());
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            // Service all pending input before considering a frame
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            let rendered = self.scheduler.tick(
                Instant::now(),
                &mut self.registry,
                &mut self.pipeline,
                &mut self.renderer,
                &mut std::thread::yield_now,
            );
            if rendered.is_some() {
                self.present()?;
            }

            std::thread::sleep(LOOP_SLEEP);
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Some(action) = key_action(code, self.registry.display().scale) {
                    self.perform(action);
                }
            }
            Event::Resize(cols, rows) => self.renderer.resize(cols as usize, rows as usize),
            _ => {}
        }
    }

    /// Apply one action between frames
    pub fn perform(&mut self, action: Action) {
        let command = match action {
            Action::Quit => {
                self.running = false;
                return;
            }
            Action::Cycle(offset) => {
                match cycle_model(&self.registry, self.store.as_ref(), offset) {
                    Some(model) => Command::Select {
                        model,
                        text: None,
                        scale: None,
                    },
                    None => return,
                }
            }
            Action::Command(command) => command,
        };

        match self.registry.apply(self.store.as_ref(), command) {
            Ok(()) => self.last_error = None,
            Err(e) => self.last_error = Some(format!("Load failed: {e}")),
        }
    }

    fn present(&mut self) -> io::Result<()> {
        if let Some(message) = &self.last_error {
            self.renderer
                .draw_text(6, 22, message, FontSize::Small, Color::Status);
        }

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;
        stdout.flush()
    }
}
