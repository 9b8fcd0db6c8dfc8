use crate::runtime::effect::Effect;
use crate::runtime::executor::RequestExecutor;
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::renderer::Renderer;
use crate::widgets::geo_list::GeoListWidget;
use crate::widgets::traits::Interactive;
use std::io;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The widget and its request executor, without a terminal attached.
pub struct Session {
    widget: GeoListWidget,
    executor: RequestExecutor,
    should_exit: bool,
}

impl Session {
    pub fn new(widget: GeoListWidget, executor: RequestExecutor) -> Self {
        Self {
            widget,
            executor,
            should_exit: false,
        }
    }

    pub fn widget(&self) -> &GeoListWidget {
        &self.widget
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Returns true when the screen needs redrawing.
    pub fn handle_event(&mut self, event: TerminalEvent) -> bool {
        let effects = match event {
            TerminalEvent::Key(key) => self.widget.on_key(key),
            TerminalEvent::Mouse(mouse) => self.widget.on_mouse(mouse),
            TerminalEvent::Resize(_) => vec![Effect::RequestRender],
            TerminalEvent::Tick => Vec::new(),
        };
        self.apply_effects(effects)
    }

    /// Feeds finished requests back into the widget.
    pub fn pump_completions(&mut self) -> bool {
        let mut render_requested = false;
        for completion in self.executor.drain_ready() {
            let effects = self.widget.apply_completion(completion);
            render_requested |= self.apply_effects(effects);
        }
        render_requested
    }

    /// Blocks for one completion.
    #[cfg(test)]
    pub fn wait_for_completion(&mut self) -> bool {
        match self.executor.recv() {
            Some(completion) => {
                let effects = self.widget.apply_completion(completion);
                self.apply_effects(effects);
                true
            }
            None => false,
        }
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) -> bool {
        let mut render_requested = false;
        for effect in effects {
            match effect {
                Effect::Request(request) => self.executor.spawn(request),
                Effect::RequestRender => render_requested = true,
                Effect::Exit => self.should_exit = true,
            }
        }
        render_requested
    }
}

pub struct Runtime {
    session: Session,
    terminal: Terminal,
}

impl Runtime {
    pub fn new(session: Session, terminal: Terminal) -> Self {
        Self { session, terminal }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.terminal.enter()?;
        tracing::info!("terminal session started");

        let run_result = (|| -> io::Result<()> {
            self.render()?;

            while !self.session.should_exit() {
                let event = self.terminal.poll_event(POLL_INTERVAL)?;
                if let TerminalEvent::Resize(size) = event {
                    self.terminal.set_size(size);
                }

                let mut render_requested = self.session.handle_event(event);
                render_requested |= self.session.pump_completions();
                if render_requested {
                    self.render()?;
                }
            }

            Ok(())
        })();

        let exit_result = self.terminal.exit();
        tracing::info!(
            selected = self.session.widget().store().visible_len(),
            "terminal session ended"
        );
        run_result.and(exit_result)
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = Renderer::render(self.session.widget(), self.terminal.size());
        self.terminal.render_frame(&frame)
    }
}
