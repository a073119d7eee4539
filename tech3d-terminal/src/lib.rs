/// Terminal front end: keyboard controls and the render loop
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tech3d_core::{Axis, InputEvent, Nudge, Path, Scene, SceneConfig, Viewport};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Manual-path nudge sizes per key press
const ROTATE_STEP: f32 = 5.0;
const TRANSLATE_STEP: f32 = 0.1;
const SCALE_STEP: f32 = 0.05;
/// Slider step per key press
const SLIDER_STEP: f32 = 0.05;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Map a terminal size in cells to the viewport that fills it
pub fn viewport_for_terminal(width: u16, height: u16) -> Viewport {
    let aspect = width as f32 * CELL_ASPECT / height.max(1) as f32;
    Viewport::for_aspect(aspect)
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Input(InputEvent),
    CycleColorMode,
    CyclePath,
    AdjustSpacing(f32),
    AdjustDepth(f32),
    AdjustSpeed(f32),
}

/// Key bindings
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    let nudge = |n| Some(Command::Input(InputEvent::Nudge(n)));
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::Input(InputEvent::ToggleAnimation)),
        KeyCode::Char('r') => Some(Command::Input(InputEvent::Reset)),
        KeyCode::Char('1') => Some(Command::Input(InputEvent::SelectPath(Path::Forward))),
        KeyCode::Char('2') => Some(Command::Input(InputEvent::SelectPath(Path::Reverse))),
        KeyCode::Char('3') => Some(Command::Input(InputEvent::SelectPath(Path::Manual))),
        KeyCode::Char('p') => Some(Command::CyclePath),
        KeyCode::Char('x') => Some(Command::Input(InputEvent::SelectAxis(Axis::X))),
        KeyCode::Char('y') => Some(Command::Input(InputEvent::SelectAxis(Axis::Y))),
        KeyCode::Char('z') => Some(Command::Input(InputEvent::SelectAxis(Axis::Z))),
        KeyCode::Char('m') => Some(Command::CycleColorMode),
        KeyCode::Char('[') => Some(Command::AdjustSpacing(-SLIDER_STEP)),
        KeyCode::Char(']') => Some(Command::AdjustSpacing(SLIDER_STEP)),
        KeyCode::Char(';') => Some(Command::AdjustDepth(-SLIDER_STEP)),
        KeyCode::Char('\'') => Some(Command::AdjustDepth(SLIDER_STEP)),
        KeyCode::Char(',') => Some(Command::AdjustSpeed(-SLIDER_STEP * 2.0)),
        KeyCode::Char('.') => Some(Command::AdjustSpeed(SLIDER_STEP * 2.0)),
        KeyCode::Char('w') => nudge(Nudge::Rotate { axis: Axis::X, degrees: ROTATE_STEP }),
        KeyCode::Char('s') => nudge(Nudge::Rotate { axis: Axis::X, degrees: -ROTATE_STEP }),
        KeyCode::Char('a') => nudge(Nudge::Rotate { axis: Axis::Y, degrees: -ROTATE_STEP }),
        KeyCode::Char('d') => nudge(Nudge::Rotate { axis: Axis::Y, degrees: ROTATE_STEP }),
        KeyCode::Char('e') => nudge(Nudge::Rotate { axis: Axis::Z, degrees: ROTATE_STEP }),
        KeyCode::Up => nudge(Nudge::Translate { dx: 0.0, dy: TRANSLATE_STEP }),
        KeyCode::Down => nudge(Nudge::Translate { dx: 0.0, dy: -TRANSLATE_STEP }),
        KeyCode::Left => nudge(Nudge::Translate { dx: -TRANSLATE_STEP, dy: 0.0 }),
        KeyCode::Right => nudge(Nudge::Translate { dx: TRANSLATE_STEP, dy: 0.0 }),
        KeyCode::Char('+') | KeyCode::Char('=') => nudge(Nudge::Scale(SCALE_STEP)),
        KeyCode::Char('-') => nudge(Nudge::Scale(-SCALE_STEP)),
        KeyCode::Home => nudge(Nudge::SetTranslation { x: 0.0, y: 0.0 }),
        _ => None,
    }
}

/// Raw mode on the alternate screen for as long as it lives
struct Screen;

impl Screen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let screen = Screen;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(screen)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode()
            .and_then(|_| execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show))
        {
            log::error!("failed to restore the terminal: {}", e);
        }
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mut config: SceneConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        config.viewport = viewport_for_terminal(width, height);

        Ok(Self {
            scene: Scene::new(config),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        let _screen = Screen::enter()?;
        self.main_loop()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 60);

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
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
                if let Some(command) = command_for_key(code) {
                    self.apply(command);
                }
            }
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.scene.set_viewport(viewport_for_terminal(width, height));
            }
            _ => {}
        }
    }

    /// Turn a command into scene input, resolving relative adjustments
    pub fn apply(&mut self, command: Command) {
        let style = self.scene.style();
        let event = match command {
            Command::Quit => {
                self.running = false;
                return;
            }
            Command::Input(event) => event,
            Command::CycleColorMode => InputEvent::SetColorMode(style.color_mode.next()),
            Command::CyclePath => InputEvent::SelectPath(self.scene.sequence().path.next()),
            Command::AdjustSpacing(delta) => InputEvent::SetSpacing(style.letter_spacing + delta),
            Command::AdjustDepth(delta) => InputEvent::SetDepth(style.extrusion_depth + delta),
            Command::AdjustSpeed(delta) => InputEvent::SetSpeed(self.scene.speed() + delta),
        };
        self.scene.handle_input(event);
    }

    fn render(&mut self) -> io::Result<()> {
        let camera = self.scene.camera();
        let frame = self.scene.frame();
        let mvp = frame.mvp();

        self.renderer.clear(frame.clear_color);
        self.renderer.render_mesh(frame.mesh, &mvp, &camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status overlay
        let sequence = self.scene.sequence();
        let stage = sequence
            .current()
            .map(|s| format!("stage {} ({})", sequence.stage, s))
            .unwrap_or_else(|| "manual".to_string());
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "TECH3D | FPS {:.1} | {} path, {} | speed {:.2} | {} | SPACE=play R=reset 1-3/P=path M=colors Q=quit",
                self.fps,
                sequence.path,
                stage,
                self.scene.speed(),
                self.scene.style().color_mode,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
