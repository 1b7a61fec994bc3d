// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based replay viewer
//!
//! Renders the current frame to the terminal using Unicode half-block
//! characters and maps key presses to playback operations.

use crate::config::Config;
use crate::playback::PlaybackController;
use crate::skeleton::overlay::OverlayStyle;
use crate::storage;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use tracing::{error, info};

/// Operations reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TrackAll,
    ThresholdUp,
    ThresholdDown,
    ToggleSmoothing,
    SmoothingUp,
    SmoothingDown,
    Next,
    Previous,
    First,
    Last,
    ToggleOrientation,
    ToggleView,
    Snapshot,
    ToggleHelp,
    Quit,
}

/// Key binding table
pub fn command_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    let command = match code {
        KeyCode::Char(' ') => Command::TrackAll,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::ThresholdUp,
        KeyCode::Char('-') => Command::ThresholdDown,
        KeyCode::Char('s') => Command::ToggleSmoothing,
        KeyCode::Right => Command::SmoothingUp,
        KeyCode::Left => Command::SmoothingDown,
        KeyCode::Char('k') => Command::Next,
        KeyCode::Char('j') => Command::Previous,
        KeyCode::Char('r') => Command::First,
        KeyCode::Char('t') => Command::Last,
        KeyCode::Char('o') => Command::ToggleOrientation,
        KeyCode::Char('v') => Command::ToggleView,
        KeyCode::Char('p') => Command::Snapshot,
        KeyCode::Char('h') => Command::ToggleHelp,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Which image is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Thresholded depth with joint markers
    Depth,
    /// Connections and head/hand circles on a blank canvas
    Skeleton,
}

/// Viewer state driven by [`Command`]s
pub struct Viewer {
    player: PlaybackController,
    style: OverlayStyle,
    view: View,
    image: Option<RgbImage>,
    message: String,
    show_help: bool,
    snapshot_dir: PathBuf,
    threshold_step: i32,
    smoothing_step: f32,
}

impl Viewer {
    pub fn new(player: PlaybackController, config: &Config) -> Self {
        let mut viewer = Self {
            player,
            style: OverlayStyle {
                point_size: config.point_size,
                connections: true,
            },
            view: View::Depth,
            image: None,
            message: String::new(),
            show_help: false,
            snapshot_dir: config
                .snapshot_dir
                .clone()
                .unwrap_or_else(storage::default_snapshot_dir),
            threshold_step: config.threshold_step,
            smoothing_step: config.smoothing_step,
        };
        viewer.refresh();
        viewer
    }

    pub fn player(&self) -> &PlaybackController {
        &self.player
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    /// Last message shown in place of the status line
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Apply a command; returns `false` when the viewer should close
    pub fn apply(&mut self, command: Command) -> bool {
        self.message.clear();
        match command {
            Command::TrackAll => {
                match self.player.track() {
                    Ok(report) if report.failures.is_empty() => {
                        self.message = format!(
                            "Tracked {} frames, {} with joints",
                            report.frames, report.with_joints
                        );
                    }
                    Ok(report) => {
                        self.message = format!(
                            "Tracked {} frames, {} failed (first: frame {})",
                            report.frames,
                            report.failures.len(),
                            report.failures[0].index + 1
                        );
                    }
                    Err(e) => {
                        error!("Tracking failed: {}", e);
                        self.message = format!("Error: {}", e);
                    }
                }
                self.player.first();
                self.refresh();
            }
            Command::ThresholdUp => {
                self.player.set_threshold_end(self.threshold_step);
                self.refresh();
            }
            Command::ThresholdDown => {
                self.player.set_threshold_end(-self.threshold_step);
                self.refresh();
            }
            Command::ToggleSmoothing => {
                self.player.toggle_smoothing();
            }
            Command::SmoothingUp => {
                self.player.adjust_smoothing_factor(self.smoothing_step);
            }
            Command::SmoothingDown => {
                self.player.adjust_smoothing_factor(-self.smoothing_step);
            }
            Command::Next => {
                if self.player.next() {
                    self.refresh();
                }
            }
            Command::Previous => {
                if self.player.previous() {
                    self.refresh();
                }
            }
            Command::First => {
                self.player.first();
                self.refresh();
            }
            Command::Last => {
                self.player.last();
                self.refresh();
            }
            Command::ToggleOrientation => {
                self.player.toggle_orientation();
                self.refresh();
            }
            Command::ToggleView => {
                self.view = match self.view {
                    View::Depth => View::Skeleton,
                    View::Skeleton => View::Depth,
                };
                self.refresh();
            }
            Command::Snapshot => self.snapshot(),
            Command::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            Command::Quit => return false,
        }
        true
    }

    fn refresh(&mut self) {
        self.image = match self.view {
            View::Depth => self.player.render_current(&self.style),
            View::Skeleton => self.player.render_skeleton_view(),
        };
    }

    fn snapshot(&mut self) {
        let Some(image) = self.image.as_ref() else {
            self.message = "Nothing to save".into();
            return;
        };
        match storage::save_snapshot(image, &self.snapshot_dir, self.player.frame_number()) {
            Ok(path) => self.message = format!("Saved: {}", path.display()),
            Err(e) => {
                error!("Failed to save snapshot: {}", e);
                self.message = format!("Error: {}", e);
            }
        }
    }

    /// Text for the bottom line
    pub fn status_line(&self) -> String {
        if self.show_help {
            HELP_TEXT.to_string()
        } else if !self.message.is_empty() {
            self.message.clone()
        } else {
            format!("{} | 'h' help | 'q' quit", self.player.status())
        }
    }
}

const HELP_TEXT: &str = "space: track | +/-: threshold | s: smoothing | Left/Right: smoothing level | \
k/j: next/prev | r/t: first/last | o: orientation | v: view | p: snapshot | q: quit";

/// Run the terminal replay viewer
pub fn run(player: PlaybackController, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, Viewer::new(player, config));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut viewer: Viewer,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(frames = viewer.player().len(), "Starting viewer");

    loop {
        let status = viewer.status_line();
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let image_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(
                ImageWidget {
                    image: viewer.image(),
                },
                image_area,
            );

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            f.render_widget(StatusBar { message: &status }, status_area);
        })?;

        // Nothing changes between key presses, so block on input
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = command_for_key(key.code, key.modifiers)
            && !viewer.apply(command)
        {
            break;
        }
    }

    Ok(())
}

/// Widget that renders an RGB image using half-block characters
struct ImageWidget<'a> {
    image: Option<&'a RgbImage>,
}

impl Widget for ImageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image.filter(|i| i.width() > 0 && i.height() > 0) else {
            let msg = "No frames loaded";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        // Each terminal cell displays 2 vertical pixels
        let aspect = image.width() as f64 / image.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height as f64) * 2.0;

        let (display_width, display_height) = if term_width / term_height > aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            ((h * aspect) as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            (w as u16, (w / aspect / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height as f64 * 2.0);

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(image, src_x, src_y_top));
                    cell.set_bg(sample_pixel(image, src_x, src_y_bottom));
                }
            }
        }
    }
}

fn sample_pixel(image: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::FrameSource;
    use crate::errors::FrameIoError;
    use crate::skeleton::tracker::CentroidTracker;
    use std::path::Path;

    struct OneFrame;

    impl FrameSource for OneFrame {
        fn list(&self) -> Result<Vec<PathBuf>, FrameIoError> {
            Ok(vec![PathBuf::from("a.raw"), PathBuf::from("b.raw")])
        }

        fn read(&self, _path: &Path) -> Result<Vec<u8>, FrameIoError> {
            Ok([1200u16; 64].iter().flat_map(|s| s.to_ne_bytes()).collect())
        }
    }

    fn viewer() -> Viewer {
        let config = Config {
            width: 8,
            height: 8,
            ..Config::default()
        };
        let mut player = PlaybackController::new(&config, 2)
            .unwrap()
            .with_tracker(Box::new(CentroidTracker::new()));
        player.load(&OneFrame).unwrap();
        Viewer::new(player, &config)
    }

    #[test]
    fn test_key_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(command_for_key(KeyCode::Char(' '), none), Some(Command::TrackAll));
        assert_eq!(command_for_key(KeyCode::Char('k'), none), Some(Command::Next));
        assert_eq!(command_for_key(KeyCode::Char('j'), none), Some(Command::Previous));
        assert_eq!(command_for_key(KeyCode::Left, none), Some(Command::SmoothingDown));
        assert_eq!(
            command_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(KeyCode::Char('x'), none), None);
    }

    #[test]
    fn test_track_then_navigate() {
        let mut viewer = viewer();
        assert!(viewer.image().is_some());
        assert!(viewer.apply(Command::Last));
        assert_eq!(viewer.player().cursor(), 1);

        assert!(viewer.apply(Command::TrackAll));
        assert_eq!(viewer.player().cursor(), 0);
        assert!(viewer.message().starts_with("Tracked 2 frames"));
        assert!(viewer.player().current_skeleton().is_some());

        assert!(viewer.apply(Command::Next));
        assert_eq!(viewer.player().frame_number(), 2);
        assert!(!viewer.apply(Command::Quit));
    }

    #[test]
    fn test_view_toggle_renders_skeleton() {
        let mut viewer = viewer();
        viewer.apply(Command::TrackAll);
        viewer.apply(Command::ToggleView);
        assert_eq!(viewer.view(), View::Skeleton);
        assert_eq!(viewer.image().unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn test_help_replaces_status() {
        let mut viewer = viewer();
        assert!(viewer.status_line().starts_with("Threshold: 8000"));
        viewer.apply(Command::ToggleHelp);
        assert!(viewer.status_line().starts_with("space: track"));
    }

    #[test]
    fn test_smoothing_keys() {
        let mut viewer = viewer();
        assert_eq!(
            command_for_key(KeyCode::Char('s'), KeyModifiers::NONE),
            Some(Command::ToggleSmoothing)
        );
        assert!(viewer.status_line().contains("Smoothing: No"));

        assert!(viewer.apply(Command::ToggleSmoothing));
        assert!(viewer.player().smoothing().enabled);
        assert!(viewer.status_line().contains("Smoothing: Yes"));

        viewer.apply(Command::SmoothingUp);
        assert!(viewer.status_line().contains("Level: 0.55"));

        viewer.apply(Command::ToggleSmoothing);
        assert!(!viewer.player().smoothing().enabled);
    }
}
