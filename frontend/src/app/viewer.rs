use crate::app::utils::load_slint_image;
use crate::MapWindow;
use anyhow::anyhow;
use image::DynamicImage;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

/// Lifecycle of the map window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Uninitialized,
    Initialized,
    WindowOpen,
    WaitingForEvent,
    Closed,
}

/// Input reaching the map window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The user asked to close the window
    Close,
    /// Anything else (key press, click); discarded
    Input,
}

#[derive(Debug)]
pub struct WindowSession {
    state: ViewerState,
    discarded: usize,
}

impl WindowSession {
    pub fn new() -> Self {
        Self {
            state: ViewerState::Uninitialized,
            discarded: 0,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Number of non-close events consumed while waiting
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn advance(&mut self, from: ViewerState, to: ViewerState) -> Result<(), anyhow::Error> {
        if self.state != from {
            return Err(anyhow!("viewer cannot move to {:?} from {:?}", to, self.state));
        }
        debug!("Viewer {:?} -> {:?}", self.state, to);
        self.state = to;
        Ok(())
    }

    pub fn initialize(&mut self) -> Result<(), anyhow::Error> {
        self.advance(ViewerState::Uninitialized, ViewerState::Initialized)
    }

    pub fn open(&mut self) -> Result<(), anyhow::Error> {
        self.advance(ViewerState::Initialized, ViewerState::WindowOpen)
    }

    pub fn begin_wait(&mut self) -> Result<(), anyhow::Error> {
        self.advance(ViewerState::WindowOpen, ViewerState::WaitingForEvent)
    }

    /// Feed one event; returns true once the session is closed
    pub fn handle(&mut self, event: ViewerEvent) -> bool {
        match (self.state, event) {
            (ViewerState::WaitingForEvent, ViewerEvent::Close) => {
                debug!("Viewer {:?} -> {:?}", self.state, ViewerState::Closed);
                self.state = ViewerState::Closed;
            }
            (ViewerState::WaitingForEvent, ViewerEvent::Input) => {
                self.discarded += 1;
                debug!("Discarding viewer input #{}", self.discarded);
            }
            (state, event) => {
                warn!("Ignoring {:?} while viewer is {:?}", event, state);
            }
        }
        self.state == ViewerState::Closed
    }
}

impl Default for WindowSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Window response for a close request, given whether the session closed
pub fn close_response(closed: bool) -> slint::CloseRequestResponse {
    if closed {
        slint::CloseRequestResponse::HideWindow
    } else {
        slint::CloseRequestResponse::KeepWindowShown
    }
}

/// Show the map file in a 600x450 window and block until the user closes it
pub fn show_map_in_window(path: &Path) -> Result<(), anyhow::Error> {
    let mut session = WindowSession::new();

    let window = MapWindow::new()?;
    session.initialize()?;

    window.show()?;
    session.open()?;

    let image = load_slint_image(path)?;
    let size = image.size();
    info!("Showing {:?} ({}x{})", path, size.width, size.height);
    window.set_map_image(image);

    session.begin_wait()?;
    let session = Rc::new(RefCell::new(session));

    {
        let session = session.clone();
        window.on_input_received(move || {
            session.borrow_mut().handle(ViewerEvent::Input);
        });
    }
    {
        let session = session.clone();
        window.window().on_close_requested(move || {
            let closed = session.borrow_mut().handle(ViewerEvent::Close);
            close_response(closed)
        });
    }

    slint::run_event_loop()?;

    let session = session.borrow();
    info!("Map window closed after {} discarded events", session.discarded());
    if session.state() != ViewerState::Closed {
        warn!("Event loop ended without a close request");
    }
    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.arg("/C").arg("start").arg("").arg(path);
        command
    }
    #[cfg(target_os = "macos")]
    {
        let mut command = Command::new("open");
        command.arg(path);
        command
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    }
}

fn preview_path() -> PathBuf {
    std::env::temp_dir().join(format!("toponym-map-{}.png", std::process::id()))
}

/// Hand an in-memory image to the system image viewer without waiting for it
pub fn show_image(img: &DynamicImage) -> Result<(), anyhow::Error> {
    let path = preview_path();
    img.save(&path)?;

    info!("Opening {:?} in the system image viewer", path);
    viewer_command(&path).spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting_session() -> WindowSession {
        let mut session = WindowSession::new();
        session.initialize().unwrap();
        session.open().unwrap();
        session.begin_wait().unwrap();
        session
    }

    #[test]
    fn test_lifecycle_order_is_enforced() {
        let mut session = WindowSession::new();
        assert_eq!(session.state(), ViewerState::Uninitialized);
        assert!(session.open().is_err());
        assert!(session.begin_wait().is_err());

        session.initialize().unwrap();
        assert!(session.initialize().is_err());
        session.open().unwrap();
        session.begin_wait().unwrap();
        assert_eq!(session.state(), ViewerState::WaitingForEvent);
    }

    // Feeds events the way the window callbacks do, stopping at the first close
    fn feed<I>(session: &mut WindowSession, events: I) -> Option<usize>
    where
        I: IntoIterator<Item = ViewerEvent>,
    {
        let mut consumed = 0;
        for event in events {
            consumed += 1;
            if session.handle(event) {
                return Some(consumed);
            }
        }
        None
    }

    #[test]
    fn test_close_ends_wait_immediately() {
        let mut session = waiting_session();
        assert!(session.handle(ViewerEvent::Close));
        assert_eq!(session.state(), ViewerState::Closed);
        assert_eq!(session.discarded(), 0);
    }

    #[test]
    fn test_inputs_then_close_stop_after_exactly_that_sequence() {
        for n in 0..5 {
            let mut session = waiting_session();
            let mut events: Vec<ViewerEvent> = vec![ViewerEvent::Input; n];
            events.push(ViewerEvent::Close);
            // Trailing events must never be consumed
            events.extend([ViewerEvent::Input, ViewerEvent::Close]);

            let mut iter = events.into_iter();
            assert_eq!(feed(&mut session, iter.by_ref()), Some(n + 1));
            assert_eq!(session.discarded(), n);
            assert_eq!(iter.count(), 2);
        }
    }

    #[test]
    fn test_input_never_closes() {
        let mut session = waiting_session();
        for _ in 0..3 {
            assert!(!session.handle(ViewerEvent::Input));
        }
        assert_eq!(session.state(), ViewerState::WaitingForEvent);
        assert_eq!(session.discarded(), 3);
    }

    #[test]
    fn test_close_response_follows_session() {
        let mut session = waiting_session();
        let response = close_response(session.handle(ViewerEvent::Input));
        assert!(matches!(response, slint::CloseRequestResponse::KeepWindowShown));

        let response = close_response(session.handle(ViewerEvent::Close));
        assert!(matches!(response, slint::CloseRequestResponse::HideWindow));
    }

    #[test]
    fn test_close_before_wait_keeps_window() {
        let mut session = WindowSession::new();
        session.initialize().unwrap();
        session.open().unwrap();
        let response = close_response(session.handle(ViewerEvent::Close));
        assert!(matches!(response, slint::CloseRequestResponse::KeepWindowShown));
    }

    #[test]
    fn test_events_before_wait_do_not_close() {
        let mut session = WindowSession::new();
        assert!(!session.handle(ViewerEvent::Close));
        assert_eq!(session.state(), ViewerState::Uninitialized);
    }

    #[test]
    fn test_preview_path_is_png_in_temp_dir() {
        let path = preview_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
    }
}
