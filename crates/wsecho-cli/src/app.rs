//! Interactive event loop.
//!
//! One `tokio::select!` loop owns the session manager and multiplexes three
//! sources: key actions from a blocking crossterm reader thread, terminal
//! resizes, and socket lifecycle events. The screen is redrawn after every
//! event.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wsecho_client::{Connector, EventReceiver, SessionManager, SocketEventKind, WsConnector};

use crate::input::{map_key, Action};
use crate::terminal::{self as term, TerminalGuard};
use crate::view::{draw, View};

/// How often the reader thread checks whether the UI has gone away.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long to wait for the held socket to finish closing on quit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Input the loop reacts to, besides socket events.
enum UiEvent {
    Key(Action),
    Resize(u16, u16),
}

/// Run the full-screen client against `endpoint` until the user quits.
pub async fn run(endpoint: String, connect_now: bool) -> Result<()> {
    let (mut session, mut socket_events) = SessionManager::new(WsConnector::new(), endpoint);
    info!(endpoint = %session.endpoint(), "starting UI");

    let _guard = TerminalGuard::enter().context("failed to set up terminal")?;

    let (tx_ui, mut rx_ui) = mpsc::channel::<UiEvent>(64);
    let input_handle = tokio::task::spawn_blocking(move || read_terminal_events(tx_ui));

    if connect_now {
        session.toggle_connection();
    }

    let mut size = term::get_terminal_size();
    let mut stdout = io::stdout();
    redraw(&mut stdout, &session, size)?;

    loop {
        tokio::select! {
            ui = rx_ui.recv() => match ui {
                Some(UiEvent::Key(Action::Quit)) | None => {
                    info!("quit requested");
                    break;
                }
                Some(UiEvent::Key(action)) => apply(&mut session, action),
                Some(UiEvent::Resize(cols, rows)) => {
                    debug!(cols, rows, "terminal resized");
                    size = (cols, rows);
                }
            },
            Some(event) = socket_events.recv() => session.handle_event(event),
        }
        redraw(&mut stdout, &session, size)?;
    }

    drop(rx_ui);
    close_gracefully(&mut session, &mut socket_events).await;
    if let Err(e) = input_handle.await {
        warn!("input thread failed: {e}");
    }
    Ok(())
}

/// Apply one key action to the session.
fn apply<C: Connector>(session: &mut SessionManager<C>, action: Action) {
    match action {
        Action::Toggle => session.toggle_connection(),
        Action::Submit => {
            session.submit();
        }
        Action::Insert(c) if session.is_connected() => session.push_char(c),
        Action::Backspace if session.is_connected() => {
            session.pop_char();
        }
        // The input field is hidden while not connected.
        Action::Insert(_) | Action::Backspace => {}
        Action::Quit => session.shutdown(),
    }
}

fn redraw<C: Connector>(
    out: &mut impl io::Write,
    session: &SessionManager<C>,
    (cols, rows): (u16, u16),
) -> Result<()> {
    let screen = View::of(session).render(cols, rows);
    draw(out, &screen).context("failed to draw screen")
}

/// Close the held socket and give it a moment to finish the handshake.
async fn close_gracefully<C: Connector>(
    session: &mut SessionManager<C>,
    events: &mut EventReceiver,
) {
    let Some(id) = session.socket_id() else {
        return;
    };
    session.shutdown();

    let wait = async {
        while let Some(event) = events.recv().await {
            if event.socket == id
                && matches!(
                    event.kind,
                    SocketEventKind::Close | SocketEventKind::Error(_)
                )
            {
                break;
            }
        }
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, wait).await.is_err() {
        debug!(socket = %id, "socket still closing at exit");
    }
}

/// Blocking reader: forwards key actions and resizes until the receiver is
/// dropped or the terminal errors.
fn read_terminal_events(tx: mpsc::Sender<UiEvent>) {
    while !tx.is_closed() {
        match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!("crossterm poll error: {e}");
                break;
            }
        }

        let ui = match event::read() {
            Ok(Event::Key(key)) => match map_key(&key) {
                Some(action) => UiEvent::Key(action),
                None => continue,
            },
            Ok(Event::Resize(cols, rows)) => UiEvent::Resize(cols, rows),
            Ok(_) => continue,
            Err(e) => {
                warn!("crossterm event error: {e}");
                break;
            }
        };
        if tx.blocking_send(ui).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsecho_client::transport::EventSender;
    use wsecho_client::{ConnectionState, SocketEvent, SocketHandle, SocketId};

    /// Connector whose sockets go nowhere.
    struct NullConnector;

    impl Connector for NullConnector {
        fn connect(&mut self, _url: &str, id: SocketId, _events: EventSender) -> SocketHandle {
            let (tx, _rx) = mpsc::unbounded_channel();
            SocketHandle::new(id, tx)
        }
    }

    fn connected() -> SessionManager<NullConnector> {
        let (mut session, _rx) = SessionManager::new(NullConnector, "ws://127.0.0.1:8008");
        apply(&mut session, Action::Toggle);
        let id = session.socket_id().unwrap();
        session.handle_event(SocketEvent::new(id, SocketEventKind::Open));
        session
    }

    #[test]
    fn typing_is_ignored_while_disconnected() {
        let (mut session, _rx) = SessionManager::new(NullConnector, "ws://127.0.0.1:8008");
        apply(&mut session, Action::Insert('a'));
        apply(&mut session, Action::Submit);
        assert_eq!(session.input(), "");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn typing_and_backspace_edit_input() {
        let mut session = connected();
        for c in "pingg".chars() {
            apply(&mut session, Action::Insert(c));
        }
        apply(&mut session, Action::Backspace);
        assert_eq!(session.input(), "ping");
    }

    #[test]
    fn submit_with_dead_socket_keeps_input() {
        // NullConnector drops the command receiver, so sends cannot be queued.
        let mut session = connected();
        apply(&mut session, Action::Insert('x'));
        apply(&mut session, Action::Submit);
        assert_eq!(session.input(), "x");
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn toggle_and_quit() {
        let mut session = connected();
        apply(&mut session, Action::Toggle);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        apply(&mut session, Action::Toggle);
        assert!(session.socket_id().is_some());
        apply(&mut session, Action::Quit);
        assert!(session.socket_id().is_none());
    }

    #[tokio::test]
    async fn close_gracefully_returns_without_socket() {
        let (mut session, mut rx) = SessionManager::new(NullConnector, "ws://127.0.0.1:8008");
        close_gracefully(&mut session, &mut rx).await;
        assert!(session.socket_id().is_none());
    }

    #[tokio::test]
    async fn close_gracefully_waits_for_close_event() {
        let mut session = connected();
        let id = session.socket_id().unwrap();
        let (tx, mut rx) = wsecho_client::transport::event_channel();
        let bye = SocketEvent::new(id, SocketEventKind::Message("bye".into()));
        let close = SocketEvent::new(id, SocketEventKind::Close);
        tx.send(bye).unwrap();
        tx.send(close).unwrap();
        close_gracefully(&mut session, &mut rx).await;
        assert!(session.socket_id().is_none());
        assert!(rx.try_recv().is_err());
    }
}
