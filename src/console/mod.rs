pub mod render;

use log::{ debug, info, warn };
use std::error::Error;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader };
use tokio::sync::{ mpsc, oneshot, watch };
use tokio::task::JoinSet;

use crate::controller::{ ChatController, SubmitOutcome };
use crate::models::chat::ChatSnapshot;
use self::render::{ render_message, Transcript };

const HEADER: &str = "A320 Expert  |  Systems  ·  Performance  ·  Operations";
const NOTICE: &str =
    "Ask about A320 systems, procedures, or specifications. Type /new for a new session, /quit to leave. (/dismiss hides this notice)";
pub const BUSY_NOTICE: &str = "Still waiting for the previous answer, please resend in a moment.";
pub const UNREADABLE_INPUT_NOTICE: &str = "That line was not valid UTF-8 and was ignored.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewSession,
    Dismiss,
    Quit,
    Question(String),
}

pub fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/new" | "/reset" => Command::NewSession,
        "/dismiss" => Command::Dismiss,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Question(line.to_string()),
    }
}

/// Dismissible hint shown above the conversation. Purely presentational.
#[derive(Debug)]
pub struct Notice {
    visible: bool,
}

impl Notice {
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn text(&self) -> Option<&'static str> {
        self.visible.then_some(NOTICE)
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints transcript lines until `shutdown` fires, then flushes whatever
/// the latest snapshot still holds.
async fn render_loop(
    mut updates: watch::Receiver<ChatSnapshot>,
    mut shutdown: oneshot::Receiver<()>,
    out: mpsc::UnboundedSender<String>
) {
    let mut transcript = Transcript::new();
    let mut stopping = false;
    loop {
        let snapshot = updates.borrow_and_update().clone();
        for line in transcript.advance(&snapshot) {
            let _ = out.send(line);
        }
        if stopping {
            break;
        }
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = &mut shutdown => stopping = true,
        }
    }
}

/// Reads one line, without its terminator. `Ok(None)` at end of input;
/// `Ok(Some(None))` for a line that is not valid UTF-8.
async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>
) -> std::io::Result<Option<Option<String>>> {
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8(buf.clone()).ok()))
}

/// Runs the console against any line source, sending every printed line to
/// `out`. Returns once the input ends (or `/quit`) and every question already
/// submitted has settled and been printed.
pub async fn drive_console<R: AsyncBufRead + Unpin>(
    controller: ChatController,
    mut reader: R,
    out: mpsc::UnboundedSender<String>
) -> std::io::Result<()> {
    let mut notice = Notice::new();
    let _ = out.send(HEADER.to_string());
    if let Some(text) = notice.text() {
        let _ = out.send(text.to_string());
    }

    let (stop_render, shutdown) = oneshot::channel();
    let render = tokio::spawn(render_loop(controller.subscribe(), shutdown, out.clone()));
    let mut submissions = JoinSet::new();
    let mut buf = Vec::new();

    while let Some(line) = read_line(&mut reader, &mut buf).await? {
        let Some(line) = line else {
            warn!("Ignoring console input that is not valid UTF-8");
            let _ = out.send(UNREADABLE_INPUT_NOTICE.to_string());
            continue;
        };
        match parse_command(&line) {
            Command::Quit => break,
            Command::NewSession => {
                controller.reset();
                if let Some(text) = notice.text() {
                    let _ = out.send(text.to_string());
                }
            }
            Command::Dismiss => notice.dismiss(),
            Command::Question(text) => {
                controller.set_input(text.clone());
                let controller = controller.clone();
                let out = out.clone();
                submissions.spawn(async move {
                    match controller.submit(&text).await {
                        SubmitOutcome::Busy => {
                            let _ = out.send(BUSY_NOTICE.to_string());
                        }
                        outcome => debug!("Submission finished: {:?}", outcome),
                    }
                });
            }
        }
    }

    if !submissions.is_empty() {
        info!("Waiting for {} outstanding question(s)", submissions.len());
    }
    while let Some(joined) = submissions.join_next().await {
        if let Err(e) = joined {
            warn!("Submission task ended abnormally: {}", e);
        }
    }

    let _ = stop_render.send(());
    if let Err(e) = render.await {
        warn!("Render task ended abnormally: {}", e);
    }
    info!("Console closed");
    Ok(())
}

pub async fn run_console(controller: ChatController) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (out, mut lines) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            println!("{}", line);
        }
    });

    drive_console(controller, BufReader::new(tokio::io::stdin()), out).await?;
    printer.await?;
    Ok(())
}

/// Asks a single question and returns the outcome with the rendered exchange.
pub async fn run_once(controller: &ChatController, question: &str) -> (SubmitOutcome, Vec<String>) {
    let outcome = controller.submit(question).await;
    let lines = controller
        .snapshot()
        .messages.iter()
        .skip(1)
        .map(render_message)
        .collect();
    (outcome, lines)
}
