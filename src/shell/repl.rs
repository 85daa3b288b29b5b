//! The interactive read-eval-print loop.

use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, ExternalPrinter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::command::{self, Flow};
use super::state::ShellState;
use crate::config::Config;
use crate::transport::Connector;
use crate::Result;

const HISTORY_FILE: &str = ".pubsub_shell_history";

/// Run the shell until `exit` or end of input.
///
/// Line reading happens on a blocking thread while listener output is
/// printed through rustyline's external printer, so incoming messages
/// appear above the prompt instead of tearing it.
pub async fn run(config: Config, connector: Arc<dyn Connector>) -> Result<()> {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let mut state = ShellState::new(config, connector, out_tx);

    let names = state.server_names();
    if !names.is_empty() {
        state.say(format!("Found servers {}", names.join(" ")));
    }

    if let Some(name) = state.default_server() {
        if let Err(err) = state.use_server(&name).await {
            state.say(err.to_string());
        }
    }

    let mut rl = DefaultEditor::new()?;
    let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
    if let Some(ref path) = history {
        // First run has no history file yet.
        let _ = rl.load_history(path);
    }

    let printer = rl.create_external_printer()?;
    let printer_task = spawn_printer(printer, out_rx);

    let outcome: Result<()> = loop {
        let prompt = state.prompt();
        let (editor, read) = tokio::task::spawn_blocking(move || {
            let read = rl.readline(&prompt);
            (rl, read)
        })
        .await?;
        rl = editor;

        match read {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                match command::parse(line) {
                    Ok(cmd) => {
                        if command::dispatch(&mut state, cmd).await == Flow::Exit {
                            break Ok(());
                        }
                    }
                    Err(err) => state.say(err.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    };

    let shutdown = state.shutdown().await;
    if let Some(ref path) = history {
        let _ = rl.save_history(path);
    }

    // Dropping the state closes the output channel; the printer task drains
    // whatever is queued and ends.
    drop(state);
    let _ = printer_task.await;

    outcome.and(shutdown)
}

fn spawn_printer<P>(mut printer: P, mut rx: mpsc::UnboundedReceiver<String>) -> JoinHandle<()>
where
    P: ExternalPrinter + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if printer.print(line).is_err() {
                debug!("external printer closed; dropping shell output");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    struct FakePrinter(mpsc::UnboundedSender<String>);

    impl ExternalPrinter for FakePrinter {
        fn print(&mut self, msg: String) -> rustyline::Result<()> {
            self.0
                .send(msg)
                .map_err(|_| ReadlineError::Io(std::io::Error::other("printer gone")))
        }
    }

    #[tokio::test]
    async fn test_printer_task_preserves_order() {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let task = spawn_printer(FakePrinter(seen_tx), line_rx);

        for i in 0..5 {
            line_tx.send(format!("line {i}")).unwrap();
        }
        drop(line_tx);
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

        for i in 0..5 {
            assert_eq!(seen_rx.recv().await.unwrap(), format!("line {i}"));
        }
    }

    #[tokio::test]
    async fn test_printer_task_ends_when_sink_closes() {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (seen_tx, seen_rx) = mpsc::unbounded_channel();
        let task = spawn_printer(FakePrinter(seen_tx), line_rx);

        // Printer output side is gone; the next line ends the task.
        drop(seen_rx);
        line_tx.send("lost".to_string()).unwrap();

        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }
}
