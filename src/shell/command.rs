//! Command parsing and execution.

use bytes::Bytes;

use super::state::ShellState;
use super::stats;
use crate::error::ShellError;
use crate::Result;

const USE_USAGE: &str = "One argument is required: ex: use server1";
const LISTEN_USAGE: &str = "One argument is required: ex: listen channel_name";
const STOP_USAGE: &str = "One argument is required: ex: stop listen channel_name";
const PUBLISH_USAGE: &str = "Two arguments are required: ex: publish channel_name {'hello':'world'}";
const STAT_USAGE_NONE: &str = "No arguments provided: ex: stat node_num_clients";
const STAT_USAGE_MANY: &str = "Only one argument is allowed: ex: stat node_num_clients";
const STATS_USAGE_NONE: &str = "No arguments provided: ex: stats node";
const STATS_USAGE_MANY: &str = "Only one argument is allowed: ex: stats node";
const COUNT_USAGE: &str = "missing item to count: ex: count chans";
const UNKNOWN_KEYWORD: &str = "Unknown keyword: type help count to see the valid keywords";
const UNKNOWN_COMMAND: &str = "Unknown command: type help to see the valid commands";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `use <server>`
    Use(String),
    /// `servers`
    Servers,
    /// `listen <channel>`
    Listen(String),
    /// `stop listen <channel>`
    StopListen(String),
    /// `publish <channel> <payload>`
    Publish { channel: String, payload: String },
    /// `listening`
    Listening,
    /// `chans`
    Chans,
    /// `stat <metric>`
    Stat(String),
    /// `stats <all|node|http|client>`
    Stats(String),
    /// `count <keyword>`
    Count(String),
    /// `help`
    Help,
    /// `exit` / `quit`
    Exit,
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Parse one input line into a command.
///
/// Tokens are whitespace separated; payloads are a single token, taken
/// verbatim. Arity problems surface as `Usage` errors carrying the example
/// text shown to the user.
pub fn parse(line: &str) -> Result<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&name, args) = tokens
        .split_first()
        .ok_or(ShellError::Usage(UNKNOWN_COMMAND))?;

    match name {
        "use" => match args {
            [server] => Ok(Command::Use(server.to_string())),
            _ => Err(ShellError::Usage(USE_USAGE)),
        },
        "servers" => Ok(Command::Servers),
        "listen" => match args {
            [channel] => Ok(Command::Listen(channel.to_string())),
            _ => Err(ShellError::Usage(LISTEN_USAGE)),
        },
        "stop" => match args {
            ["listen", channel] => Ok(Command::StopListen(channel.to_string())),
            _ => Err(ShellError::Usage(STOP_USAGE)),
        },
        "publish" => match args {
            [channel, payload] => Ok(Command::Publish {
                channel: channel.to_string(),
                payload: payload.to_string(),
            }),
            _ => Err(ShellError::Usage(PUBLISH_USAGE)),
        },
        "listening" => Ok(Command::Listening),
        "chans" => Ok(Command::Chans),
        "stat" => match args {
            [] => Err(ShellError::Usage(STAT_USAGE_NONE)),
            [metric] => Ok(Command::Stat(metric.to_string())),
            _ => Err(ShellError::Usage(STAT_USAGE_MANY)),
        },
        "stats" => match args {
            [] => Err(ShellError::Usage(STATS_USAGE_NONE)),
            [mode] => Ok(Command::Stats(mode.to_string())),
            _ => Err(ShellError::Usage(STATS_USAGE_MANY)),
        },
        "count" => match args.first() {
            Some(keyword) => Ok(Command::Count(keyword.to_string())),
            None => Err(ShellError::Usage(COUNT_USAGE)),
        },
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        _ => Err(ShellError::Usage(UNKNOWN_COMMAND)),
    }
}

/// Execute a command against the shell state.
///
/// Errors are printed through the state's output channel; they never abort
/// the shell.
pub async fn dispatch(state: &mut ShellState, command: Command) -> Flow {
    match run(state, command).await {
        Ok(flow) => flow,
        Err(err) => {
            state.say(err.to_string());
            Flow::Continue
        }
    }
}

async fn run(state: &mut ShellState, command: Command) -> Result<Flow> {
    match command {
        Command::Use(name) => {
            state.use_server(&name).await?;
        }
        Command::Servers => {
            let names = state.server_names();
            if names.is_empty() {
                state.say("No servers configured: please check your config file");
            } else {
                state.say(format!("Found servers {}", names.join(" ")));
            }
        }
        Command::Listen(channel) => {
            let transport = state.current()?.transport.clone();
            state.registry().listen(transport, &channel).await?;
            state.say(format!("Listening to channel {channel} ..."));
        }
        Command::StopListen(channel) => {
            state.current()?;
            state.registry().stop(&channel).await?;
        }
        Command::Publish { channel, payload } => {
            let transport = state.current()?.transport.clone();
            transport.publish(&channel, Bytes::from(payload)).await?;
        }
        Command::Listening => {
            state.current()?;
            let active = state.registry().active()?;
            if active.is_empty() {
                state.say("Not listening to any channel");
            } else {
                state.say(format!("Listening to channels [{}]", active.join(" ")));
            }
        }
        Command::Chans => {
            let transport = state.current()?.transport.clone();
            let channels = transport.channels().await?;
            state.say(format!("Active channels: [{}]", channels.join(" ")));
        }
        Command::Stat(metric) => {
            let transport = state.current()?.transport.clone();
            let nodes = transport.stats().await?;
            for block in stats::render_stat(&nodes, &metric, &transport.endpoint()) {
                state.say(block);
            }
        }
        Command::Stats(mode) => {
            let transport = state.current()?.transport.clone();
            let nodes = transport.stats().await?;
            for block in stats::render_stats(&nodes, &mode, &transport.endpoint()) {
                state.say(block);
            }
        }
        Command::Count(keyword) => {
            let transport = state.current()?.transport.clone();
            if keyword != "chans" {
                return Err(ShellError::Usage(UNKNOWN_KEYWORD));
            }
            let channels = transport.channels().await?;
            let noun = if channels.len() == 1 {
                "channel"
            } else {
                "channels"
            };
            state.say(format!("Found {} {}", channels.len(), noun));
        }
        Command::Help => {
            state.say(help_text());
        }
        Command::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

fn help_text() -> String {
    let entries: [(&str, &str); 12] = [
        ("chans", "Channels on the server"),
        ("count", "Count things on the server: ex: count chans"),
        ("exit", "Exit the shell (alias: quit)"),
        ("help", "Display this help"),
        ("listen", "Listen to channels: ex: listen channel_name"),
        ("listening", "Channels currently listened to"),
        (
            "publish",
            "Publish into a channel: ex: publish channel_name {'hello':'world'} (use no space in your payload)",
        ),
        ("servers", "List configured servers"),
        ("stat", "Get a server statistic: ex: stat node_num_clients"),
        ("stats", "Server statistics: ex: stats <all|node|http|client>"),
        ("stop", "Stop an action: ex: stop listen channel_name"),
        ("use", "Use a server: ex: use server1"),
    ];

    let mut text = String::from("Commands:");
    for (name, help) in entries {
        text.push_str(&format!("\n  {name:<10} {help}"));
    }
    text
}
