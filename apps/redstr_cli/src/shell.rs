//! Line-oriented front-end over the transform controller.

use anyhow::Result;
use client_core::{SessionState, TransformController};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Type text and press enter to transform it with the selected function.

  :fn <name>    select a transform function
  :api <url>    point at another service (reloads functions)
  :refresh      reload the function list
  :list         show available functions
  :copy         copy the last output to the clipboard
  :clear        reset input, output and error
  :state        show the session state
  :help         show this help
  :quit         leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Transform(String),
    SelectFunction(String),
    SetApi(String),
    Refresh,
    List,
    Copy,
    Clear,
    State,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ShellCommand::Transform(_) => "transform",
            ShellCommand::SelectFunction(_) => "select_function",
            ShellCommand::SetApi(_) => "set_api",
            ShellCommand::Refresh => "refresh",
            ShellCommand::List => "list",
            ShellCommand::Copy => "copy",
            ShellCommand::Clear => "clear",
            ShellCommand::State => "state",
            ShellCommand::Help => "help",
            ShellCommand::Quit => "quit",
        }
    }
}

/// Lines starting with `:` are commands; anything else is transform input,
/// passed through untrimmed.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ShellCommand::Transform(line.to_string()));
    };

    let (name, arg) = match command.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };

    match (name.to_ascii_lowercase().as_str(), arg) {
        ("fn" | "function", "") => Err("usage: :fn <name>".to_string()),
        ("fn" | "function", arg) => Ok(ShellCommand::SelectFunction(arg.to_string())),
        ("api", "") => Err("usage: :api <url>".to_string()),
        ("api", arg) => Ok(ShellCommand::SetApi(arg.to_string())),
        ("refresh", _) => Ok(ShellCommand::Refresh),
        ("list" | "ls", _) => Ok(ShellCommand::List),
        ("copy", _) => Ok(ShellCommand::Copy),
        ("clear", _) => Ok(ShellCommand::Clear),
        ("state", _) => Ok(ShellCommand::State),
        ("help" | "?", _) => Ok(ShellCommand::Help),
        ("quit" | "q" | "exit", _) => Ok(ShellCommand::Quit),
        (other, _) => Err(format!("unknown command ':{other}' (try :help)")),
    }
}

pub fn render_functions(state: &SessionState) -> String {
    if state.available_functions.is_empty() {
        return "no functions available\n".to_string();
    }
    let mut out = String::new();
    for function in &state.available_functions {
        let marker = if *function == state.selected_function {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!("{marker} {function}\n"));
    }
    out
}

pub fn render_state(state: &SessionState) -> String {
    format!(
        "api: {}\nfunction: {} ({} available)\ninput: {:?}\noutput: {:?}\nsubmitting: {}\ncopied: {}\nerror: {}\n",
        state.api_base_address,
        state.selected_function,
        state.function_count(),
        state.input_text,
        state.output_text,
        state.is_submitting,
        state.copy_confirmation_active,
        state.error_message.as_deref().unwrap_or("-"),
    )
}

fn render_error_or(state: &SessionState, ok: impl FnOnce(&SessionState) -> String) -> String {
    match &state.error_message {
        Some(err) => format!("error: {err}\n"),
        None => ok(state),
    }
}

pub async fn execute(controller: &TransformController, command: ShellCommand) -> String {
    match command {
        ShellCommand::Transform(input) => {
            controller.set_input(input).await;
            controller.transform().await;
            let state = controller.snapshot().await;
            render_error_or(&state, |state| format!("{}\n", state.output_text))
        }
        ShellCommand::SelectFunction(name) => match controller.select_function(&name).await {
            Ok(()) => format!("function: {name}\n"),
            Err(err) => format!("error: {err}\n"),
        },
        ShellCommand::SetApi(url) => {
            if !controller.set_api_base(&url).await {
                return "api base unchanged\n".to_string();
            }
            let state = controller.snapshot().await;
            render_error_or(&state, |state| {
                format!(
                    "api: {} ({} functions)\n",
                    state.api_base_address,
                    state.function_count()
                )
            })
        }
        ShellCommand::Refresh => {
            controller.load_functions().await;
            let state = controller.snapshot().await;
            render_error_or(&state, render_functions)
        }
        ShellCommand::List => render_functions(&controller.snapshot().await),
        ShellCommand::Copy => {
            if controller.snapshot().await.output_text.is_empty() {
                "nothing to copy\n".to_string()
            } else if controller.copy_output().await {
                "Copied!\n".to_string()
            } else {
                "copy failed (see logs)\n".to_string()
            }
        }
        ShellCommand::Clear => {
            controller.clear().await;
            "cleared\n".to_string()
        }
        ShellCommand::State => render_state(&controller.snapshot().await),
        ShellCommand::Help => HELP.to_string(),
        ShellCommand::Quit => String::new(),
    }
}

pub async fn run_shell<R, W>(controller: &TransformController, reader: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                out.write_all(format!("error: {message}\n").as_bytes())
                    .await?;
                out.flush().await?;
                continue;
            }
        };
        tracing::debug!(command = command.name(), "shell command");
        if command == ShellCommand::Quit {
            break;
        }
        let reply = execute(controller, command).await;
        out.write_all(reply.as_bytes()).await?;
        out.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
