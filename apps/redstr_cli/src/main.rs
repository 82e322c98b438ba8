use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings,
    shared::error::{ApiError, ApiException},
    ClientSettings, ControllerEvent, HttpTransformApi, SessionState, SystemClipboard,
    TransformController,
};
use tokio::{
    io::BufReader,
    sync::broadcast::{self, error::RecvError},
};
use tracing_subscriber::EnvFilter;

mod shell;

/// How long a one-shot `transform --copy` keeps serving the clipboard before exiting.
const ONE_SHOT_CLIPBOARD_HOLD: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(
    name = "redstr",
    version,
    about = "Terminal client for the redstr string transformation service"
)]
struct Args {
    /// Base address of the transformation service.
    #[arg(long)]
    api_url: Option<String>,
    /// Transform function to select after the function list loads.
    #[arg(long)]
    function: Option<String>,
    /// Give up on requests after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// List the functions the service offers.
    Functions,
    /// Transform one input and print the output.
    Transform {
        input: String,
        /// Copy the output; on Linux the process then keeps serving the
        /// clipboard for a few seconds before exiting.
        #[arg(long)]
        copy: bool,
    },
    /// Interactive session (default).
    Shell,
}

fn apply_args(mut settings: ClientSettings, args: &Args) -> ClientSettings {
    if let Some(api_url) = &args.api_url {
        settings.api_url = client_core::config::normalize_api_url(api_url);
    }
    if let Some(function) = &args.function {
        settings.default_function = function.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(timeout_secs);
    }
    settings
}

/// The process exits right after a one-shot copy, so it must hold the
/// clipboard for a while; the shell lives long enough on its own.
fn clipboard_for(command: &Command) -> SystemClipboard {
    match command {
        Command::Transform { copy: true, .. } => SystemClipboard::holding(ONE_SHOT_CLIPBOARD_HOLD),
        _ => SystemClipboard::new(),
    }
}

fn failure(state: &SessionState) -> Result<()> {
    match state.error() {
        Some(error) => Err(ApiException::from(error).into()),
        None => Ok(()),
    }
}

fn log_failure(context: &str, error: &ApiError) {
    if error.kind.is_user_visible() {
        tracing::debug!(kind = ?error.kind, message = %error.message, "{context}");
    } else {
        tracing::warn!(kind = ?error.kind, message = %error.message, "{context}");
    }
}

fn spawn_event_logger(mut events: broadcast::Receiver<ControllerEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::FunctionsFailed(error)) => {
                    log_failure("function list failed", &error)
                }
                Ok(ControllerEvent::TransformFailed(error)) => log_failure("transform failed", &error),
                Ok(ControllerEvent::CopyFailed(error)) => log_failure("copy failed", &error),
                Ok(event) => tracing::debug!(?event, "controller event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "controller event logger lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings = apply_args(load_settings(), &args);
    tracing::debug!(?settings, "resolved client settings");

    let command = args.command.clone().unwrap_or(Command::Shell);
    let api = HttpTransformApi::with_timeout(settings.request_timeout())
        .context("failed to build HTTP client")?;
    let controller = TransformController::new(
        settings.api_url.clone(),
        settings.default_function.clone(),
        Arc::new(api),
        Arc::new(clipboard_for(&command)),
        settings.controller_options(),
    );
    spawn_event_logger(controller.subscribe_events());

    controller.mount().await;
    if let Some(function) = &args.function {
        controller.select_function(function).await?;
    }

    match command {
        Command::Functions => {
            let state = controller.snapshot().await;
            failure(&state)?;
            for function in &state.available_functions {
                println!("{function}");
            }
        }
        Command::Transform { input, copy } => {
            controller.set_input(input).await;
            controller.transform().await;
            let state = controller.snapshot().await;
            failure(&state)?;
            println!("{}", state.output_text);
            if copy && !controller.copy_output().await {
                tracing::warn!("output was not copied to the clipboard");
            }
        }
        Command::Shell => {
            let state = controller.snapshot().await;
            if let Some(err) = &state.error_message {
                eprintln!("error: {err}");
            }
            eprintln!(
                "redstr @ {} ({} functions, using {}). Type :help for commands.",
                state.api_base_address,
                state.function_count(),
                state.selected_function
            );
            shell::run_shell(
                &controller,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
