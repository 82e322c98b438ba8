use super::*;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client_core::{
    shared::protocol::TransformRequest, ClientError, ClipboardWriter, ControllerOptions,
    TransformApi, EMPTY_INPUT_MESSAGE,
};

/// Uppercases input; offers a fixed function list.
struct UppercaseApi;

#[async_trait]
impl TransformApi for UppercaseApi {
    async fn list_functions(&self, _base: &str) -> Result<Vec<String>, ClientError> {
        Ok(vec!["upper".to_string(), "base64".to_string()])
    }

    async fn transform(
        &self,
        _base: &str,
        request: &TransformRequest,
    ) -> Result<String, ClientError> {
        Ok(format!("{}:{}", request.function, request.input.to_uppercase()))
    }
}

#[derive(Default)]
struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClientError> {
        *self.text.lock().expect("lock") = Some(text.to_string());
        Ok(())
    }
}

fn controller(clipboard: Arc<MemoryClipboard>) -> Arc<TransformController> {
    TransformController::new(
        "http://api.test",
        "leetspeak",
        Arc::new(UppercaseApi),
        clipboard,
        ControllerOptions::default(),
    )
}

#[test]
fn plain_lines_are_transform_input_verbatim() {
    assert_eq!(
        parse_line("  hello world "),
        Ok(ShellCommand::Transform("  hello world ".to_string()))
    );
    assert_eq!(
        parse_line("hello\r"),
        Ok(ShellCommand::Transform("hello".to_string()))
    );
    assert_eq!(parse_line(""), Ok(ShellCommand::Transform(String::new())));
}

#[test]
fn colon_lines_are_commands() {
    assert_eq!(
        parse_line(":fn base64"),
        Ok(ShellCommand::SelectFunction("base64".to_string()))
    );
    assert_eq!(
        parse_line(":API  http://other.test  "),
        Ok(ShellCommand::SetApi("http://other.test".to_string()))
    );
    assert_eq!(parse_line(":refresh"), Ok(ShellCommand::Refresh));
    assert_eq!(parse_line(":ls"), Ok(ShellCommand::List));
    assert_eq!(parse_line(":copy"), Ok(ShellCommand::Copy));
    assert_eq!(parse_line(":clear"), Ok(ShellCommand::Clear));
    assert_eq!(parse_line(":state"), Ok(ShellCommand::State));
    assert_eq!(parse_line(":?"), Ok(ShellCommand::Help));
    assert_eq!(parse_line(":q"), Ok(ShellCommand::Quit));
}

#[test]
fn commands_missing_arguments_or_unknown_are_errors() {
    assert_eq!(parse_line(":fn"), Err("usage: :fn <name>".to_string()));
    assert_eq!(parse_line(":api   "), Err("usage: :api <url>".to_string()));
    assert!(parse_line(":frobnicate")
        .expect_err("unknown")
        .contains(":frobnicate"));
}

#[test]
fn function_listing_marks_selection() {
    let mut state = SessionState::new("http://api.test", "base64");
    assert_eq!(render_functions(&state), "no functions available\n");

    state.available_functions = vec!["upper".to_string(), "base64".to_string()];
    assert_eq!(render_functions(&state), "  upper\n* base64\n");
}

#[tokio::test]
async fn shell_session_drives_controller() {
    let clipboard = Arc::new(MemoryClipboard::default());
    let controller = controller(Arc::clone(&clipboard));
    controller.mount().await;

    let script = "hello\n:fn base64\nabc\n:copy\n   \n:fn rot13\n:clear\n:quit\nnever sent\n";
    let mut out = Vec::new();
    run_shell(&controller, script.as_bytes(), &mut out)
        .await
        .expect("shell");

    let out = String::from_utf8(out).expect("utf8");
    let expected = format!(
        "upper:HELLO\nfunction: base64\nbase64:ABC\nCopied!\nerror: {EMPTY_INPUT_MESSAGE}\nerror: unknown transform function 'rot13'\ncleared\n"
    );
    assert_eq!(out, expected);
    assert_eq!(
        clipboard.text.lock().expect("lock").as_deref(),
        Some("base64:ABC")
    );

    let state = controller.snapshot().await;
    assert_eq!(state.input_text, "");
    assert_eq!(state.output_text, "");
    assert_eq!(state.selected_function, "base64");
}

#[tokio::test]
async fn copy_without_output_reports_nothing_to_copy() {
    let controller = controller(Arc::new(MemoryClipboard::default()));
    assert_eq!(
        execute(&controller, ShellCommand::Copy).await,
        "nothing to copy\n"
    );
}
