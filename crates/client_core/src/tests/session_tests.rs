use super::*;

fn functions(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn new_session_starts_empty_with_default_function() {
    let state = SessionState::new("http://localhost:8080", DEFAULT_FUNCTION);
    assert_eq!(state.input_text, "");
    assert_eq!(state.output_text, "");
    assert_eq!(state.selected_function, "leetspeak");
    assert!(state.available_functions.is_empty());
    assert!(!state.is_submitting);
    assert!(!state.copy_confirmation_active);
    assert_eq!(state.error_message, None);
}

#[test]
fn function_list_without_selection_resets_to_first_entry() {
    let mut state = SessionState::new("http://api", "rot13");
    state.apply_function_list(functions(&["leetspeak", "base64"]));
    assert_eq!(state.selected_function, "leetspeak");
    assert_eq!(state.function_count(), 2);

    state.apply_function_list(functions(&["leetspeak", "base64"]));
    assert_eq!(state.selected_function, "leetspeak");
}

#[test]
fn function_list_containing_selection_keeps_it() {
    let mut state = SessionState::new("http://api", "base64");
    state.apply_function_list(functions(&["leetspeak", "base64"]));
    assert_eq!(state.selected_function, "base64");
}

#[test]
fn empty_function_list_keeps_selection_and_clears_error() {
    let mut state = SessionState::new("http://api", "rot13");
    state.error_message = Some("Failed to connect to API: boom".to_string());
    state.apply_function_list(Vec::new());
    assert_eq!(state.selected_function, "rot13");
    assert!(state.available_functions.is_empty());
    assert_eq!(state.error_message, None);
}

#[test]
fn whitespace_only_input_is_not_submittable() {
    let mut state = SessionState::new("http://api", DEFAULT_FUNCTION);
    state.input_text = " \t\n ".to_string();
    assert!(!state.has_submittable_input());
    state.input_text = " x ".to_string();
    assert!(state.has_submittable_input());
}

#[test]
fn clear_resets_only_input_output_and_error() {
    let mut state = SessionState::new("http://api", "base64");
    state.available_functions = functions(&["base64"]);
    state.input_text = "hello".to_string();
    state.output_text = "aGVsbG8=".to_string();
    state.error_message = Some("stale".to_string());

    state.clear();

    assert_eq!(state.input_text, "");
    assert_eq!(state.output_text, "");
    assert_eq!(state.error_message, None);
    assert_eq!(state.selected_function, "base64");
    assert_eq!(state.available_functions, functions(&["base64"]));
    assert_eq!(state.api_base_address, "http://api");
}

#[test]
fn error_kind_travels_with_message() {
    let mut state = SessionState::new("http://api", DEFAULT_FUNCTION);
    state.set_error(ApiError::new(ErrorKind::Validation, "empty"));
    assert_eq!(state.error_message.as_deref(), Some("empty"));
    assert_eq!(
        state.error(),
        Some(ApiError::new(ErrorKind::Validation, "empty"))
    );

    state.clear();
    assert_eq!(state.error_kind, None);
    assert_eq!(state.error(), None);
}
