use shared::error::{ApiError, ErrorKind};

/// Function selected before the service has declared its list.
pub const DEFAULT_FUNCTION: &str = "leetspeak";

/// Everything the client knows about the current interaction. Lives for one
/// session and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub input_text: String,
    pub selected_function: String,
    /// Server-declared order; may be empty.
    pub available_functions: Vec<String>,
    pub output_text: String,
    pub is_submitting: bool,
    pub error_message: Option<String>,
    /// Class of the failure behind `error_message`, set and cleared with it.
    pub error_kind: Option<ErrorKind>,
    pub api_base_address: String,
    pub copy_confirmation_active: bool,
}

impl SessionState {
    pub fn new(api_base_address: impl Into<String>, default_function: impl Into<String>) -> Self {
        Self {
            input_text: String::new(),
            selected_function: default_function.into(),
            available_functions: Vec::new(),
            output_text: String::new(),
            is_submitting: false,
            error_message: None,
            error_kind: None,
            api_base_address: api_base_address.into(),
            copy_confirmation_active: false,
        }
    }

    /// Replaces the function list, keeping `selected_function` a member of it
    /// whenever the list is non-empty.
    pub fn apply_function_list(&mut self, functions: Vec<String>) {
        if let Some(first) = functions.first() {
            if !functions.contains(&self.selected_function) {
                self.selected_function = first.clone();
            }
        }
        self.available_functions = functions;
        self.clear_error();
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.available_functions.iter().any(|function| function == name)
    }

    pub fn function_count(&self) -> usize {
        self.available_functions.len()
    }

    pub fn has_submittable_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    pub(crate) fn begin_transform(&mut self) {
        self.clear_error();
        self.output_text.clear();
    }

    pub fn clear(&mut self) {
        self.input_text.clear();
        self.output_text.clear();
        self.clear_error();
    }

    pub fn set_error(&mut self, error: ApiError) {
        self.error_kind = Some(error.kind);
        self.error_message = Some(error.message);
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
        self.error_kind = None;
    }

    /// The displayed failure, if any.
    pub fn error(&self) -> Option<ApiError> {
        let message = self.error_message.clone()?;
        let kind = self.error_kind.unwrap_or(ErrorKind::Service);
        Some(ApiError::new(kind, message))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
