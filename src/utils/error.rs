use crate::utils::output::{print_success, OutputStyle};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Phone number '{0}' is already registered")]
    DuplicatePhone(String),

    #[error("Invalid phone number or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Not allowed: {0}")]
    Unauthorized(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("System error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::System(format!("Malformed stored data: {}", err))
    }
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Domain failures are reported to the user; the rest abort the command.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, AppError::System(_) | AppError::Io(_))
    }
}

pub enum FlowResult {
    EmptyList {
        item_type: String,
    },
    Cancelled(String),
    Success(String),
}

pub fn report_error(err: &AppError) {
    match err {
        AppError::Validation(msg) => {
            println!("⚠️  {}", OutputStyle::warning(msg));
        }
        AppError::DuplicatePhone(_) => {
            println!(
                "⚠️  {}",
                OutputStyle::warning(&format!("{}. Try logging in.", err))
            );
        }
        AppError::InvalidCredentials => {
            println!(
                "❌ {}",
                OutputStyle::error("Invalid phone number or password. If you are new, please register.")
            );
        }
        AppError::NotFound(_) => {
            println!("⚠️  {}", OutputStyle::warning(&err.to_string()));
        }
        AppError::Unauthorized(msg) => {
            println!("🔒 {}", OutputStyle::error(&format!("Not allowed: {}", msg)));
        }
        AppError::Unsupported(msg) => {
            println!("❌ {}", OutputStyle::error(msg));
        }
        AppError::Io(e) => {
            eprintln!("❌ {}", OutputStyle::error(e));
        }
        AppError::System(msg) => {
            eprintln!("❌ {}", OutputStyle::error(msg));
        }
    }
}

pub fn handle_flow(flow: FlowResult) {
    match flow {
        FlowResult::EmptyList { item_type } => {
            let msg = format!("No {} found", item_type);
            println!("{}", OutputStyle::muted(&msg));
        }
        FlowResult::Cancelled(msg) => {
            println!("⏹️  {}", OutputStyle::muted(&msg));
        }
        FlowResult::Success(msg) => print_success(&msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(AppError::Validation("x".to_string()).is_user_facing());
        assert!(AppError::InvalidCredentials.is_user_facing());
        assert!(AppError::NotFound("Bus 'x'".to_string()).is_user_facing());
        assert!(!AppError::Io("disk".to_string()).is_user_facing());
        assert!(!AppError::System("boom".to_string()).is_user_facing());
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("Bus 'abc'".to_string());
        assert_eq!(err.to_string(), "Bus 'abc' not found");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(AppError::from(io), AppError::Io(_)));
    }
}
