//! Fatal error handling

use crate::error::{MatrixSumError, EXIT_FAILURE};
use tracing::error;

/// Report a fatal error and exit with the matching status code
///
/// Errors raised by the run carry their own exit code; anything else exits
/// with [`EXIT_FAILURE`]. With `verbose >= 1` the full cause chain is shown.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code_for(&error))
}

/// Exit code for an error that reached the top level
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<MatrixSumError>()
        .map(MatrixSumError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_USAGE;

    #[test]
    fn test_exit_code_for_configuration_error() {
        let error = anyhow::Error::new(MatrixSumError::invalid_config("size", "zero"));
        assert_eq!(exit_code_for(&error), EXIT_USAGE);
    }

    #[test]
    fn test_exit_code_for_context_wrapped_error() {
        let error = anyhow::Error::new(MatrixSumError::invalid_config("workers", "zero"))
            .context("failed to resolve configuration");
        assert_eq!(exit_code_for(&error), EXIT_USAGE);
    }

    #[test]
    fn test_exit_code_for_runtime_error() {
        let error = anyhow::Error::new(MatrixSumError::EmptyReduction);
        assert_eq!(exit_code_for(&error), EXIT_FAILURE);
    }

    #[test]
    fn test_exit_code_for_foreign_error() {
        let error = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&error), EXIT_FAILURE);
    }
}
