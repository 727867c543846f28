//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

use archai_core::ArchError;

/// Successful execution.
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Data format error (undecodable or empty image).
/// Maps to EX_DATAERR from sysexits.h.
pub const INVALID_IMAGE: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Classifier unavailable (model missing, unloadable or failing).
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const CLASSIFIER_UNAVAILABLE: i32 = 69;

/// I/O error (cannot write the feedback log).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Configuration error (label order does not match the model).
/// Maps to EX_CONFIG from sysexits.h.
pub const CONFIG_ERROR: i32 = 78;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
    /// Fixed user-facing text for classifier errors
    pub user_message: Option<&'static str>,
}

impl ExitCode {
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify error by the first typed cause in the chain
        let arch = err.chain().find_map(|e| e.downcast_ref::<ArchError>());
        let code = match arch {
            Some(e) => code_for(e),
            None if err
                .chain()
                .any(|e| e.downcast_ref::<std::io::Error>().is_some()) =>
            {
                INPUT_ERROR
            }
            None => GENERAL_ERROR,
        };

        Self {
            code,
            message: Some(message),
            user_message: arch
                .filter(|e| !matches!(e, ArchError::Persistence(_)))
                .map(ArchError::user_message),
        }
    }
}

/// Exit code for a classifier error.
pub fn code_for(err: &ArchError) -> i32 {
    match err {
        ArchError::InvalidImage(_) => INVALID_IMAGE,
        ArchError::ModelUnavailable(_) | ArchError::Inference(_) => CLASSIFIER_UNAVAILABLE,
        ArchError::Persistence(_) => IO_ERROR,
        ArchError::CatalogMismatch { .. } | ArchError::LabelIndex(_) => CONFIG_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use archai_core::{ImageFault, MALFORMED_IMAGE_MESSAGE};

    #[test]
    fn test_arch_error_codes() {
        let invalid = ArchError::InvalidImage(ImageFault::Decode("bad".into()));
        assert_eq!(code_for(&invalid), INVALID_IMAGE);
        assert_eq!(code_for(&ArchError::Inference("x".into())), CLASSIFIER_UNAVAILABLE);
        assert_eq!(
            code_for(&ArchError::ModelUnavailable("x".into())),
            CLASSIFIER_UNAVAILABLE
        );
        assert_eq!(code_for(&ArchError::Persistence("x".into())), IO_ERROR);
        assert_eq!(
            code_for(&ArchError::CatalogMismatch {
                scores: 3,
                styles: 25
            }),
            CONFIG_ERROR
        );
    }

    #[test]
    fn test_from_anyhow_finds_wrapped_error() {
        let err = Err::<(), _>(ArchError::InvalidImage(ImageFault::Decode("eof".into())))
            .context("Failed to classify photo.jpg")
            .unwrap_err();
        let exit = ExitCode::from_anyhow(&err);
        assert_eq!(exit.code, INVALID_IMAGE);
        assert_eq!(exit.user_message, Some(MALFORMED_IMAGE_MESSAGE));
        assert!(exit.message.unwrap().starts_with("Failed to classify photo.jpg"));
    }

    #[test]
    fn test_from_anyhow_io_error_is_input_error() {
        let err = std::fs::read("/nonexistent/photo.jpg")
            .context("Failed to read file: /nonexistent/photo.jpg")
            .unwrap_err();
        let exit = ExitCode::from_anyhow(&err);
        assert_eq!(exit.code, INPUT_ERROR);
        assert!(exit.user_message.is_none());
    }

    #[test]
    fn test_from_anyhow_other_error() {
        let exit = ExitCode::from_anyhow(&anyhow::anyhow!("something odd"));
        assert_eq!(exit.code, GENERAL_ERROR);
    }
}
