// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Type alias to make it easy to work with [`Result`]s. Works hand in hand w/
/// [`CommonError`]. The user callables ([`crate::Completer`], [`crate::Highlighter`])
/// return this so that they can use `?` on any error type that converts into a
/// [`miette::Report`].
pub type CommonResult<T> = miette::Result<T>;

/// Common error struct. Use this when a user callable needs to fail with a message and
/// there is no better typed error around.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("{error_type:?}: {error_message}")]
pub struct CommonError {
    pub error_type: CommonErrorType,
    pub error_message: String,
}

/// Kinds of [`CommonError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonErrorType {
    InvalidArguments,
    NotFound,
    General,
}

impl CommonError {
    /// Creates a [`CommonResult`] that is always an error.
    ///
    /// # Errors
    ///
    /// Always returns an [`Err`] holding a [`CommonError`].
    pub fn new_error_result<T>(
        error_type: CommonErrorType,
        error_message: &str,
    ) -> CommonResult<T> {
        Err(miette::Report::new(CommonError {
            error_type,
            error_message: error_message.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_error_result() {
        let result: CommonResult<()> =
            CommonError::new_error_result(CommonErrorType::NotFound, "no such widget");
        let report = result.unwrap_err();
        let error = report.downcast_ref::<CommonError>().unwrap();
        assert_eq!(error.error_type, CommonErrorType::NotFound);
        assert_eq!(error.error_message, "no such widget");
    }
}
