use super::Error;

/// Error built from a formatted message, used where no structured kind fits.
#[derive(Debug)]
pub(super) struct AdhocError {
    message: Box<str>,
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an ad-hoc error from format arguments. Prefer the `err!` and
    /// `bail!` macros.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        let message = match args.as_str() {
            Some(message) => message.into(),
            None => args.to_string().into(),
        };
        Error::from(super::ErrorKind::Adhoc(AdhocError { message }))
    }

    /// Returns `true` if this error is an ad-hoc error.
    pub fn is_adhoc(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Adhoc(_))
    }
}
