mod adhoc;
mod duplicate_foreign_key;
mod duplicate_index;
mod duplicate_key;
mod invalid_schema;
mod unsupported_feature;

use adhoc::AdhocError;
use duplicate_foreign_key::DuplicateForeignKey;
use duplicate_index::DuplicateIndex;
use duplicate_key::DuplicateKey;
use invalid_schema::InvalidSchema;
use std::sync::Arc;
use unsupported_feature::UnsupportedFeature;

pub use duplicate_foreign_key::ForeignKeyMismatch;
pub use duplicate_index::IndexMismatch;

/// Returns early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while assembling or querying the relational model.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    InvalidSchema(InvalidSchema),
    DuplicateForeignKey(DuplicateForeignKey),
    DuplicateIndex(DuplicateIndex),
    DuplicateKey(DuplicateKey),
    UnsupportedFeature(UnsupportedFeature),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            DuplicateForeignKey(err) => core::fmt::Display::fmt(err, f),
            DuplicateIndex(err) => core::fmt::Display::fmt(err, f),
            DuplicateKey(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown relmap error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<core::fmt::Error> for Error {
    fn from(err: core::fmt::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
        assert!(err.is_adhoc());
    }

    #[test]
    fn error_chain_display() {
        let root = Error::invalid_schema("column `Id` has conflicting store types");
        let top = err!("building table `Orders`");

        let chained = root.context(top);
        assert_eq!(
            chained.to_string(),
            "building table `Orders`: invalid schema: column `Id` has conflicting store types"
        );
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn unsupported_feature_display() {
        let err = Error::unsupported_feature("column accessors require dynamic code");
        assert!(err.is_unsupported_feature());
        assert!(!err.is_invalid_schema());
        assert_eq!(
            err.to_string(),
            "unsupported feature: column accessors require dynamic code"
        );
    }

    #[test]
    fn duplicate_foreign_key_display() {
        let err = Error::duplicate_foreign_key(
            "{'CustomerId'}",
            "Order",
            "{'CustomerId'}",
            "SpecialOrder",
            "Orders",
            "FK_Orders_Customers_CustomerId",
            ForeignKeyMismatch::DeleteBehavior {
                first: "Cascade".into(),
                second: "Restrict".into(),
            },
        );

        assert!(err.is_duplicate_foreign_key());
        assert_eq!(
            err.to_string(),
            "duplicate foreign key: the foreign keys {'CustomerId'} on 'Order' and \
             {'CustomerId'} on 'SpecialOrder' are both mapped to \
             'Orders.FK_Orders_Customers_CustomerId' but with different delete \
             behaviors ('Cascade' and 'Restrict')"
        );
    }
}
