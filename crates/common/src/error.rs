/// Error types that can be built from a plain message string.
///
/// Implement this for a crate's error type, then invoke [`impl_context!`]
/// in the crate's error module to get `.context()` and `.with_context()` on
/// `Result` and `Option`.
pub trait FromMessage: Sized {
    fn from_message(message: String) -> Self;
}

/// Generate a crate-local `Context` trait with `.context()` and `.with_context()`
/// methods on `Result` and `Option`, producing the given error type.
///
/// With no argument the error type is the module's `Error`, which must
/// implement [`FromMessage`].
///
/// ```ignore
/// // in crates/config/src/error.rs
/// aidraw_common::impl_context!();
/// ```
#[macro_export]
macro_rules! impl_context {
    () => {
        $crate::impl_context!(Error);
    };
    ($err:ty) => {
        pub trait Context<T> {
            fn context(self, context: impl Into<String>) -> std::result::Result<T, $err>;
            fn with_context<C, F>(self, f: F) -> std::result::Result<T, $err>
            where
                C: Into<String>,
                F: FnOnce() -> C;
        }

        impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
            fn context(self, context: impl Into<String>) -> std::result::Result<T, $err> {
                let ctx = context.into();
                self.map_err(|source| {
                    <$err as $crate::FromMessage>::from_message(format!("{ctx}: {source}"))
                })
            }

            fn with_context<C, F>(self, f: F) -> std::result::Result<T, $err>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.map_err(|source| {
                    <$err as $crate::FromMessage>::from_message(format!("{}: {source}", f().into()))
                })
            }
        }

        impl<T> Context<T> for Option<T> {
            fn context(self, context: impl Into<String>) -> std::result::Result<T, $err> {
                self.ok_or_else(|| <$err as $crate::FromMessage>::from_message(context.into()))
            }

            fn with_context<C, F>(self, f: F) -> std::result::Result<T, $err>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.ok_or_else(|| <$err as $crate::FromMessage>::from_message(f().into()))
            }
        }
    };
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::FromMessage;

    #[derive(Debug, PartialEq)]
    struct Msg(String);

    impl FromMessage for Msg {
        fn from_message(message: String) -> Self {
            Self(message)
        }
    }

    crate::impl_context!(Msg);

    #[test]
    fn result_context_prefixes_source() {
        let err = "12x".parse::<u32>().context("port").unwrap_err();
        assert!(err.0.starts_with("port: "));
    }

    #[test]
    fn option_context_uses_message_only() {
        let missing: Option<u8> = None;
        assert_eq!(
            missing.with_context(|| "no value").unwrap_err(),
            Msg("no value".into())
        );
    }
}
