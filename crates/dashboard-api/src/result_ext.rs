//! Logging helpers for upstream calls that are allowed to fail.
//!
//! Session enrichment treats a failed upstream call as "no data": the error
//! is logged with the call site and an empty value takes its place.

use std::fmt::Display;
use tracing::warn;

pub trait ResultExt<T, E> {
    /// Log an `Err` with the caller's location and pass the result through.
    fn log<S: ToString>(self, context: S) -> Result<T, E>;

    /// Log an `Err` and replace it with `T::default()`.
    ///
    /// ```ignore
    /// let sessions = backend
    ///     .list_user_sessions(&user.id)
    ///     .await
    ///     .degrade(format!("listing sessions for user {}", user.id))
    ///     .sessions;
    /// ```
    fn degrade<S: ToString>(self, context: S) -> T
    where
        T: Default;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    #[track_caller]
    fn log<S: ToString>(self, context: S) -> Result<T, E> {
        if let Err(ref e) = self {
            let at = std::panic::Location::caller();
            warn!(
                target: "appwrite_dashboard_api",
                error = %e,
                file = %format!("{}:{}", at.file(), at.line()),
                context = %context.to_string(),
                "Upstream call failed"
            );
        }
        self
    }

    #[track_caller]
    fn degrade<S: ToString>(self, context: S) -> T
    where
        T: Default,
    {
        self.log(context).unwrap_or_default()
    }
}
