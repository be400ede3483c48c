/// An enum acting like a `Result`, but producing warnings instead of errors.
///
/// As there are no error values, there is always an "ok" value, which can be associated with one or more warnings.
pub(crate) enum WarningResult<T, W> {
    Ok(T),
    Warned(T, Vec<W>),
}

impl<T, W> WarningResult<T, W> {
    /// Consumes the warnings, returning the value.
    ///
    /// The warnings are passed to the provided callback.
    pub(crate) fn consume_warnings<F>(self, f: F) -> T
    where
        F: FnOnce(Vec<W>),
    {
        match self {
            WarningResult::Ok(t) => t,
            WarningResult::Warned(t, w) => {
                f(w);
                t
            }
        }
    }

    /// Adds a warning, turning an `Ok` value into a `Warned` one.
    pub(crate) fn warn(self, warning: W) -> Self {
        match self {
            WarningResult::Ok(t) => WarningResult::Warned(t, vec![warning]),
            WarningResult::Warned(t, mut w) => {
                w.push(warning);
                WarningResult::Warned(t, w)
            }
        }
    }

    /// Maps the value, keeping the warnings.
    pub(crate) fn map<U, F>(self, f: F) -> WarningResult<U, W>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            WarningResult::Ok(t) => WarningResult::Ok(f(t)),
            WarningResult::Warned(t, w) => WarningResult::Warned(f(t), w),
        }
    }

    /// Zips two `WarningResult`.
    ///
    /// The value of the returned `WarningResult` is the couple of the initial values,
    /// and its warnings are the concatenation of the initial ones.
    pub(crate) fn zip<U>(self, other: WarningResult<U, W>) -> WarningResult<(T, U), W> {
        match (self, other) {
            (WarningResult::Ok(t), WarningResult::Ok(u)) => WarningResult::Ok((t, u)),
            (WarningResult::Ok(t), WarningResult::Warned(u, w))
            | (WarningResult::Warned(t, w), WarningResult::Ok(u)) => WarningResult::Warned((t, u), w),
            (WarningResult::Warned(t, w1), WarningResult::Warned(u, w2)) => {
                WarningResult::Warned((t, u), w1.into_iter().chain(w2).collect())
            }
        }
    }
}
