use std::fmt;

const MASK: &str = "****";

/// Holds a sensitive value (signing key, API secret) so that it cannot leak through logging. Both `Debug` and
/// `Display` print a fixed mask; the only way at the inner value is an explicit [`Secret::reveal`] call.
#[derive(Clone, Default)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Hands out the protected value. Use it on the spot rather than storing the reference somewhere visible.
    pub fn reveal(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}
