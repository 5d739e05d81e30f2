//! Coercion engine configuration.

/// Context flags that change which conversions are built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CoercionConfig {
    /// Narrowing conversions check their range at run time, and constant
    /// conversions that leave the target range are errors.
    pub overflow_checked: bool,
    /// Integers widen implicitly to the native-size integers.
    pub unsafe_context: bool,
}

impl CoercionConfig {
    /// Checked arithmetic context.
    pub const fn checked() -> Self {
        CoercionConfig {
            overflow_checked: true,
            unsafe_context: false,
        }
    }

    #[must_use]
    pub const fn with_unsafe_context(mut self, unsafe_context: bool) -> Self {
        self.unsafe_context = unsafe_context;
        self
    }
}
