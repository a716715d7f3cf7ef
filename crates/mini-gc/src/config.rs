//! Construction-time VM configuration.

/// Default maximum depth of the operand stack.
pub const DEFAULT_STACK_MAX: usize = 256;

/// Default live-object count at which the first collection runs. Also the
/// floor the threshold never drops below.
pub const DEFAULT_INITIAL_THRESHOLD: usize = 8;

/// Sizing for a [`Vm`](crate::Vm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Capacity of the root stack.
    pub stack_max: usize,
    /// Initial collection threshold and its lower bound.
    pub initial_threshold: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_max: DEFAULT_STACK_MAX,
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
        }
    }
}

impl VmConfig {
    /// Set the root stack capacity.
    #[must_use]
    pub const fn with_stack_max(mut self, stack_max: usize) -> Self {
        self.stack_max = stack_max;
        self
    }

    /// Set the initial collection threshold.
    #[must_use]
    pub const fn with_initial_threshold(mut self, initial_threshold: usize) -> Self {
        self.initial_threshold = initial_threshold;
        self
    }

    /// Check that the configuration can drive a VM.
    ///
    /// # Panics
    ///
    /// Panics if either field is zero. A zero threshold would collect
    /// before every allocation, and a zero-capacity stack cannot root
    /// anything.
    pub(crate) fn validate(&self) {
        assert!(self.stack_max > 0, "invalid config: stack_max must be non-zero");
        assert!(
            self.initial_threshold > 0,
            "invalid config: initial_threshold must be non-zero"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VmConfig::default();
        assert_eq!(config.stack_max, 256);
        assert_eq!(config.initial_threshold, 8);
        config.validate();
    }

    #[test]
    fn test_builder() {
        let config = VmConfig::default()
            .with_stack_max(16)
            .with_initial_threshold(2);
        assert_eq!(config.stack_max, 16);
        assert_eq!(config.initial_threshold, 2);
    }

    #[test]
    #[should_panic(expected = "initial_threshold must be non-zero")]
    fn test_zero_threshold_rejected() {
        VmConfig::default().with_initial_threshold(0).validate();
    }

    #[test]
    #[should_panic(expected = "stack_max must be non-zero")]
    fn test_zero_stack_rejected() {
        VmConfig::default().with_stack_max(0).validate();
    }
}
