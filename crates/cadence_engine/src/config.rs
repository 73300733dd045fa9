//! Configuration for ECS instances.

/// Per-instance tuning and diagnostics.
///
/// A registry holds one default config applied to every instance it
/// creates; [`EcsRegistry::create_with`](crate::EcsRegistry::create_with)
/// overrides it per instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EcsConfig {
    /// Slots reserved up front in the entity storage.
    pub entity_capacity: usize,

    /// Slots reserved up front in the system storage.
    pub system_capacity: usize,

    /// Emit a `trace` event for every lifecycle hook invocation.
    pub trace_hooks: bool,

    /// Panic on a command whose target vanished earlier in the same drain,
    /// instead of logging and skipping it.
    pub strict_commands: bool,
}

impl EcsConfig {
    /// Creates a configuration for development: hooks traced, strict drain.
    #[must_use]
    pub fn development() -> Self {
        Self {
            trace_hooks: true,
            strict_commands: true,
            ..Self::default()
        }
    }

    /// Creates a configuration for shipping builds.
    #[must_use]
    pub fn release() -> Self {
        Self::default()
    }

    /// Builder method to reserve entity slots.
    #[must_use]
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Builder method to reserve system slots.
    #[must_use]
    pub fn with_system_capacity(mut self, capacity: usize) -> Self {
        self.system_capacity = capacity;
        self
    }

    /// Builder method to toggle hook tracing.
    #[must_use]
    pub fn with_trace_hooks(mut self, trace_hooks: bool) -> Self {
        self.trace_hooks = trace_hooks;
        self
    }

    /// Builder method to toggle strict command handling.
    #[must_use]
    pub fn with_strict_commands(mut self, strict_commands: bool) -> Self {
        self.strict_commands = strict_commands;
        self
    }
}
