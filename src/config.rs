//! Configuration for spawned units of work

/// What a streaming producer does once its consumer has dropped the conduit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbandonPolicy {
    /// Stop calling `step`; the task ends after the failed delivery
    #[default]
    Stop,
    /// Keep calling `step` until it asks to stop, discarding every result
    Drain,
}

/// Per-invocation settings for [`spawn_do_with_config`](crate::spawn_do_with_config)
/// and [`spawn_stream_with_config`](crate::spawn_stream_with_config)
#[derive(Debug, Clone)]
pub struct TaskConfig {
    /// Shows up in log records for this task
    pub label: String,
    pub abandon_policy: AbandonPolicy,
}

impl TaskConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_abandon_policy(mut self, policy: AbandonPolicy) -> Self {
        self.abandon_policy = policy;
        self
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            label: "task".to_string(),
            abandon_policy: AbandonPolicy::Stop,
        }
    }
}
