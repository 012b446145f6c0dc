//! Task handles and the polling state machine.
//!
//! Every mutating call against the cluster returns a task-shaped
//! response. [`TaskHandle`] wraps that response and exposes a blocking
//! wait that polls the task status until it reaches a terminal state,
//! turning the asynchronous backend into synchronous-looking semantics
//! for the caller.

use std::time::Duration;

use tracing::{debug, instrument, trace, warn};

use crate::client::Client;
use crate::endpoints;
use crate::error::{Error, TaskError, TransportError};

/// Terminal and non-terminal task states reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// Accepted, not yet started. Non-terminal.
    Queued,
    /// In progress. Non-terminal.
    Running,
    /// Terminal success.
    Complete,
    /// Terminal failure.
    Error,
    /// The task never started; terminal failure.
    Uninitialized,
    /// Any state this client does not know. Treated as terminal success
    /// so that new benign states do not wedge the poll loop.
    Other(String),
}

impl TaskState {
    /// Parse a wire state string.
    pub fn parse(state: &str) -> Self {
        match state {
            "QUEUED" => TaskState::Queued,
            "RUNNING" => TaskState::Running,
            "COMPLETE" => TaskState::Complete,
            "ERROR" => TaskState::Error,
            "UNINITIALIZED" => TaskState::Uninitialized,
            other => TaskState::Other(other.to_string()),
        }
    }

    /// Whether polling should stop at this state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Queued | TaskState::Running)
    }

    /// Whether this is a terminal failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskState::Error | TaskState::Uninitialized)
    }

    /// The wire representation of this state.
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Queued => "QUEUED",
            TaskState::Running => "RUNNING",
            TaskState::Complete => "COMPLETE",
            TaskState::Error => "ERROR",
            TaskState::Uninitialized => "UNINITIALIZED",
            TaskState::Other(s) => s,
        }
    }
}

/// Local handle for an in-flight or completed asynchronous operation.
///
/// Constructed from a mutation response; consumed by [`TaskHandle::wait`].
/// A handle without a task tag is inert: the API performed the mutation
/// synchronously (or it was a no-op), and waiting returns immediately
/// without any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    task_tag: Option<String>,
    created_uuid: Option<String>,
}

impl TaskHandle {
    /// Create a handle from wire identifiers. Empty strings normalize
    /// to absent, which keeps the inertness guard in one place.
    pub fn new(task_tag: Option<String>, created_uuid: Option<String>) -> Self {
        Self {
            task_tag: task_tag.filter(|t| !t.is_empty()),
            created_uuid: created_uuid.filter(|u| !u.is_empty()),
        }
    }

    /// Create an inert handle: waiting on it is a no-op.
    pub fn inert() -> Self {
        Self {
            task_tag: None,
            created_uuid: None,
        }
    }

    /// The task tag, if the operation is tracked by a task.
    pub fn task_tag(&self) -> Option<&str> {
        self.task_tag.as_deref()
    }

    /// The UUID of the record this operation created, if any.
    pub fn created_uuid(&self) -> Option<&str> {
        self.created_uuid.as_deref()
    }

    /// Block until the remote operation is durable.
    ///
    /// Polls the task status at the client's poll interval. A status
    /// record that has vanished is treated as terminal success: the
    /// cluster garbage-collects completed task records. `ERROR` and
    /// `UNINITIALIZED` abort with a [`TaskError`].
    ///
    /// No overall deadline is enforced here; each individual poll uses
    /// the client's per-request timeout, and the future is cancel-safe,
    /// so an enclosing `tokio::time::timeout` (or [`Self::wait_timeout`])
    /// bounds the total wait.
    #[instrument(skip(self, client), fields(task_tag = self.task_tag.as_deref().unwrap_or("-")))]
    pub async fn wait(&self, client: &Client) -> Result<(), Error> {
        let Some(tag) = self.task_tag.as_deref() else {
            trace!("No task tag; nothing to wait for");
            return Ok(());
        };

        let path = format!("{}/{}", endpoints::TASK_TAG, tag);
        loop {
            let Some(status) = client.get_record(&path, None, false, None).await? else {
                // The cluster no longer tracks the task; assume it
                // completed and was garbage-collected.
                debug!("Task record vanished; assuming success");
                return Ok(());
            };

            let state = TaskState::parse(status.str_field("state")?);
            trace!(state = state.as_str(), "Polled task status");

            if state.is_failure() {
                let message = status
                    .get("formattedMessage")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                warn!(state = state.as_str(), "Task failed");
                return Err(TaskError {
                    task_tag: tag.to_string(),
                    state: state.as_str().to_string(),
                    message,
                }
                .into());
            }
            if state.is_terminal() {
                debug!(state = state.as_str(), "Task complete");
                return Ok(());
            }

            tokio::time::sleep(client.task_poll_interval()).await;
        }
    }

    /// [`Self::wait`] bounded by an overall deadline.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] if the task does not reach a
    /// terminal state within `limit`.
    pub async fn wait_timeout(&self, client: &Client, limit: Duration) -> Result<(), Error> {
        tokio::time::timeout(limit, self.wait(client))
            .await
            .map_err(|_| Error::Transport(TransportError::Timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifiers_normalize_to_inert() {
        let handle = TaskHandle::new(Some(String::new()), Some(String::new()));
        assert_eq!(handle, TaskHandle::inert());
        assert!(handle.task_tag().is_none());
        assert!(handle.created_uuid().is_none());
    }

    #[test]
    fn identifiers_are_preserved() {
        let handle = TaskHandle::new(Some("123".to_string()), Some("u-1".to_string()));
        assert_eq!(handle.task_tag(), Some("123"));
        assert_eq!(handle.created_uuid(), Some("u-1"));
    }

    #[test]
    fn state_parsing() {
        assert_eq!(TaskState::parse("QUEUED"), TaskState::Queued);
        assert_eq!(TaskState::parse("RUNNING"), TaskState::Running);
        assert_eq!(TaskState::parse("COMPLETE"), TaskState::Complete);
        assert_eq!(TaskState::parse("ERROR"), TaskState::Error);
        assert_eq!(TaskState::parse("UNINITIALIZED"), TaskState::Uninitialized);
        assert_eq!(
            TaskState::parse("DRAINING"),
            TaskState::Other("DRAINING".to_string())
        );
    }

    #[test]
    fn terminality_and_failure() {
        assert!(!TaskState::Queued.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Complete.is_terminal());
        assert!(TaskState::Error.is_terminal());
        assert!(TaskState::Uninitialized.is_terminal());
        // Unknown states terminate the loop but are not failures.
        let other = TaskState::Other("DRAINING".to_string());
        assert!(other.is_terminal());
        assert!(!other.is_failure());

        assert!(TaskState::Error.is_failure());
        assert!(TaskState::Uninitialized.is_failure());
        assert!(!TaskState::Complete.is_failure());
    }
}
