//! Asynchronous dispatch of remote calls with completion events.
//!
//! Every remote call runs as its own Tokio task. Outcomes are posted as
//! [`SyncEvent`]s on a channel the board drains on its own schedule, so the
//! stores are only ever mutated by their owner.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::board::{
    domain::{RawTaskRecord, TaskFields, TaskId},
    ports::{RemoteError, RemoteResult, TaskRemote},
};

/// A remote call issued on behalf of a local mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOp {
    /// Create a task that is known locally under a provisional identifier.
    Create {
        /// Identifier the task carries until the remote one is known.
        provisional: TaskId,
        /// Fields to store.
        fields: TaskFields,
    },
    /// Replace the fields of a task.
    Update {
        /// Addressed task.
        id: TaskId,
        /// New fields.
        fields: TaskFields,
    },
    /// Delete an active task.
    Delete {
        /// Addressed task.
        id: TaskId,
    },
    /// Archive a task.
    Archive {
        /// Addressed task.
        id: TaskId,
    },
    /// Restore an archived task, then store `reassigned` fields when the
    /// task had to move to another column.
    Restore {
        /// Addressed task.
        id: TaskId,
        /// Fields to store after restoring, if the status changed.
        reassigned: Option<TaskFields>,
    },
    /// Delete an archived task for good.
    PermanentDelete {
        /// Addressed task.
        id: TaskId,
    },
}

impl SyncOp {
    /// Returns the identifier of the addressed task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        match self {
            Self::Create { provisional, .. } => provisional,
            Self::Update { id, .. }
            | Self::Delete { id }
            | Self::Archive { id }
            | Self::Restore { id, .. }
            | Self::PermanentDelete { id } => id,
        }
    }

    /// Returns a human-readable name of the operation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create task",
            Self::Update { .. } => "update task",
            Self::Delete { .. } => "delete task",
            Self::Archive { .. } => "archive task",
            Self::Restore { .. } => "restore task",
            Self::PermanentDelete { .. } => "permanently delete task",
        }
    }

    /// Returns the same operation addressed to `id`.
    #[must_use]
    pub fn retarget(self, id: TaskId) -> Self {
        match self {
            Self::Create { fields, .. } => Self::Create {
                provisional: id,
                fields,
            },
            Self::Update { fields, .. } => Self::Update { id, fields },
            Self::Delete { .. } => Self::Delete { id },
            Self::Archive { .. } => Self::Archive { id },
            Self::Restore { reassigned, .. } => Self::Restore { id, reassigned },
            Self::PermanentDelete { .. } => Self::PermanentDelete { id },
        }
    }
}

/// Outcome of a dispatched remote call.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A create call returned the stored record.
    Created {
        /// Identifier the task carried locally.
        provisional: TaskId,
        /// Raw record returned by the collaborator.
        record: RawTaskRecord,
    },
    /// A call other than create succeeded.
    Completed {
        /// The operation.
        op: SyncOp,
    },
    /// A call failed.
    Failed {
        /// The operation.
        op: SyncOp,
        /// Why it failed.
        error: RemoteError,
    },
}

/// Dispatcher for remote calls.
///
/// Calls addressing a task whose create call is still outstanding are held
/// back and sent with the confirmed identifier once it is known. A task
/// whose create call failed exists only locally: calls addressing it are
/// not sent until a new create call for it is dispatched.
#[derive(Debug)]
pub struct RemoteSync<R>
where
    R: TaskRemote + 'static,
{
    remote: Arc<R>,
    sender: UnboundedSender<SyncEvent>,
    receiver: UnboundedReceiver<SyncEvent>,
    deferred: HashMap<TaskId, Vec<SyncOp>>,
    local_only: HashSet<TaskId>,
    in_flight: usize,
}

impl<R> RemoteSync<R>
where
    R: TaskRemote + 'static,
{
    /// Creates a dispatcher for `remote`.
    #[must_use]
    pub fn new(remote: Arc<R>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            remote,
            sender,
            receiver,
            deferred: HashMap::new(),
            local_only: HashSet::new(),
            in_flight: 0,
        }
    }

    /// Returns the remote collaborator.
    #[must_use]
    pub const fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    /// Sends `op`, or holds it back while the addressed task's create call
    /// is outstanding.
    ///
    /// Calls addressing a local-only task are skipped; deleting one forgets
    /// it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, op: SyncOp) {
        if let SyncOp::Create { provisional, .. } = &op {
            self.local_only.remove(provisional);
            self.deferred.entry(provisional.clone()).or_default();
        } else if self.local_only.contains(op.task_id()) {
            if matches!(op, SyncOp::Delete { .. } | SyncOp::PermanentDelete { .. }) {
                self.local_only.remove(op.task_id());
            }
            debug!(
                task_id = %op.task_id(),
                operation = op.label(),
                "task exists only locally; not sending"
            );
            return;
        } else if let Some(waiting) = self.deferred.get_mut(op.task_id()) {
            debug!(task_id = %op.task_id(), operation = op.label(), "deferring until create completes");
            waiting.push(op);
            return;
        }
        self.spawn(op);
    }

    /// Releases operations held back for `provisional`, addressed to
    /// `confirmed`.
    pub fn on_created(&mut self, provisional: &TaskId, confirmed: &TaskId) {
        let Some(waiting) = self.deferred.remove(provisional) else {
            return;
        };
        for op in waiting {
            self.spawn(op.retarget(confirmed.clone()));
        }
    }

    /// Drops operations held back for a create call that failed and marks
    /// the task local-only.
    ///
    /// Returns how many were dropped.
    pub fn on_create_failed(&mut self, provisional: &TaskId) -> usize {
        self.local_only.insert(provisional.clone());
        let dropped = self
            .deferred
            .remove(provisional)
            .map_or(0, |waiting| waiting.len());
        if dropped > 0 {
            warn!(task_id = %provisional, dropped, "dropping operations queued behind failed create");
        }
        dropped
    }

    /// Returns `true` while a create call for `provisional` is outstanding.
    #[must_use]
    pub fn is_pending_create(&self, provisional: &TaskId) -> bool {
        self.deferred.contains_key(provisional)
    }

    /// Returns `true` when the task's create call failed and has not been
    /// dispatched again.
    #[must_use]
    pub fn is_local_only(&self, id: &TaskId) -> bool {
        self.local_only.contains(id)
    }

    /// Returns `true` while the service does not know the task yet: its
    /// create call is outstanding or failed.
    #[must_use]
    pub fn is_unconfirmed(&self, id: &TaskId) -> bool {
        self.is_pending_create(id) || self.is_local_only(id)
    }

    /// Returns the number of dispatched calls whose outcome has not been
    /// received yet.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Forgets every held-back operation and local-only task.
    pub fn clear_deferred(&mut self) {
        self.deferred.clear();
        self.local_only.clear();
    }

    /// Returns a completion event if one is ready, without waiting.
    pub fn try_next_event(&mut self) -> Option<SyncEvent> {
        let event = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event)
    }

    /// Waits for the next completion event.
    ///
    /// Returns `None` at once when no call is in flight.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.receiver.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event)
    }

    fn spawn(&mut self, op: SyncOp) {
        debug!(task_id = %op.task_id(), operation = op.label(), "dispatching remote call");
        let remote = Arc::clone(&self.remote);
        let sender = self.sender.clone();
        self.in_flight = self.in_flight.saturating_add(1);
        tokio::spawn(async move {
            let event = execute(remote.as_ref(), op).await;
            if sender.send(event).is_err() {
                debug!("board dropped before remote call completed");
            }
        });
    }
}

async fn execute<R>(remote: &R, op: SyncOp) -> SyncEvent
where
    R: TaskRemote + ?Sized,
{
    let result = match &op {
        SyncOp::Create {
            provisional,
            fields,
        } => match remote.create_task(fields).await {
            Ok(record) => {
                return SyncEvent::Created {
                    provisional: provisional.clone(),
                    record,
                };
            }
            Err(error) => Err(error),
        },
        SyncOp::Update { id, fields } => remote.update_task(id, fields).await,
        SyncOp::Delete { id } => remote.delete_task(id).await,
        SyncOp::Archive { id } => remote.archive_task(id).await,
        SyncOp::Restore { id, reassigned } => restore(remote, id, reassigned.as_ref()).await,
        SyncOp::PermanentDelete { id } => remote.permanently_delete_task(id).await,
    };
    match result {
        Ok(()) => SyncEvent::Completed { op },
        Err(error) => SyncEvent::Failed { op, error },
    }
}

async fn restore<R>(remote: &R, id: &TaskId, reassigned: Option<&TaskFields>) -> RemoteResult<()>
where
    R: TaskRemote + ?Sized,
{
    remote.restore_task(id).await?;
    if let Some(fields) = reassigned {
        remote.update_task(id, fields).await?;
    }
    Ok(())
}
