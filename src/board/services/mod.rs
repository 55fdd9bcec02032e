//! Application services for the board.

mod barrier;
mod board;
mod sync;

pub use barrier::{FaultBarrier, RESET_HINT, RecoveryScreen};
pub use board::{Board, BoardError, BoardResult, ColumnView, RefreshSummary};
pub use sync::{RemoteSync, SyncEvent, SyncOp};
