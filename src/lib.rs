//! rs2-outcome - run a unit of work on its own task and observe its outcome(s)
//!
//! Two primitives, both returning immediately with a [`Conduit`]:
//!
//! - [`spawn_do`] runs an action once and delivers exactly one [`Outcome`].
//! - [`spawn_stream`] calls a step function in a loop and delivers one
//!   [`Outcome`] per iteration until the step says stop.
//!
//! Each call spawns its own Tokio task; there is no pool and no limit. The
//! cancellation context is a pass-through value: the unit of work must observe
//! it. Delivery is a one-slot rendezvous, so a conduit that is held but never
//! read parks its producer for good. Panics inside the unit of work are not
//! converted into outcomes; they resurface on the consumer when it reaches the
//! end of the conduit.

pub mod conduit;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod outcome;
pub mod outcome_stream_ext;
pub mod stream;

pub use conduit::Conduit;
pub use config::{AbandonPolicy, TaskConfig};
pub use context::CancellationContext;
pub use error::{BoxError, CancelReason, TryRecvError};
pub use exec::{spawn_do, spawn_do_blocking, spawn_do_with_config};
pub use outcome::Outcome;
pub use outcome_stream_ext::{OutcomeStream, OutcomeStreamExt};
pub use stream::{spawn_stream, spawn_stream_blocking, spawn_stream_with_config, Step};
