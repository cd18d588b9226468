//! Transfer action coordination: indicator, gate, handshake, executor,
//! completion and the registry that exposes them to the host.

pub mod executor;
pub mod gate;
pub mod handshake;
pub mod indicator;
pub mod notifier;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use executor::TransferExecutor;
pub use gate::{AuthenticationGate, GateDecision};
pub use handshake::AuthorizationHandshake;
pub use indicator::{IndicatorState, LoadingIndicator};
pub use notifier::CompletionNotifier;
pub use pipeline::{ActionPipeline, Collaborators, InvocationContext, InvocationReport};
pub use registry::{ActionHandler, ActionRegistry};
pub use types::{
    AuthStatus, OperationKind, OperationOutcome, Selection, TargetItem, TargetItems,
    TransferResponse,
};
