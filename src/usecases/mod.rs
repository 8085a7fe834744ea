//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! transaction lifecycle. Each use case is a self-contained operation.
//!
//! Use cases:
//! - `TransactionBuilder`: Nonce + fee model + gas ceiling
//! - `TransactionBroadcaster`: Raw submission, node errors verbatim
//! - `ConfirmationWaiter`: Cancellable receipt polling
//! - `ConsentGate`: Blocking human confirmation
//! - `AddressSequencer`: One in-flight lifecycle per sender
//! - `TransactionPipeline`: Build → sign → broadcast → confirm
//! - `ApprovalFlow` / `SwapFlow`: Consented approve-then-swap path

pub mod approval;
pub mod broadcaster;
pub mod builder;
pub mod confirmation;
pub mod consent;
pub mod pipeline;
pub mod sequencer;
pub mod swap;

pub use approval::{ApprovalFlow, ApprovalOutcome, ApprovalRequest};
pub use broadcaster::TransactionBroadcaster;
pub use builder::TransactionBuilder;
pub use confirmation::{CancelHandle, CancelSignal, ConfirmationWaiter, PollPolicy, cancel_channel};
pub use consent::ConsentGate;
pub use pipeline::TransactionPipeline;
pub use sequencer::{AddressSequencer, SequenceGuard};
pub use swap::{SwapFlow, SwapOutcome, SwapRequest};
