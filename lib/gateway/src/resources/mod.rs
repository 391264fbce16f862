//! Thin per-resource clients.
//!
//! Each sub-client maps named operations onto gateway paths and delegates
//! to a shared [`GatewayClient`](crate::GatewayClient). They add no retry or
//! error behavior of their own.

mod agents;
mod deals;
mod documents;
mod market;
mod parcels;
mod screening;
mod workflows;

pub use agents::{AgentInvokeRequest, AgentName, AgentTaskStatus, AgentsClient, TaskHandle};
pub use deals::{DealStage, DealsClient};
pub use documents::DocumentsClient;
pub use market::{MarketClient, MarketDataRequest};
pub use parcels::ParcelsClient;
pub use screening::ScreeningClient;
pub use workflows::{
    RunHandle, RunStatus, StartWorkflowRequest, StepStatus, WorkflowRun, WorkflowStep,
    WorkflowsClient,
};
