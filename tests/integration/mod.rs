/// End-to-end flows across observation, policy, planning and execution
pub mod observation;
pub mod reconcile_flow;
