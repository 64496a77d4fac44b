//! Test execution engine
//!
//! Builds console runner command lines, invokes them one at a time and
//! extracts the statistics trailer from each run.

mod command;
mod extractor;
mod invoker;
mod sequencer;

pub use invoker::ProcessInvoker;
pub use sequencer::Sequencer;
