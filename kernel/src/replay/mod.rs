//! Path replay: the reachability oracle and the step-by-step walker.

pub mod oracle;
pub mod walk;
