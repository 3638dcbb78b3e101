//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. CORS: answers preflight requests before anything else runs
//! 2. Access logger: method, path, status, latency

pub mod audit;
