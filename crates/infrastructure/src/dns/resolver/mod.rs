mod core;
mod dispatch;
mod name_servers;
pub mod trace;

pub use core::IterativeResolver;
pub use trace::TRACE_TARGET;
