//! End-to-end session coverage over the fact engine and recording host.

#![allow(missing_docs)]

mod session_e2e;
mod suspension_e2e;
