//! HRMOS attendance adapter.
//!
//! Implements the `AttendanceLedger` port over the HRMOS REST API.

mod client;
mod dto;

pub use client::{HrmosClient, HrmosClientError, HrmosConfig, PAGE_SIZE};
