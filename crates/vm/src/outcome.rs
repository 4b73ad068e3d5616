//! Terminal results of an execution.

use std::fmt;

use crate::error::Fault;

/// How a frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `STOP`, or the program counter ran off the end of the code.
    Stop,
    /// `RETURN` with output data.
    Return,
    /// `REVERT`: intentional failure that keeps output and unused gas.
    Revert,
    /// Abnormal termination. All gas is forfeit.
    Fault(Fault),
}

impl Status {
    /// True for `Stop` and `Return`.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Stop | Status::Return)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Stop => f.write_str("stop"),
            Status::Return => f.write_str("return"),
            Status::Revert => f.write_str("revert"),
            Status::Fault(fault) => write!(f, "fault: {fault}"),
        }
    }
}

/// The immutable result of running a frame to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub status: Status,
    /// Return or revert data. Empty for `Stop` and faults.
    pub output: Vec<u8>,
    /// Gas left in the meter when the frame halted.
    pub gas_remaining: u64,
    /// Program counter of the halting instruction (or the code length for
    /// an implicit stop).
    pub pc: usize,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The fault, if the frame faulted.
    pub fn fault(&self) -> Option<Fault> {
        match self.status {
            Status::Fault(fault) => Some(fault),
            _ => None,
        }
    }

    /// Gas returned to the caller: everything left for normal halts and
    /// reverts, nothing for faults.
    pub fn gas_refundable(&self) -> u64 {
        match self.status {
            Status::Fault(_) => 0,
            _ => self.gas_remaining,
        }
    }
}
