//! Cooperative cancellation of long running sampling calls.
//!
//! Samplers poll the interrupt once per locus. When it fires, the call returns
//! `Error::Interrupted` and the partially computed output is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;

use crate::errors::Error;

pub trait Interrupt {
    fn is_interrupted(&self) -> bool;
}

/// An interrupt that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupt;

impl Interrupt for NoInterrupt {
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl Interrupt for AtomicBool {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Interrupt for Arc<AtomicBool> {
    fn is_interrupted(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

pub(crate) fn check<I: Interrupt + ?Sized>(interrupt: &I) -> Result<()> {
    if interrupt.is_interrupted() {
        Err(Error::Interrupted.into())
    } else {
        Ok(())
    }
}
