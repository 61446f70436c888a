//! RAII call-depth tracking.
//!
//! Component calls and function calls each hold a [`CallGuard`] while their
//! body runs. Dropping the guard (including during unwinding) restores the
//! depth, so an error deep in a call chain cannot leave the counter raised.

use std::cell::Cell;

use crate::errors::{call_depth_exceeded, EvalResult};

pub struct CallGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> CallGuard<'a> {
    pub(super) fn enter(depth: &'a Cell<usize>, limit: usize) -> EvalResult<Self> {
        let next = depth.get() + 1;
        if next > limit {
            return Err(call_depth_exceeded(limit));
        }
        depth.set(next);
        Ok(CallGuard { depth })
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
