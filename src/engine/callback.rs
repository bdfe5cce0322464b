//! One-shot authorization for the venue's reentrant callback.
//!
//! Before handing control to the venue, the engine arms a single slot
//! with the caller it expects, the selector that caller must present and
//! what to do when the callback arrives. The callback consumes the slot.
//! After the venue returns, the slot must be empty again.

use alloy_primitives::{Address, Selector};

use crate::error::{NettingError, Result};

/// Work resumed inside an authorized callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Fund, execute and settle the pending route.
    SettleRoute,
}

/// The armed expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackToken {
    pub caller: Address,
    pub selector: Selector,
    pub continuation: Continuation,
}

/// Single-slot callback guard.
#[derive(Debug, Default)]
pub struct CallbackAuthorization {
    slot: Option<CallbackToken>,
}

impl CallbackAuthorization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot for `caller` / `selector`.
    ///
    /// Re-arming for the same pair replaces the continuation.
    ///
    /// # Errors
    ///
    /// `ReentrantCallback` if the slot already holds a different pair.
    pub fn arm(&mut self, caller: Address, selector: Selector, continuation: Continuation) -> Result<()> {
        if let Some(token) = self.slot {
            if token.caller != caller || token.selector != selector {
                return Err(NettingError::ReentrantCallback(token.caller));
            }
        }
        self.slot = Some(CallbackToken {
            caller,
            selector,
            continuation,
        });
        Ok(())
    }

    /// Validate an incoming callback and clear the slot.
    ///
    /// # Errors
    ///
    /// - `CallbackNotArmed` if nothing is armed
    /// - `ConfusedCallback` if the caller or selector differ; the slot stays armed
    pub fn consume(&mut self, caller: Address, selector: Selector) -> Result<Continuation> {
        let token = self.slot.ok_or(NettingError::CallbackNotArmed)?;
        if token.caller != caller || token.selector != selector {
            return Err(NettingError::ConfusedCallback {
                expected_caller: token.caller,
                expected_selector: token.selector,
                caller,
                selector,
            });
        }
        self.slot = None;
        Ok(token.continuation)
    }

    /// Check the armed callback actually ran.
    pub fn assert_spent(&self) -> Result<()> {
        match self.slot {
            Some(token) => Err(NettingError::OperatorNotSpent(token.caller)),
            None => Ok(()),
        }
    }

    pub fn armed(&self) -> Option<&CallbackToken> {
        self.slot.as_ref()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Drop any armed token (used on abort)
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
