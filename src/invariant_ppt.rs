//! Runtime invariant checks with a per-thread record of which ones ran.
//!
//! Screen transitions call [`assert_invariant!`] after mutating state. Tests
//! then call [`contract_test`] to prove the checks were actually reached, so a
//! refactor that silently skips a check fails loudly.
//!
//! ```rust,ignore
//! assert_invariant!(
//!     screen.photo().is_some() == screen.is_reviewing(),
//!     "Photo is held exactly while reviewing",
//!     "retake"
//! );
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;

thread_local! {
    static CHECKED: RefCell<BTreeSet<String>> = const { RefCell::new(BTreeSet::new()) };
}

/// Check an invariant and record that it was evaluated. Panics when it does not hold.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::record_check($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::record_check($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn record_check(holds: bool, message: &str, context: Option<&str>) {
    CHECKED.with(|checked| {
        checked.borrow_mut().insert(message.to_string());
    });

    if !holds {
        let context = context.unwrap_or("unknown");
        log::error!("Invariant violated in {}: {}", context, message);
        panic!("INVARIANT VIOLATION [{}]: {}", context, message);
    }
}

/// Panics unless every listed invariant was evaluated on this thread.
pub fn contract_test(name: &str, required: &[&str]) {
    let missing: Vec<&str> = CHECKED.with(|checked| {
        let checked = checked.borrow();
        required
            .iter()
            .copied()
            .filter(|message| !checked.contains(*message))
            .collect()
    });

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: invariants never checked:\n  - {}",
            name,
            missing.join("\n  - ")
        );
    }
}

pub fn clear_invariant_log() {
    CHECKED.with(|checked| checked.borrow_mut().clear());
}
