//! Tokio timer driver
//!
//! Hosts that run a tokio current-thread runtime can let this helper drive a
//! [`TreeView`] instead of calling [`TreeView::advance`] themselves.

use std::cell::RefCell;

use tracing::debug;

use crate::view::TreeView;

/// Sleeps until each pending deadline and advances the view, until no timer
/// is left
///
/// The view is only borrowed between sleeps, so other tasks on the same
/// runtime may keep using it. Returns the number of timers fired.
pub async fn drive_until_idle(view: &RefCell<TreeView>) -> usize {
    let mut fired = 0;

    loop {
        let Some(deadline) = view.borrow().next_deadline() else {
            break;
        };
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        let now = tokio::time::Instant::now().into_std();
        fired += view.borrow_mut().advance(now);
    }

    debug!(fired, "Timer driver idle");
    fired
}
