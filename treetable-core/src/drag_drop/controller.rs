//! Drag gesture state machine.
//!
//! The controller tracks which node is being dragged and where it would land,
//! schedules the hover auto-expand and the landed highlight, and performs the
//! move on drop. Invalid gestures quietly reset the transient state.

use std::time::Instant;

use tracing::debug;

use super::{DropPosition, MoveOutcome, MoveRejection, move_node, validate_move};
use crate::config::DragSettings;
use crate::locator::locate;
use crate::models::{ExpansionState, TreeNode};
use crate::timers::{TimerEvent, TimerQueue, TimerToken};

/// Landing slot shown to the user while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LandingPosition {
    /// Would land before the hovered node
    Before,
    /// Would land after the hovered node
    After,
    /// Would become the hovered node's last child
    Child,
    /// A drop just completed on the landing node
    Landed,
    /// Nothing is being hovered
    #[default]
    None,
}

impl LandingPosition {
    /// The drop slot this landing position stands for, if any
    #[must_use]
    pub const fn drop_position(self) -> Option<DropPosition> {
        match self {
            Self::Before => Some(DropPosition::Before),
            Self::After => Some(DropPosition::After),
            Self::Child => Some(DropPosition::Child),
            Self::Landed | Self::None => None,
        }
    }
}

impl From<DropPosition> for LandingPosition {
    fn from(position: DropPosition) -> Self {
        match position {
            DropPosition::Before => Self::Before,
            DropPosition::After => Self::After,
            DropPosition::Child => Self::Child,
        }
    }
}

/// Observable drag state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragState {
    dragged: Option<String>,
    landing_node: Option<String>,
    landing_position: LandingPosition,
    tree_updated: u64,
}

impl DragState {
    /// Key of the node being dragged
    #[must_use]
    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    /// Key of the node currently hovered or just landed on
    #[must_use]
    pub fn landing_node(&self) -> Option<&str> {
        self.landing_node.as_deref()
    }

    /// Current landing position
    #[must_use]
    pub const fn landing_position(&self) -> LandingPosition {
        self.landing_position
    }

    /// Counter bumped after every successful move
    #[must_use]
    pub const fn tree_updated(&self) -> u64 {
        self.tree_updated
    }

    fn clear_landing(&mut self) {
        self.landing_node = None;
        self.landing_position = LandingPosition::None;
    }
}

/// Drives drag gestures over the tree
#[derive(Debug)]
pub struct DragController {
    settings: DragSettings,
    state: DragState,
    expand_timer: Option<TimerToken>,
    highlight_timer: Option<TimerToken>,
}

impl DragController {
    /// Creates an idle controller
    #[must_use]
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            state: DragState::default(),
            expand_timer: None,
            highlight_timer: None,
        }
    }

    /// Current drag state
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// Drag settings in use
    #[must_use]
    pub const fn settings(&self) -> &DragSettings {
        &self.settings
    }

    /// Starts dragging `key`
    ///
    /// A landed highlight left over from the previous drop is cleared.
    pub fn drag_start(&mut self, key: impl Into<String>, timers: &mut TimerQueue) {
        self.state.dragged = Some(key.into());
        if self.state.landing_position == LandingPosition::Landed {
            self.state.clear_landing();
        }
        if let Some(token) = self.highlight_timer.take() {
            timers.cancel(token);
        }
    }

    /// Hovers the dragged node over `target_key` at `position`
    ///
    /// Ignored when nothing is dragged, when hovering the dragged node itself
    /// or one of its descendants. Hovering the middle of a node with children
    /// schedules a one-shot expand toggle after the configured delay.
    pub fn drag_over(
        &mut self,
        roots: &[TreeNode],
        target_key: &str,
        position: DropPosition,
        now: Instant,
        timers: &mut TimerQueue,
    ) {
        let Some(dragged) = self.state.dragged.as_deref() else {
            return;
        };
        match validate_move(roots, dragged, target_key) {
            Ok(()) => {}
            Err(MoveRejection::SameNode | MoveRejection::TargetIsDescendant) => return,
            Err(reason) => {
                debug!(%reason, target_key, "Ignoring drag over");
                return;
            }
        }

        self.state.landing_node = Some(target_key.to_string());
        self.state.landing_position = position.into();

        let has_children = locate(target_key, roots).is_some_and(|found| found.node.has_children());
        if self.expand_timer.is_none() && position == DropPosition::Child && has_children {
            self.expand_timer = Some(timers.schedule(
                now,
                self.settings.expand_delay(),
                TimerEvent::DragExpand {
                    key: target_key.to_string(),
                },
            ));
        }
    }

    /// Pointer left the hovered row
    pub fn drag_leave(&mut self, timers: &mut TimerQueue) {
        if self.state.landing_position != LandingPosition::Landed {
            self.state.clear_landing();
        }
        self.cancel_expand_timer(timers);
    }

    /// Drops the dragged node on `target_key`
    ///
    /// Uses the landing position recorded by the last [`drag_over`]; without
    /// one the node is dropped before the target. On success the landing
    /// switches to [`LandingPosition::Landed`] and a timer is armed to clear it.
    ///
    /// [`drag_over`]: Self::drag_over
    pub fn drop_on(
        &mut self,
        roots: &mut Vec<TreeNode>,
        expansion: &mut ExpansionState,
        target_key: &str,
        now: Instant,
        timers: &mut TimerQueue,
    ) -> MoveOutcome {
        self.cancel_expand_timer(timers);

        let Some(dragged) = self.state.dragged.clone() else {
            self.reset();
            return MoveOutcome::Rejected(MoveRejection::DraggedNotFound);
        };
        let position = self
            .state
            .landing_position
            .drop_position()
            .unwrap_or(DropPosition::Before);

        let outcome = move_node(roots, expansion, &dragged, target_key, position);
        if !outcome.is_moved() {
            self.reset();
            return outcome;
        }

        self.state.landing_node = Some(target_key.to_string());
        self.state.landing_position = LandingPosition::Landed;
        if let Some(token) = self.highlight_timer.take() {
            timers.cancel(token);
        }
        self.highlight_timer = Some(timers.schedule(
            now,
            self.settings.drop_highlight_duration(),
            TimerEvent::DropHighlightClear,
        ));
        self.state.dragged = None;
        self.mark_tree_updated();
        outcome
    }

    /// Handles a fired drag-expand timer
    ///
    /// Returns the key whose expansion should be toggled, or `None` when the
    /// token is stale. The timer handle stays recorded so hovering the same
    /// row does not re-arm it until the pointer leaves.
    pub fn on_drag_expand(&self, token: TimerToken, key: &str) -> Option<String> {
        (self.expand_timer == Some(token)).then(|| key.to_string())
    }

    /// Handles a fired landed-highlight timer
    pub fn on_highlight_clear(&mut self, token: TimerToken) {
        if self.highlight_timer != Some(token) {
            return;
        }
        self.highlight_timer = None;
        if self.state.landing_position == LandingPosition::Landed {
            self.state.clear_landing();
        }
    }

    /// Bumps the tree-updated counter
    pub(crate) fn mark_tree_updated(&mut self) {
        self.state.tree_updated += 1;
    }

    fn cancel_expand_timer(&mut self, timers: &mut TimerQueue) {
        if let Some(token) = self.expand_timer.take() {
            timers.cancel(token);
        }
    }

    // Landed highlight survives a reset; only the hover state goes.
    fn reset(&mut self) {
        if self.state.landing_position != LandingPosition::Landed {
            self.state.clear_landing();
        }
        self.state.dragged = None;
    }
}
