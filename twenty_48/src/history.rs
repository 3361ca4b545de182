use std::collections::VecDeque;

use serde::Deserialize;

use crate::Board;

/// How much undo a session keeps around.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoPolicy {
    Disabled,
    /// Keep at most this many snapshots, dropping the oldest.
    Limited(usize),
    #[default]
    Unlimited,
}

impl UndoPolicy {
    fn capacity(self) -> Option<usize> {
        match self {
            UndoPolicy::Disabled => Some(0),
            UndoPolicy::Limited(n) => Some(n),
            UndoPolicy::Unlimited => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        self.capacity() != Some(0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub score: u32,
}

#[derive(Clone, Debug, Default)]
pub struct History {
    policy: UndoPolicy,
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
}

impl History {
    pub fn new(policy: UndoPolicy) -> Self {
        Self {
            policy,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn policy(&self) -> UndoPolicy {
        self.policy
    }

    /// Remembers the state from before a fresh move. Anything that was
    /// undone is no longer reachable afterwards.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        match self.policy.capacity() {
            Some(0) => return,
            Some(cap) => {
                while self.undo.len() >= cap {
                    self.undo.pop_front();
                }
            }
            None => {}
        }
        self.undo.push_back(snapshot);
    }

    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo.pop_back()?;
        self.redo.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
