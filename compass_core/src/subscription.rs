use std::fmt;

use serde::Serialize;

/// Kinds of event source the display subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Orientation,
    Position,
}

impl SourceKind {
    fn index(&self) -> usize {
        match self {
            SourceKind::Orientation => 0,
            SourceKind::Position => 1,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceKind::Orientation => write!(f, "orientation"),
            SourceKind::Position => write!(f, "position"),
        }
    }
}

/// Handle for an active subscription. Returned by `subscribe`, consumed by
/// `unsubscribe`.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    kind: SourceKind,
    id: u64,
}

impl Subscription {
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionError {
    /// A subscription of this kind is already active
    AlreadyActive(SourceKind),
    /// The handle does not belong to the active subscription
    NotActive(SourceKind),
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubscriptionError::AlreadyActive(kind) => {
                write!(f, "{} subscription already active", kind)
            }
            SubscriptionError::NotActive(kind) => write!(f, "no such active {} subscription", kind),
        }
    }
}

impl std::error::Error for SubscriptionError {}

/// Allows at most one active subscription per source kind.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    active: [Option<u64>; 2],
    next_id: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: SourceKind) -> Result<Subscription, SubscriptionError> {
        let slot = &mut self.active[kind.index()];
        if slot.is_some() {
            return Err(SubscriptionError::AlreadyActive(kind));
        }
        self.next_id += 1;
        *slot = Some(self.next_id);
        Ok(Subscription { kind, id: self.next_id })
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> Result<(), SubscriptionError> {
        let slot = &mut self.active[subscription.kind.index()];
        if *slot != Some(subscription.id) {
            return Err(SubscriptionError::NotActive(subscription.kind));
        }
        *slot = None;
        Ok(())
    }

    pub fn is_active(&self, kind: SourceKind) -> bool {
        self.active[kind.index()].is_some()
    }
}
