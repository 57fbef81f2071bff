//! Node and time window types.

/// What a node in the routing universe represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A start location (the base, or a hub the workforce can overnight at).
    Start,
    /// An eligible client location.
    Client,
    /// A synthetic copy of a client, pinned to its prior appointment.
    ApptDuplicate,
}

/// An atomic, indexable visit point in the routing graph.
///
/// Nodes are ordered `[Starts…, Clients…, ApptDuplicates…]`. A duplicate
/// resolves to its client through `primary`; starts and clients resolve to
/// themselves.
///
/// # Examples
///
/// ```
/// use weekplan::models::{Node, NodeKind};
///
/// let base = Node::start(0, "Base");
/// assert_eq!(base.primary(), 0);
///
/// let dup = Node::appt_duplicate(4, "ClientA", 2);
/// assert_eq!(dup.kind(), NodeKind::ApptDuplicate);
/// assert_eq!(dup.primary(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    index: usize,
    kind: NodeKind,
    label: String,
    primary: usize,
}

impl Node {
    /// Creates a start node; its primary is itself.
    pub fn start(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            kind: NodeKind::Start,
            label: label.into(),
            primary: index,
        }
    }

    /// Creates a client node; its primary is itself.
    pub fn client(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            kind: NodeKind::Client,
            label: label.into(),
            primary: index,
        }
    }

    /// Creates an appointment duplicate pointing back at `client_node`.
    pub fn appt_duplicate(index: usize, label: impl Into<String>, client_node: usize) -> Self {
        Self {
            index,
            kind: NodeKind::ApptDuplicate,
            label: label.into(),
            primary: client_node,
        }
    }

    /// Index of this node in the routing universe.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Human-readable label (account or territory id).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The canonical physical node this one resolves to.
    pub fn primary(&self) -> usize {
        self.primary
    }

    /// Returns `true` for the appointment copy of a client.
    pub fn is_duplicate(&self) -> bool {
        self.kind == NodeKind::ApptDuplicate
    }
}

/// The fixed instant of a prior appointment.
///
/// Appointments are points in time, not intervals: `start == end` always.
/// `day` is the route the appointment must occur on and `node` the index
/// of the duplicate carrying this window.
///
/// # Examples
///
/// ```
/// use weekplan::models::TimeWindow;
///
/// let tw = TimeWindow::at(10, 1, 4);
/// assert_eq!(tw.start(), tw.end());
/// assert_eq!(tw.instant(), 10);
/// assert_eq!(tw.day(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
    day: usize,
    node: usize,
}

impl TimeWindow {
    /// Creates a point window at `instant` on `day`, carried by `node`.
    pub fn at(instant: i64, day: usize, node: usize) -> Self {
        Self {
            start: instant,
            end: instant,
            day,
            node,
        }
    }

    /// Window opening; equal to [`TimeWindow::end`].
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Window closing; equal to [`TimeWindow::start`].
    pub fn end(&self) -> i64 {
        self.end
    }

    /// The appointment instant.
    pub fn instant(&self) -> i64 {
        self.start
    }

    /// Day the appointment is pinned to.
    pub fn day(&self) -> usize {
        self.day
    }

    /// Index of the duplicate node carrying this window.
    pub fn node(&self) -> usize {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_client_are_self_primary() {
        let s = Node::start(1, "Hub");
        assert_eq!(s.primary(), 1);
        assert_eq!(s.kind(), NodeKind::Start);
        assert!(!s.is_duplicate());

        let c = Node::client(3, "Acme");
        assert_eq!(c.primary(), 3);
        assert_eq!(c.kind(), NodeKind::Client);
    }

    #[test]
    fn test_duplicate_points_at_client() {
        let d = Node::appt_duplicate(7, "Acme", 3);
        assert_eq!(d.index(), 7);
        assert_eq!(d.primary(), 3);
        assert!(d.is_duplicate());
        assert_eq!(d.label(), "Acme");
    }

    #[test]
    fn test_time_window_is_a_point() {
        let tw = TimeWindow::at(22, 3, 9);
        assert_eq!(tw.start(), 22);
        assert_eq!(tw.end(), 22);
        assert_eq!(tw.instant(), 22);
        assert_eq!(tw.day(), 3);
        assert_eq!(tw.node(), 9);
    }
}
