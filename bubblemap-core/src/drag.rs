//! Drag gesture state machine.
//!
//! `Idle -> Dragging -> Idle`. While dragging, the gesture owns the pointer
//! listener registration as a [`Subscription`]; dropping the gesture state
//! detaches it.

use crate::types::{LabelOffset, PointId, Pointer};
use std::fmt;

/// Registration of pointer listeners. Detaches when dropped.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(detach: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self { detach: Some(Box::new(detach)) }
    }

    /// A subscription with nothing to detach, for headless use.
    pub fn none() -> Self {
        Self { detach: None }
    }

    pub fn is_attached(&self) -> bool {
        self.detach.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("attached", &self.is_attached()).finish()
    }
}

#[derive(Debug, Default)]
pub enum DragGesture {
    #[default]
    Idle,
    Dragging {
        point_id: PointId,
        pointer_start: Pointer,
        offset_start: LabelOffset,
        subscription: Subscription,
    },
}

impl DragGesture {
    pub fn begin(
        point_id: PointId,
        pointer_start: Pointer,
        offset_start: LabelOffset,
        subscription: Subscription,
    ) -> Self {
        DragGesture::Dragging { point_id, pointer_start, offset_start, subscription }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragGesture::Dragging { .. })
    }

    pub fn point_id(&self) -> Option<&str> {
        match self {
            DragGesture::Dragging { point_id, .. } => Some(point_id.as_str()),
            DragGesture::Idle => None,
        }
    }

    /// Offset for the current pointer: the start offset plus the pointer delta.
    ///
    /// `None` while idle, or when the pointer has not moved since the drag began.
    pub fn offset_at(&self, pointer: Pointer) -> Option<(&str, LabelOffset)> {
        let DragGesture::Dragging { point_id, pointer_start, offset_start, .. } = self else {
            return None;
        };
        let dx = pointer.x - pointer_start.x;
        let dy = pointer.y - pointer_start.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some((point_id.as_str(), LabelOffset::manual(offset_start.dx + dx, offset_start.dy + dy)))
    }

    /// Return to idle, detaching any listeners.
    pub fn end(&mut self) -> Option<PointId> {
        match std::mem::take(self) {
            DragGesture::Dragging { point_id, .. } => Some(point_id),
            DragGesture::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_subscription(counter: &Arc<AtomicUsize>) -> Subscription {
        let counter = Arc::clone(counter);
        Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_offset_composes_from_start() {
        let gesture = DragGesture::begin(
            "a".into(),
            Pointer::new(100.0, 100.0),
            LabelOffset::computed(0.0, -18.0),
            Subscription::none(),
        );
        let (id, offset) = gesture.offset_at(Pointer::new(110.0, 95.0)).unwrap();
        assert_eq!(id, "a");
        assert_eq!(offset, LabelOffset::manual(10.0, -23.0));
        assert!(gesture.offset_at(Pointer::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn test_end_detaches_once() {
        let detached = Arc::new(AtomicUsize::new(0));
        let mut gesture = DragGesture::begin(
            "a".into(),
            Pointer::default(),
            LabelOffset::default(),
            counting_subscription(&detached),
        );
        assert!(gesture.is_dragging());
        assert_eq!(gesture.end(), Some("a".to_string()));
        assert_eq!(detached.load(Ordering::SeqCst), 1);
        assert_eq!(gesture.end(), None);
        assert_eq!(detached.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replacing_gesture_detaches_previous() {
        let detached = Arc::new(AtomicUsize::new(0));
        let mut gesture = DragGesture::begin(
            "a".into(),
            Pointer::default(),
            LabelOffset::default(),
            counting_subscription(&detached),
        );
        assert_eq!(gesture.point_id(), Some("a"));
        gesture = DragGesture::begin("b".into(), Pointer::default(), LabelOffset::default(), Subscription::none());
        assert_eq!(detached.load(Ordering::SeqCst), 1);
        assert_eq!(gesture.point_id(), Some("b"));
    }
}
