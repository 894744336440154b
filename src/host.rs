//! Event coalescing and per-frame delivery for mounted elements.
//!
//! The host is single-threaded and tick driven: input events are queued per element (only the
//! latest sample of each kind survives), and [`MotionHost::frame`] recomputes every element at
//! most once and hands the result to a [`RenderTarget`].
//!
//! Subscriptions are scoped. [`MotionHost::mount`] returns a [`MountHandle`]; dropping it, or
//! passing it to [`MotionHost::unmount`], releases the scroll and pointer subscriptions
//! immediately. Queued events for a released element are discarded and nothing is delivered
//! for it afterwards, even when the release happens while a frame is being delivered.

use std::{cell::Cell, rc::Rc};

use crate::{
    compose::TransformDescriptor,
    config::MotionConfig,
    element::ElementMotion,
    foundation::{
        core::{ElementId, Point, Rect, SignalSource, Viewport},
        error::ScrollFxResult,
    },
};

/// Raw host input.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Visibility geometry of one element changed (scroll or resize).
    Intersection {
        element: ElementId,
        rect: Rect,
        viewport: Viewport,
    },
    /// Global pointer movement, delivered to every element with pointer tilt.
    PointerMove { position: Point, viewport: Viewport },
}

/// Consumer of composed transforms.
pub trait RenderTarget {
    fn apply(&mut self, element: ElementId, transform: &TransformDescriptor);
}

impl<F> RenderTarget for F
where
    F: FnMut(ElementId, &TransformDescriptor),
{
    fn apply(&mut self, element: ElementId, transform: &TransformDescriptor) {
        self(element, transform)
    }
}

/// Keeps every delivered transform in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingTarget {
    pub frames: Vec<(ElementId, TransformDescriptor)>,
}

impl RecordingTarget {
    pub fn last_for(&self, element: ElementId) -> Option<&TransformDescriptor> {
        self.frames
            .iter()
            .rev()
            .find(|(id, _)| *id == element)
            .map(|(_, t)| t)
    }
}

impl RenderTarget for RecordingTarget {
    fn apply(&mut self, element: ElementId, transform: &TransformDescriptor) {
        self.frames.push((element, *transform));
    }
}

/// One registered listener. Dropping it deregisters the listener.
#[derive(Debug)]
pub struct Subscription {
    source: SignalSource,
    live: Rc<Cell<bool>>,
}

impl Subscription {
    fn new(source: SignalSource) -> (Self, Rc<Cell<bool>>) {
        let live = Rc::new(Cell::new(true));
        (
            Self {
                source,
                live: Rc::clone(&live),
            },
            live,
        )
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.live.replace(false) {
            tracing::debug!(source = ?self.source, "subscription released");
        }
    }
}

/// Scoped ownership of a mounted element.
#[derive(Debug)]
#[must_use = "dropping the handle unmounts the element"]
pub struct MountHandle {
    id: ElementId,
    scroll: Subscription,
    pointer: Option<Subscription>,
}

impl MountHandle {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn scroll(&self) -> &Subscription {
        &self.scroll
    }

    pub fn pointer(&self) -> Option<&Subscription> {
        self.pointer.as_ref()
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Pending {
    intersection: Option<(Rect, Viewport, f64)>,
    pointer: Option<(Point, Viewport, f64)>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.intersection.is_none() && self.pointer.is_none()
    }
}

#[derive(Debug)]
struct Slot {
    id: ElementId,
    motion: ElementMotion,
    scroll_live: Rc<Cell<bool>>,
    pointer_live: Option<Rc<Cell<bool>>>,
    pending: Pending,
    delivered_once: bool,
}

impl Slot {
    fn is_live(&self) -> bool {
        self.scroll_live.get()
    }

    fn listens_to_pointer(&self) -> bool {
        self.pointer_live.as_ref().is_some_and(|l| l.get())
    }
}

#[derive(Debug, Default)]
pub struct MotionHost {
    slots: Vec<Slot>,
    next_id: u64,
}

impl MotionHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an element and acquire its subscriptions.
    ///
    /// The pointer subscription exists only when pointer tilt is enabled.
    pub fn mount(&mut self, config: &MotionConfig) -> ScrollFxResult<MountHandle> {
        let motion = ElementMotion::new(config)?;
        let id = ElementId(self.next_id);
        self.next_id += 1;

        let (scroll, scroll_live) = Subscription::new(SignalSource::Scroll);
        let (pointer, pointer_live) = if motion.wants_pointer() {
            let (sub, live) = Subscription::new(SignalSource::Pointer);
            (Some(sub), Some(live))
        } else {
            (None, None)
        };

        tracing::debug!(
            element = id.0,
            text = %motion.config().text,
            pointer = pointer.is_some(),
            "element mounted"
        );
        self.slots.push(Slot {
            id,
            motion,
            scroll_live,
            pointer_live,
            pending: Pending::default(),
            delivered_once: false,
        });

        Ok(MountHandle {
            id,
            scroll,
            pointer,
        })
    }

    /// Release `handle` and drop the element with any queued input.
    pub fn unmount(&mut self, handle: MountHandle) {
        let id = handle.id;
        drop(handle);
        self.prune();
        tracing::debug!(element = id.0, "element unmounted");
    }

    /// Number of elements whose handles are still alive.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementMotion> {
        self.slots
            .iter()
            .find(|s| s.id == id && s.is_live())
            .map(|s| &s.motion)
    }

    /// Queue an event. Later events of the same kind replace earlier ones until the next frame.
    ///
    /// Returns the number of elements that accepted the event.
    pub fn dispatch(&mut self, at_secs: f64, event: InputEvent) -> usize {
        match event {
            InputEvent::Intersection {
                element,
                rect,
                viewport,
            } => {
                let Some(slot) = self
                    .slots
                    .iter_mut()
                    .find(|s| s.id == element && s.is_live())
                else {
                    tracing::trace!(element = element.0, "intersection for unmounted element dropped");
                    return 0;
                };
                slot.pending.intersection = Some((rect, viewport, at_secs));
                1
            }
            InputEvent::PointerMove { position, viewport } => {
                let mut n = 0;
                for slot in self.slots.iter_mut().filter(|s| s.listens_to_pointer()) {
                    slot.pending.pointer = Some((position, viewport, at_secs));
                    n += 1;
                }
                n
            }
        }
    }

    /// Recompute and deliver every element that has new input or an unsettled spring.
    ///
    /// Each element is composed at most once per call. Returns the number of deliveries.
    #[tracing::instrument(level = "trace", skip(self, target))]
    pub fn frame(&mut self, now_secs: f64, target: &mut dyn RenderTarget) -> usize {
        self.prune();

        let mut ready: Vec<(ElementId, TransformDescriptor, Rc<Cell<bool>>)> = Vec::new();
        for slot in &mut self.slots {
            let pending = std::mem::take(&mut slot.pending);
            if pending.is_empty() && slot.delivered_once && !slot.motion.is_animating() {
                continue;
            }
            if let Some((rect, viewport, at)) = pending.intersection {
                slot.motion.observe_scroll(rect, viewport, at);
            }
            if let Some((position, viewport, at)) = pending.pointer {
                slot.motion.observe_pointer(position, viewport, at);
            }
            let transform = slot.motion.tick(now_secs);
            slot.delivered_once = true;
            ready.push((slot.id, transform, Rc::clone(&slot.scroll_live)));
        }

        let mut delivered = 0;
        for (id, transform, live) in ready {
            // The target may release handles while we deliver.
            if !live.get() {
                continue;
            }
            target.apply(id, &transform);
            delivered += 1;
        }
        delivered
    }

    fn prune(&mut self) {
        self.slots.retain(|s| {
            let keep = s.is_live();
            if !keep {
                tracing::trace!(element = s.id.0, "pruned released element");
            }
            keep
        });
    }
}
