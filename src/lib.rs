//! Scroll- and pointer-driven transform composition for decorative background text.
//!
//! Raw signals (scroll progress through an element's visibility window, global pointer
//! position) are mapped through per-channel keyframe curves and a spring filter into one
//! [`TransformDescriptor`] per tick. Everything is pure arithmetic driven by an external
//! frame clock; [`MotionHost`] adds event coalescing and scoped subscriptions on top.
#![forbid(unsafe_code)]

pub mod channels;
pub mod compose;
pub mod config;
pub mod edge_stop;
pub mod element;
pub mod foundation;
pub mod host;
pub mod keyframes;
pub mod pointer;
pub mod scroll;
pub mod smoothing;

pub use compose::{ChannelInputs, CssTransform, Phase, TransformComposer, TransformDescriptor};
pub use config::{BlurRange, Direction, MotionConfig, RotateAxis};
pub use edge_stop::EdgeStopResolver;
pub use element::ElementMotion;
pub use foundation::core::{ElementId, Point, Rect, Signal, SignalSource, Vec2, Viewport};
pub use foundation::error::{ScrollFxError, ScrollFxResult};
pub use host::{InputEvent, MotionHost, MountHandle, RecordingTarget, RenderTarget, Subscription};
pub use keyframes::{Keyframe, KeyframeMap};
pub use pointer::{PointerTracker, normalize_pointer};
pub use scroll::{ScrollProgressTracker, scroll_progress};
pub use smoothing::{PointerSmoother, SmoothingFilter, SpringParams, SpringState, spring_step};
