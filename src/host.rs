//! The glue between the analyzers and the editor hosting them.
//!
//! The host knows things that the analyzers don't care about: which tool is
//! active, the zoom level, the preferred handle size. Some of these might not
//! be available (for example, when a view is being torn down), in which case
//! we fall back to sensible defaults instead of failing.

use crate::{
    analyze,
    markers::{build_markers, HandleSize, Markers, ViewStyle},
    Layer, Settings,
};

/// The editing tool that is currently active in the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The selection tool.
    #[default]
    Select,
    /// The drawing (pen) tool.
    Draw,
    /// The text tool.
    Text,
    /// The hand tool, for panning.
    Pan,
    /// Anything else.
    Other,
}

impl Tool {
    /// Should markers be drawn while this tool is active?
    ///
    /// Markers get in the way while typing and aren't useful while panning.
    pub fn shows_markers(self) -> bool {
        !matches!(self, Tool::Text | Tool::Pan)
    }
}

/// The state of the host's view, as far as it can be determined.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostView {
    /// The active tool.
    pub tool: Tool,
    /// The zoom factor, if the host could provide one.
    pub scale: Option<f64>,
    /// The index of the user's preferred handle size, if the host could
    /// provide one.
    pub handle_size_index: Option<i64>,
}

impl HostView {
    /// The style to draw markers with.
    ///
    /// A missing, non-finite or non-positive scale becomes 1, and a missing
    /// or unknown handle size becomes [`HandleSize::Regular`].
    pub fn style(&self) -> ViewStyle {
        let scale = match self.scale {
            Some(scale) if scale.is_finite() && scale > 0.0 => scale,
            other => {
                tracing::warn!(scale = ?other, "no usable view scale, assuming 1");
                1.0
            }
        };
        let handle_size = match self.handle_size_index.and_then(HandleSize::from_index) {
            Some(size) => size,
            None => {
                tracing::warn!(
                    index = ?self.handle_size_index,
                    "no usable handle size, assuming the regular one"
                );
                HandleSize::Regular
            }
        };
        ViewStyle { scale, handle_size }
    }
}

/// Computes the markers to draw for `layer`.
///
/// Returns `None` if the active tool doesn't show markers, in which case
/// nothing gets analyzed.
pub fn draw(layer: &Layer, settings: &Settings, view: &HostView) -> Option<Markers> {
    if !view.tool.shows_markers() {
        tracing::trace!(tool = ?view.tool, "markers hidden for the active tool");
        return None;
    }
    let findings = analyze(layer, settings);
    Some(build_markers(layer, &findings, &view.style()))
}
