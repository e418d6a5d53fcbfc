//! Selection notifications for the control panel.
//!
//! The scene emits `shape_selected` / `shape_deselected` through a
//! [`ShapeObserver`]; the concrete UI binding lives outside the core.

use crate::shapes::{ParamKey, ParamSpec, ShapeId, ShapeKind};

/// Receives selection changes from the scene.
pub trait ShapeObserver {
    /// A shape became active. `controls` describes its sliders.
    fn shape_selected(&mut self, id: ShapeId, kind: ShapeKind, controls: Vec<ParamSpec>);

    /// The shape lost the selection; its controls should be detached.
    fn shape_deselected(&mut self, id: ShapeId);
}

/// Ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ShapeObserver for NullObserver {
    fn shape_selected(&mut self, _id: ShapeId, _kind: ShapeKind, _controls: Vec<ParamSpec>) {}

    fn shape_deselected(&mut self, _id: ShapeId) {}
}

/// Mirror of the controls currently attached for the active shape.
#[derive(Debug, Default, Clone)]
pub struct ControlPanel {
    attached: Option<(ShapeId, ShapeKind)>,
    controls: Vec<ParamSpec>,
    notifications: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape whose controls are attached, if any.
    pub fn attached(&self) -> Option<ShapeId> {
        self.attached.map(|(id, _)| id)
    }

    pub fn header(&self) -> Option<String> {
        self.attached.map(|(_, kind)| {
            let name = kind.name();
            let mut chars = name.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
            format!("{}{} Properties", first, chars.as_str())
        })
    }

    /// Number of attach/detach notifications seen.
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    pub fn controls(&self) -> &[ParamSpec] {
        &self.controls
    }

    pub fn control(&self, key: ParamKey) -> Option<&ParamSpec> {
        self.controls.iter().find(|spec| spec.key == key)
    }
}

impl ShapeObserver for ControlPanel {
    fn shape_selected(&mut self, id: ShapeId, kind: ShapeKind, controls: Vec<ParamSpec>) {
        self.attached = Some((id, kind));
        self.controls = controls;
        self.notifications += 1;
    }

    fn shape_deselected(&mut self, id: ShapeId) {
        if self.attached() == Some(id) {
            self.attached = None;
            self.controls.clear();
        }
        self.notifications += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let mut panel = ControlPanel::new();
        panel.shape_selected(
            ShapeId(3),
            ShapeKind::Square,
            vec![ParamSpec::new(ParamKey::Side, "Side Length", 0.0, 30.0, 0.01, 2.0)],
        );
        assert_eq!(panel.attached(), Some(ShapeId(3)));
        assert_eq!(panel.header().as_deref(), Some("Square Properties"));
        assert_eq!(panel.control(ParamKey::Side).map(|c| c.value), Some(2.0));

        panel.shape_deselected(ShapeId(4));
        assert_eq!(panel.attached(), Some(ShapeId(3)));
        panel.shape_deselected(ShapeId(3));
        assert!(panel.attached().is_none());
        assert!(panel.controls().is_empty());
        assert_eq!(panel.notifications(), 3);
    }
}
