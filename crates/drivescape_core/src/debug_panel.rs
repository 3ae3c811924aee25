//! Debug panel
//!
//! A tree of folders holding controls. Each control is bound to a target
//! object and one of its fields. Setting a value through the panel stores
//! it and hands back a [`DebugChange`] for the owning object to apply.
//! Nothing here draws anything.

use drivescape_math::Color;
use serde::{Deserialize, Serialize};

/// Handle to a folder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

/// Handle to a control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

/// Bounds and granularity of a slider
///
/// Missing bounds leave that side open.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
    #[serde(default = "default_step")]
    pub step: f32,
}

fn default_step() -> f32 {
    0.1
}

impl SliderRange {
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step,
        }
    }

    /// No bounds, only a step
    pub fn unbounded(step: f32) -> Self {
        Self {
            min: None,
            max: None,
            step,
        }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let mut v = value;
        if let Some(min) = self.min {
            v = v.max(min);
        }
        if let Some(max) = self.max {
            v = v.min(max);
        }
        v
    }

    /// Clamp to the bounds and snap to the nearest step from `min` (or 0)
    pub fn apply(&self, value: f32) -> f32 {
        let mut v = value;
        if self.step > 0.0 {
            let base = self.min.unwrap_or(0.0);
            v = base + ((v - base) / self.step).round() * self.step;
        }
        self.clamp(v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    Slider(SliderRange),
    Toggle,
    Button,
    Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebugValue {
    Number(f32),
    Bool(bool),
    Color(Color),
    Pressed,
}

impl DebugValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            DebugValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DebugValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A value change to apply to `target.field`
#[derive(Clone, Debug, PartialEq)]
pub struct DebugChange {
    pub target: String,
    /// Dotted path such as `position.x`
    pub field: String,
    pub value: DebugValue,
}

#[derive(Clone, Debug)]
pub struct DebugFolder {
    pub name: String,
    pub parent: Option<FolderId>,
    pub open: bool,
}

#[derive(Clone, Debug)]
pub struct DebugControl {
    pub folder: FolderId,
    pub target: String,
    pub field: String,
    pub label: String,
    pub kind: ControlKind,
    value: DebugValue,
}

impl DebugControl {
    pub fn value(&self) -> DebugValue {
        self.value
    }
}

/// All folders and controls
#[derive(Clone, Debug, Default)]
pub struct DebugPanel {
    folders: Vec<DebugFolder>,
    controls: Vec<DebugControl>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level folder; names may repeat
    pub fn add_folder(&mut self, name: impl Into<String>) -> FolderId {
        self.push_folder(name.into(), None)
    }

    pub fn add_subfolder(&mut self, parent: FolderId, name: impl Into<String>) -> FolderId {
        self.push_folder(name.into(), Some(parent))
    }

    fn push_folder(&mut self, name: String, parent: Option<FolderId>) -> FolderId {
        self.folders.push(DebugFolder {
            name,
            parent,
            open: false,
        });
        FolderId(self.folders.len() - 1)
    }

    pub fn open_folder(&mut self, folder: FolderId) {
        if let Some(f) = self.folders.get_mut(folder.0) {
            f.open = true;
        }
    }

    /// Slider starting at `value`; the initial value is clamped but not
    /// snapped
    pub fn add_slider(
        &mut self,
        folder: FolderId,
        target: &str,
        field: &str,
        value: f32,
        range: SliderRange,
    ) -> ControlId {
        self.push_control(
            folder,
            target,
            field,
            ControlKind::Slider(range),
            DebugValue::Number(range.clamp(value)),
        )
    }

    pub fn add_toggle(&mut self, folder: FolderId, target: &str, field: &str, value: bool) -> ControlId {
        self.push_control(folder, target, field, ControlKind::Toggle, DebugValue::Bool(value))
    }

    pub fn add_button(&mut self, folder: FolderId, target: &str, action: &str) -> ControlId {
        self.push_control(folder, target, action, ControlKind::Button, DebugValue::Pressed)
    }

    pub fn add_color(&mut self, folder: FolderId, target: &str, field: &str, value: Color) -> ControlId {
        self.push_control(folder, target, field, ControlKind::Color, DebugValue::Color(value))
    }

    fn push_control(
        &mut self,
        folder: FolderId,
        target: &str,
        field: &str,
        kind: ControlKind,
        value: DebugValue,
    ) -> ControlId {
        self.controls.push(DebugControl {
            folder,
            target: target.to_string(),
            field: field.to_string(),
            label: field.to_string(),
            kind,
            value,
        });
        ControlId(self.controls.len() - 1)
    }

    /// Rename the label shown for a control
    pub fn set_label(&mut self, control: ControlId, label: impl Into<String>) {
        if let Some(c) = self.controls.get_mut(control.0) {
            c.label = label.into();
        }
    }

    /// Set a slider; the stored value is clamped and snapped
    pub fn set_number(&mut self, control: ControlId, value: f32) -> Option<DebugChange> {
        let c = self.controls.get_mut(control.0)?;
        let ControlKind::Slider(range) = c.kind else {
            log::warn!("Control '{}.{}' is not a slider", c.target, c.field);
            return None;
        };
        c.value = DebugValue::Number(range.apply(value));
        Some(Self::change(c))
    }

    pub fn set_toggle(&mut self, control: ControlId, value: bool) -> Option<DebugChange> {
        let c = self.controls.get_mut(control.0)?;
        if c.kind != ControlKind::Toggle {
            return None;
        }
        c.value = DebugValue::Bool(value);
        Some(Self::change(c))
    }

    pub fn set_color(&mut self, control: ControlId, value: Color) -> Option<DebugChange> {
        let c = self.controls.get_mut(control.0)?;
        if c.kind != ControlKind::Color {
            return None;
        }
        c.value = DebugValue::Color(value);
        Some(Self::change(c))
    }

    pub fn press(&mut self, control: ControlId) -> Option<DebugChange> {
        let c = self.controls.get(control.0)?;
        if c.kind != ControlKind::Button {
            return None;
        }
        Some(Self::change(c))
    }

    fn change(c: &DebugControl) -> DebugChange {
        DebugChange {
            target: c.target.clone(),
            field: c.field.clone(),
            value: c.value,
        }
    }

    /// First control bound to `target.field`
    pub fn find(&self, target: &str, field: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .position(|c| c.target == target && c.field == field)
            .map(ControlId)
    }

    pub fn control(&self, control: ControlId) -> Option<&DebugControl> {
        self.controls.get(control.0)
    }

    pub fn folder(&self, folder: FolderId) -> Option<&DebugFolder> {
        self.folders.get(folder.0)
    }

    /// `root/child/...` path of a folder
    pub fn folder_path(&self, folder: FolderId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(folder);
        while let Some(id) = current {
            match self.folders.get(id.0) {
                Some(f) => {
                    parts.push(f.name.as_str());
                    current = f.parent;
                }
                None => break,
            }
        }
        parts.reverse();
        parts.join("/")
    }

    pub fn controls_in(&self, folder: FolderId) -> impl Iterator<Item = (ControlId, &DebugControl)> {
        self.controls
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.folder == folder)
            .map(|(i, c)| (ControlId(i), c))
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_clamps_and_snaps() {
        let range = SliderRange::new(-100.0, 100.0, 0.1);
        assert!((range.apply(12.34) - 12.3).abs() < 1e-4);
        assert_eq!(range.apply(250.0), 100.0);
        assert_eq!(range.apply(-250.0), -100.0);

        let degrees = SliderRange::new(0.0, 360.0, 1.0);
        assert_eq!(degrees.apply(179.6), 180.0);
    }

    #[test]
    fn test_unbounded_slider() {
        let range = SliderRange::unbounded(0.1);
        assert!((range.apply(1234.56) - 1234.6).abs() < 1e-2);
    }

    #[test]
    fn test_set_number_returns_change() {
        let mut panel = DebugPanel::new();
        let folder = panel.add_folder("sesOdasi");
        let position = panel.add_subfolder(folder, "position");
        let x = panel.add_slider(position, "sesOdasi", "position.x", -86.0, SliderRange::new(-100.0, 100.0, 0.1));

        let change = panel.set_number(x, 150.0).unwrap();
        assert_eq!(change.target, "sesOdasi");
        assert_eq!(change.field, "position.x");
        assert_eq!(change.value, DebugValue::Number(100.0));
        assert_eq!(panel.control(x).unwrap().value(), DebugValue::Number(100.0));
        assert_eq!(panel.folder_path(position), "sesOdasi/position");
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mut panel = DebugPanel::new();
        let folder = panel.add_folder("greenBox");
        let button = panel.add_button(folder, "greenBox", "resetPosition");
        let toggle = panel.add_toggle(folder, "greenBox", "wallHelpers.visible", false);

        assert!(panel.set_number(button, 1.0).is_none());
        assert!(panel.press(toggle).is_none());
        assert_eq!(panel.press(button).unwrap().value, DebugValue::Pressed);
        assert_eq!(panel.set_toggle(toggle, true).unwrap().value.as_bool(), Some(true));
    }

    #[test]
    fn test_initial_value_keeps_precision() {
        let mut panel = DebugPanel::new();
        let folder = panel.add_folder("kelebekler");
        let speed = panel.add_slider(folder, "kelebekler", "speed", 1e-8, SliderRange::new(0.0, 2.0, 0.01));
        assert_eq!(panel.control(speed).unwrap().value(), DebugValue::Number(1e-8));
    }

    #[test]
    fn test_duplicate_folder_names_allowed() {
        let mut panel = DebugPanel::new();
        let a = panel.add_folder("Sosyal Inovasyon");
        let b = panel.add_folder("Sosyal Inovasyon");
        assert_ne!(a, b);
        assert_eq!(panel.folder_count(), 2);
    }

    #[test]
    fn test_find_and_list_controls() {
        let mut panel = DebugPanel::new();
        let folder = panel.add_folder("kelebekler");
        panel.add_slider(folder, "kelebekler", "speed", 0.0, SliderRange::new(0.0, 2.0, 0.01));
        panel.add_slider(folder, "kelebekler", "height", 0.0, SliderRange::new(0.0, 5.0, 0.1));

        let id = panel.find("kelebekler", "height").unwrap();
        assert_eq!(panel.control(id).unwrap().field, "height");
        assert_eq!(panel.controls_in(folder).count(), 2);
        assert!(panel.find("kelebekler", "missing").is_none());
    }
}
