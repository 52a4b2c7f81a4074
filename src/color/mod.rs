mod hsb;
pub mod picker;

pub use hsb::{from_color32, hsb_to_color32, hsb_to_rgb, rgb_to_hsb, to_color32};
pub use picker::ColorPickerSurface;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::tools::RenderSettings;

pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 100.0;

/// Which of the two independent colors an adjustment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorRole {
    Fill,
    Outline,
}

impl ColorRole {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fill => "Fill",
            Self::Outline => "Outline",
        }
    }
}

/// Clamps `value` into `min..=max`, mapping NaN to `min`.
pub(crate) fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn normalize_hue(hue: f32) -> f32 {
    clamp_lenient(hue, 0.0, 360.0) % 360.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorState {
    hue: f32,
    saturation: f32,
    brightness: f32,
}

impl ColorState {
    pub fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation: clamp_lenient(saturation, 0.0, 1.0),
            brightness: clamp_lenient(brightness, 0.0, 1.0),
        }
    }

    pub fn from_rgb(color: Color32) -> Self {
        let [r, g, b] = from_color32(color);
        let (hue, saturation, brightness) = rgb_to_hsb(r, g, b);
        Self::new(hue, saturation, brightness)
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn to_rgb(&self) -> Color32 {
        hsb_to_color32(self.hue, self.saturation, self.brightness)
    }
}

/// Notifications pushed by [`ColorModel`] to its subscribers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorEvent {
    HueChanged {
        role: ColorRole,
        hue: f32,
    },
    SaturationBrightnessChanged {
        role: ColorRole,
        saturation: f32,
        brightness: f32,
    },
}

pub trait ColorListener {
    fn on_color_event(&mut self, event: &ColorEvent);
}

impl<F: FnMut(&ColorEvent)> ColorListener for F {
    fn on_color_event(&mut self, event: &ColorEvent) {
        self(event)
    }
}

/// Fill and outline colors plus the global opacity and stroke width.
///
/// Every setter clamps; nothing here can fail.
pub struct ColorModel {
    fill: ColorState,
    outline: ColorState,
    opacity: f32,
    stroke_width: f32,
    listeners: Vec<Box<dyn ColorListener>>,
}

impl std::fmt::Debug for ColorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorModel")
            .field("fill", &self.fill)
            .field("outline", &self.outline)
            .field("opacity", &self.opacity)
            .field("stroke_width", &self.stroke_width)
            .field("listeners", &format!("<{} listeners>", self.listeners.len()))
            .finish()
    }
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::new(1.0, 5.0)
    }
}

impl ColorModel {
    /// Red fill, black outline.
    pub fn new(opacity: f32, stroke_width: f32) -> Self {
        Self {
            fill: ColorState::from_rgb(Color32::RED),
            outline: ColorState::from_rgb(Color32::BLACK),
            opacity: clamp_lenient(opacity, 0.0, 1.0),
            stroke_width: clamp_lenient(stroke_width, MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            listeners: Vec::new(),
        }
    }

    /// Register a listener for hue and saturation/brightness changes
    pub fn subscribe(&mut self, listener: Box<dyn ColorListener>) {
        self.listeners.push(listener);
    }

    fn emit(&mut self, event: ColorEvent) {
        for listener in &mut self.listeners {
            listener.on_color_event(&event);
        }
    }

    pub fn state(&self, role: ColorRole) -> ColorState {
        match role {
            ColorRole::Fill => self.fill,
            ColorRole::Outline => self.outline,
        }
    }

    fn state_mut(&mut self, role: ColorRole) -> &mut ColorState {
        match role {
            ColorRole::Fill => &mut self.fill,
            ColorRole::Outline => &mut self.outline,
        }
    }

    /// Replace a role's whole color, notifying listeners of what changed.
    pub fn set_state(&mut self, role: ColorRole, state: ColorState) {
        self.set_hue(role, state.hue);
        self.set_saturation_brightness(role, state.saturation, state.brightness);
    }

    pub fn set_hue(&mut self, role: ColorRole, hue: f32) {
        let hue = normalize_hue(hue);
        let state = self.state_mut(role);
        if state.hue == hue {
            return;
        }
        state.hue = hue;
        self.emit(ColorEvent::HueChanged { role, hue });
    }

    pub fn set_saturation_brightness(&mut self, role: ColorRole, saturation: f32, brightness: f32) {
        let saturation = clamp_lenient(saturation, 0.0, 1.0);
        let brightness = clamp_lenient(brightness, 0.0, 1.0);
        let state = self.state_mut(role);
        if state.saturation == saturation && state.brightness == brightness {
            return;
        }
        state.saturation = saturation;
        state.brightness = brightness;
        self.emit(ColorEvent::SaturationBrightnessChanged {
            role,
            saturation,
            brightness,
        });
    }

    pub fn rgb(&self, role: ColorRole) -> Color32 {
        self.state(role).to_rgb()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_lenient(opacity, 0.0, 1.0);
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = clamp_lenient(width, MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    /// Freeze the current colors, opacity and width for one action
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::capture(self)
    }
}
