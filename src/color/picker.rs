use std::cell::{Ref, RefCell};
use std::rc::Rc;

use egui::Pos2;
use image::{Rgba, RgbaImage};

use super::{ColorEvent, ColorListener, ColorModel, ColorRole, clamp_lenient, hsb_to_color32};
use crate::config::EngineConfig;

fn rgba(hue: f32, saturation: f32, brightness: f32) -> Rgba<u8> {
    let color = hsb_to_color32(hue, saturation, brightness);
    Rgba([color.r(), color.g(), color.b(), 255])
}

/// The saturation/brightness gradient for one hue
#[derive(Debug)]
struct GradientPanel {
    raster: RgbaImage,
    rendered_hue: f32,
    /// Role whose hue the raster currently shows
    role: Option<ColorRole>,
    revision: u64,
}

impl GradientPanel {
    fn new(size: u32) -> Self {
        Self {
            raster: RgbaImage::new(size, size),
            rendered_hue: f32::NAN,
            role: None,
            revision: 0,
        }
    }

    fn render(&mut self, hue: f32) {
        let size = self.raster.width();
        let last = (size - 1) as f32;
        for (px, py, pixel) in self.raster.enumerate_pixels_mut() {
            let saturation = px as f32 / last;
            let brightness = 1.0 - py as f32 / last;
            *pixel = rgba(hue, saturation, brightness);
        }
        self.rendered_hue = hue;
        self.revision += 1;
        log::debug!("Re-rendered saturation/brightness panel for hue {hue:.1}");
    }

    fn show(&mut self, hue: f32) {
        if self.rendered_hue != hue {
            self.render(hue);
        }
    }
}

/// Re-renders the shared panel whenever the displayed role's hue changes
struct PanelListener {
    panel: Rc<RefCell<GradientPanel>>,
}

impl ColorListener for PanelListener {
    fn on_color_event(&mut self, event: &ColorEvent) {
        if let ColorEvent::HueChanged { role, hue } = *event {
            let mut panel = self.panel.borrow_mut();
            if panel.role == Some(role) {
                panel.show(hue);
            }
        }
    }
}

/// Pointer-driven color selection: a square saturation/brightness panel and a
/// horizontal hue strip.
///
/// Coordinates are local to each region. Every pick targets the role passed
/// in; with no role selected picks are ignored.
#[derive(Debug)]
pub struct ColorPickerSurface {
    panel_size: u32,
    strip_width: u32,
    panel: Rc<RefCell<GradientPanel>>,
    hue_strip: RgbaImage,
}

impl ColorPickerSurface {
    /// Builds both rasters and subscribes the panel to `colors`' hue changes.
    pub fn new(config: &EngineConfig, colors: &mut ColorModel, role: Option<ColorRole>) -> Self {
        let panel_size = config.panel_size.max(2);
        let strip_width = config.hue_strip_width.max(2);
        let strip_height = config.hue_strip_height.max(1);

        let last = (strip_width - 1) as f32;
        let hue_strip = RgbaImage::from_fn(strip_width, strip_height, |px, _| {
            rgba(360.0 * px as f32 / last, 1.0, 1.0)
        });

        let panel = Rc::new(RefCell::new(GradientPanel::new(panel_size)));
        colors.subscribe(Box::new(PanelListener {
            panel: panel.clone(),
        }));

        let mut picker = Self {
            panel_size,
            strip_width,
            panel,
            hue_strip,
        };
        picker.sync_role(colors, role);
        picker
    }

    /// Point the panel at `role`, re-rendering if that role's hue differs
    /// from what is shown.
    pub fn sync_role(&mut self, colors: &ColorModel, role: Option<ColorRole>) {
        let mut panel = self.panel.borrow_mut();
        panel.role = role;
        match role {
            Some(role) => panel.show(colors.state(role).hue()),
            // Nothing selected yet, show the first role's gradient
            None if panel.rendered_hue.is_nan() => {
                panel.render(colors.state(ColorRole::Fill).hue())
            }
            None => {}
        }
    }

    /// Map a point on the panel to saturation (x) and brightness (y).
    ///
    /// Returns `false` when no role is selected.
    pub fn pick_saturation_brightness(
        &self,
        colors: &mut ColorModel,
        role: Option<ColorRole>,
        x: f32,
        y: f32,
    ) -> bool {
        let Some(role) = role else {
            return false;
        };
        let size = self.panel_size as f32;
        let x = clamp_lenient(x, 0.0, size);
        let y = clamp_lenient(y, 0.0, size);
        colors.set_saturation_brightness(role, x / size, 1.0 - y / size);
        true
    }

    /// Map a point along the strip to a hue.
    ///
    /// Returns `false` when no role is selected.
    pub fn pick_hue(&self, colors: &mut ColorModel, role: Option<ColorRole>, x: f32) -> bool {
        let Some(role) = role else {
            return false;
        };
        let width = self.strip_width as f32;
        let x = clamp_lenient(x, 0.0, width);
        colors.set_hue(role, 360.0 * (x / width));
        true
    }

    pub fn panel_size(&self) -> u32 {
        self.panel_size
    }

    pub fn strip_width(&self) -> u32 {
        self.strip_width
    }

    pub fn panel_raster(&self) -> Ref<'_, RgbaImage> {
        Ref::map(self.panel.borrow(), |panel| &panel.raster)
    }

    /// Bumped every time the panel raster is recomputed
    pub fn panel_revision(&self) -> u64 {
        self.panel.borrow().revision
    }

    pub fn displayed_hue(&self) -> f32 {
        self.panel.borrow().rendered_hue
    }

    pub fn hue_raster(&self) -> &RgbaImage {
        &self.hue_strip
    }

    /// Panel-local position of the selection indicator for `role`
    pub fn panel_indicator(&self, colors: &ColorModel, role: Option<ColorRole>) -> Option<Pos2> {
        let state = colors.state(role?);
        let size = self.panel_size as f32;
        Some(Pos2::new(
            state.saturation() * size,
            (1.0 - state.brightness()) * size,
        ))
    }

    /// Strip-local x of the hue indicator for `role`
    pub fn hue_indicator(&self, colors: &ColorModel, role: Option<ColorRole>) -> Option<f32> {
        let state = colors.state(role?);
        Some(state.hue() / 360.0 * self.strip_width as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EngineConfig {
        EngineConfig {
            panel_size: 100,
            hue_strip_width: 180,
            hue_strip_height: 4,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_panel_corners_follow_hue() {
        let mut colors = ColorModel::default();
        let picker = ColorPickerSurface::new(&small_config(), &mut colors, Some(ColorRole::Fill));

        let raster = picker.panel_raster();
        // Top-left white, top-right pure hue (red), bottom row black
        assert_eq!(*raster.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*raster.get_pixel(99, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*raster.get_pixel(50, 99), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_hue_strip_spans_the_wheel() {
        let mut colors = ColorModel::default();
        let picker = ColorPickerSurface::new(&small_config(), &mut colors, None);
        let strip = picker.hue_raster();
        assert_eq!(strip.dimensions(), (180, 4));
        assert_eq!(*strip.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*strip.get_pixel(179, 3), Rgba([255, 0, 0, 255]));
        // 360 * 60 / 179 is just past 120 degrees, mostly green
        let green = strip.get_pixel(60, 0);
        assert!(green[1] == 255 && green[0] < 10);
    }

    #[test]
    fn test_hue_pick_rerenders_panel_only_on_hue_change() {
        let mut colors = ColorModel::default();
        let picker = ColorPickerSurface::new(&small_config(), &mut colors, Some(ColorRole::Fill));
        let before = picker.panel_revision();

        picker.pick_saturation_brightness(&mut colors, Some(ColorRole::Fill), 30.0, 40.0);
        assert_eq!(picker.panel_revision(), before);

        picker.pick_hue(&mut colors, Some(ColorRole::Fill), 60.0);
        assert_eq!(picker.panel_revision(), before + 1);
        assert!((picker.displayed_hue() - 120.0).abs() < 1e-3);
        assert_eq!(*picker.panel_raster().get_pixel(99, 0), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_picks_are_clamped_and_mapped() {
        let mut colors = ColorModel::default();
        let outline = Some(ColorRole::Outline);
        let picker = ColorPickerSurface::new(&small_config(), &mut colors, outline);

        assert!(picker.pick_saturation_brightness(&mut colors, outline, 25.0, -50.0));
        let outline = colors.state(ColorRole::Outline);
        assert!((outline.saturation() - 0.25).abs() < 1e-6);
        assert_eq!(outline.brightness(), 1.0);

        assert!(picker.pick_hue(&mut colors, Some(ColorRole::Outline), 45.0));
        assert!((colors.state(ColorRole::Outline).hue() - 90.0).abs() < 1e-4);

        let indicator = picker.panel_indicator(&colors, Some(ColorRole::Outline)).unwrap();
        assert!((indicator.x - 25.0).abs() < 1e-4);
        assert!(indicator.y.abs() < 1e-4);
        let hue_x = picker.hue_indicator(&colors, Some(ColorRole::Outline)).unwrap();
        assert!((hue_x - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_role_means_no_change() {
        let mut colors = ColorModel::default();
        let picker = ColorPickerSurface::new(&small_config(), &mut colors, None);
        let fill = colors.state(ColorRole::Fill);

        assert!(!picker.pick_saturation_brightness(&mut colors, None, 10.0, 10.0));
        assert!(!picker.pick_hue(&mut colors, None, 90.0));
        assert_eq!(colors.state(ColorRole::Fill), fill);
        assert!(picker.panel_indicator(&colors, None).is_none());
    }

    #[test]
    fn test_switching_roles_shows_that_roles_hue() {
        let mut colors = ColorModel::default();
        let fill = Some(ColorRole::Fill);
        let mut picker = ColorPickerSurface::new(&small_config(), &mut colors, fill);
        colors.set_hue(ColorRole::Outline, 240.0);
        // Outline is not displayed, so the panel keeps the fill hue
        assert_eq!(picker.displayed_hue(), 0.0);

        picker.sync_role(&colors, Some(ColorRole::Outline));
        assert_eq!(picker.displayed_hue(), 240.0);
        assert_eq!(*picker.panel_raster().get_pixel(99, 0), Rgba([0, 0, 255, 255]));
    }
}
