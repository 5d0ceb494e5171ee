//! Viewport geometry, device classes and the pan/zoom transform

use serde::{Deserialize, Serialize};

/// A 2D point. In world space for layout output, screen space for events.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Host-provided drawing area, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: f64,
    /// Height in logical pixels
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both extents finite and non-negative
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

/// Narrow vs wide viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Width below the mobile breakpoint
    Mobile,
    /// Everything else
    Desktop,
}

impl DeviceClass {
    /// Classify a viewport width against a breakpoint (exclusive)
    #[must_use]
    pub fn for_width(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Whether this is the narrow class
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

/// Pan and zoom applied on top of a layout: `screen = world * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Horizontal translation in screen pixels
    pub translate_x: f64,
    /// Vertical translation in screen pixels
    pub translate_y: f64,
    /// Uniform scale factor
    pub scale: f64,
}

impl ViewTransform {
    /// The identity transform
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Create a transform
    #[must_use]
    pub const fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// World point to screen point
    #[must_use]
    pub fn apply(&self, world: Point) -> Point {
        Point::new(
            world.x.mul_add(self.scale, self.translate_x),
            world.y.mul_add(self.scale, self.translate_y),
        )
    }

    /// Screen point to world point
    #[must_use]
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    /// Translate by a screen-space delta
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.translate_x + dx, self.translate_y + dy, self.scale)
    }

    /// Rescale to `scale` keeping the world point under `focal` (screen) fixed
    #[must_use]
    pub fn rescaled_about(self, scale: f64, focal: Point) -> Self {
        let world = self.invert(focal);
        Self::new(
            world.x.mul_add(-scale, focal.x),
            world.y.mul_add(-scale, focal.y),
            scale,
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Initial transform parameters for one device class.
///
/// `translate_y = offset_y + offset_y_fraction * viewport.height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPreset {
    /// Initial scale
    pub scale: f64,
    /// Initial horizontal translation
    pub offset_x: f64,
    /// Fixed part of the vertical translation
    pub offset_y: f64,
    /// Viewport-relative part of the vertical translation
    pub offset_y_fraction: f64,
}

impl ViewportPreset {
    /// Narrow viewports: zoomed out, root kept near the left edge
    pub const MOBILE: Self = Self {
        scale: 0.5,
        offset_x: 20.0,
        offset_y: 0.0,
        offset_y_fraction: 0.25,
    };

    /// Wide viewports
    pub const DESKTOP: Self = Self {
        scale: 0.75,
        offset_x: 80.0,
        offset_y: 50.0,
        offset_y_fraction: 0.0,
    };

    /// Transform this preset produces for a viewport
    #[must_use]
    pub fn transform_for(&self, viewport: Viewport) -> ViewTransform {
        ViewTransform::new(
            self.offset_x,
            self.offset_y_fraction.mul_add(viewport.height, self.offset_y),
            self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_invert_are_inverse() {
        let t = ViewTransform::new(80.0, 50.0, 0.75);
        let world = Point::new(300.0, 120.0);
        let screen = t.apply(world);
        assert!((screen.x - 305.0).abs() < 1e-9);
        assert!((screen.y - 140.0).abs() < 1e-9);
        let back = t.invert(screen);
        assert!(back.distance(world) < 1e-9);
    }

    #[test]
    fn test_rescale_keeps_focal_point() {
        let t = ViewTransform::new(10.0, 20.0, 1.0);
        let focal = Point::new(200.0, 100.0);
        let before = t.invert(focal);
        let zoomed = t.rescaled_about(2.5, focal);
        assert!((zoomed.scale - 2.5).abs() < f64::EPSILON);
        assert!(zoomed.invert(focal).distance(before) < 1e-9);
    }

    #[test]
    fn test_device_class() {
        assert_eq!(DeviceClass::for_width(767.9, 768.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::for_width(768.0, 768.0), DeviceClass::Desktop);
    }

    #[test]
    fn test_presets() {
        let mobile = ViewportPreset::MOBILE.transform_for(Viewport::new(375.0, 800.0));
        assert_eq!(mobile, ViewTransform::new(20.0, 200.0, 0.5));

        let desktop = ViewportPreset::DESKTOP.transform_for(Viewport::new(1440.0, 900.0));
        assert_eq!(desktop, ViewTransform::new(80.0, 50.0, 0.75));
    }
}
