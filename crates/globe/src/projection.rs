use foundation::math::{LonLat, Rotation, Vec2};
use regions::is_on_visible_hemisphere;
use serde::{Deserialize, Serialize};

use crate::config::GlobeConfig;

/// Camera state consumed by the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub rotation: Rotation,
    /// Pixels per unit of projection radius.
    pub scale: f64,
    /// Screen-space center of the globe.
    pub translate: Vec2,
}

/// A requested camera mutation. Gesture handling produces these and the
/// state owner applies them; nothing else writes the camera directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraCommand {
    /// Screen-space pointer delta in pixels.
    RotateDelta { dx: f64, dy: f64 },
    ScaleBy(f64),
}

/// Orthographic projection of the unit sphere onto the viewport.
///
/// Owns the only copy of [`CameraState`]. Every setter clamps: tilt to
/// `[-max_tilt, max_tilt]`, scale to the configured extent times the base
/// radius. Out-of-range input is never an error.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    camera: CameraState,
    viewport: Vec2,
    base_radius: f64,
    scale_extent: [f64; 2],
    max_tilt_deg: f64,
    radius_fraction: f64,
}

impl ProjectionEngine {
    pub fn new(width: f64, height: f64, config: &GlobeConfig) -> Self {
        let mut engine = Self {
            camera: CameraState {
                rotation: Rotation::identity(),
                scale: 1.0,
                translate: Vec2::default(),
            },
            viewport: Vec2::default(),
            base_radius: 1.0,
            scale_extent: config.scale_extent,
            max_tilt_deg: config.max_tilt_deg,
            radius_fraction: config.radius_fraction,
        };
        engine.resize(width, height);
        engine.set_scale(engine.base_radius);
        engine
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    pub fn rotation(&self) -> Rotation {
        self.camera.rotation
    }

    pub fn scale(&self) -> f64 {
        self.camera.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.camera.translate
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Scale at zoom ratio 1.
    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    pub fn zoom_ratio(&self) -> f64 {
        self.camera.scale / self.base_radius
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (
            self.scale_extent[0] * self.base_radius,
            self.scale_extent[1] * self.base_radius,
        )
    }

    /// Resize the viewport, keeping the current zoom ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let ratio = self.zoom_ratio();
        self.resize(width, height);
        self.set_scale(ratio * self.base_radius);
    }

    fn resize(&mut self, width: f64, height: f64) {
        let width = width.max(1.0);
        let height = height.max(1.0);
        self.viewport = Vec2::new(width, height);
        self.base_radius = width.min(height) * 0.5 * self.radius_fraction;
        self.camera.translate = Vec2::new(width * 0.5, height * 0.5);
    }

    /// Commit a rotation, clamping tilt and wrapping spin. Returns what was stored.
    pub fn set_rotation(&mut self, rotation: Rotation) -> Rotation {
        self.camera.rotation = rotation.constrained(self.max_tilt_deg);
        self.camera.rotation
    }

    /// Commit a scale, clamped to the configured bounds. NaN is ignored.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.camera.scale;
        }
        let (min, max) = self.scale_bounds();
        self.camera.scale = scale.clamp(min, max);
        self.camera.scale
    }

    /// Drag sensitivity: degrees of rotation per pixel at the current scale.
    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (2.0 * std::f64::consts::PI * self.camera.scale)
    }

    /// Turn a pointer delta into a rotation delta. Zoomed in, each pixel
    /// rotates less so the surface tracks the pointer.
    pub fn rotate_by(&mut self, dx: f64, dy: f64) -> Rotation {
        let k = self.degrees_per_pixel();
        let r = self.camera.rotation;
        self.set_rotation(Rotation::new(r.lambda + dx * k, r.phi - dy * k, r.gamma))
    }

    pub fn scale_by(&mut self, factor: f64) -> f64 {
        self.set_scale(self.camera.scale * factor)
    }

    /// Apply a command; true if the camera changed.
    pub fn apply(&mut self, command: CameraCommand) -> bool {
        let before = self.camera;
        match command {
            CameraCommand::RotateDelta { dx, dy } => {
                self.rotate_by(dx, dy);
            }
            CameraCommand::ScaleBy(factor) => {
                self.scale_by(factor);
            }
        }
        self.camera != before
    }

    /// Screen position of `p`, or `None` when it is on the far hemisphere.
    pub fn project(&self, p: LonLat) -> Option<Vec2> {
        if !is_on_visible_hemisphere(p, self.camera.rotation) {
            return None;
        }
        Some(self.project_unclipped(p))
    }

    fn project_unclipped(&self, p: LonLat) -> Vec2 {
        let r = self.camera.rotation.apply(p);
        let (lambda, phi) = (r.lon.to_radians(), r.lat.to_radians());
        let x = phi.cos() * lambda.sin();
        let y = phi.sin();
        let CameraState { scale, translate, .. } = self.camera;
        Vec2::new(translate.x + scale * x, translate.y - scale * y)
    }

    /// Geographic position under a screen point, or `None` off the disc.
    pub fn invert(&self, screen: Vec2) -> Option<LonLat> {
        let CameraState {
            rotation,
            scale,
            translate,
        } = self.camera;
        let x = (screen.x - translate.x) / scale;
        let y = (translate.y - screen.y) / scale;
        let rho2 = x * x + y * y;
        if rho2.is_nan() || rho2 > 1.0 {
            return None;
        }
        let z = (1.0 - rho2).sqrt();
        let view = LonLat::new(x.atan2(z).to_degrees(), y.clamp(-1.0, 1.0).asin().to_degrees());
        Some(rotation.invert(view))
    }

    /// Project a closed ring into screen-space polylines, one per run of
    /// visible vertices. A fully visible ring yields one run that repeats its
    /// first point at the end.
    pub fn project_ring(&self, ring: &[LonLat]) -> Vec<Vec<Vec2>> {
        let n = ring.len();
        let visible: Vec<bool> = ring
            .iter()
            .map(|&p| is_on_visible_hemisphere(p, self.camera.rotation))
            .collect();

        let Some(hidden) = visible.iter().position(|v| !v) else {
            let mut run: Vec<Vec2> = ring.iter().map(|&p| self.project_unclipped(p)).collect();
            if let Some(&first) = run.first() {
                run.push(first);
            }
            return if run.is_empty() { Vec::new() } else { vec![run] };
        };

        // Start just after a hidden vertex so runs never straddle the seam.
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for step in 1..=n {
            let i = (hidden + step) % n;
            if visible[i] {
                current.push(self.project_unclipped(ring[i]));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraCommand, ProjectionEngine};
    use crate::config::GlobeConfig;
    use foundation::math::{LonLat, Rotation, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "expected {a} ~= {b} (eps={eps})");
    }

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(800.0, 600.0, &GlobeConfig::default())
    }

    #[test]
    fn base_radius_and_center() {
        let e = engine();
        assert_close(e.base_radius(), 270.0, 1e-12);
        assert_eq!(e.translate(), Vec2::new(400.0, 300.0));
        let c = e.project(LonLat::new(0.0, 0.0)).unwrap();
        assert_close(c.x, 400.0, 1e-9);
        assert_close(c.y, 300.0, 1e-9);
    }

    #[test]
    fn north_is_up_on_screen() {
        let e = engine();
        let p = e.project(LonLat::new(0.0, 45.0)).unwrap();
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0 - 270.0 * 45f64.to_radians().sin(), 1e-9);
    }

    #[test]
    fn far_side_is_invisible() {
        let e = engine();
        assert!(e.project(LonLat::new(180.0, 0.0)).is_none());
        assert!(e.project(LonLat::new(120.0, 10.0)).is_none());
    }

    #[test]
    fn centered_rotation_puts_point_at_translate() {
        let mut e = engine();
        let p = LonLat::new(20.0, 10.0);
        e.set_rotation(Rotation::centered_on(p));
        let s = e.project(p).unwrap();
        assert_close(s.x, 400.0, 1e-9);
        assert_close(s.y, 300.0, 1e-9);
    }

    #[test]
    fn invert_recovers_projected_point() {
        let mut e = engine();
        e.set_rotation(Rotation::new(30.0, -20.0, 0.0));
        let p = LonLat::new(-25.0, 30.0);
        let s = e.project(p).unwrap();
        let back = e.invert(s).unwrap();
        assert_close(back.lon, p.lon, 1e-9);
        assert_close(back.lat, p.lat, 1e-9);
    }

    #[test]
    fn invert_outside_disc_is_none() {
        let e = engine();
        assert!(e.invert(Vec2::new(0.0, 0.0)).is_none());
        assert!(e.invert(Vec2::new(400.0 + 271.0, 300.0)).is_none());
    }

    #[test]
    fn tilt_is_clamped() {
        let mut e = engine();
        assert_eq!(e.set_rotation(Rotation::new(0.0, 200.0, 0.0)).phi, 80.0);
        assert_eq!(e.set_rotation(Rotation::new(0.0, -200.0, 0.0)).phi, -80.0);
    }

    #[test]
    fn spin_is_wrapped() {
        let mut e = engine();
        assert_close(e.set_rotation(Rotation::new(540.0, 0.0, 0.0)).lambda, -180.0, 1e-9);
        assert_close(e.set_rotation(Rotation::new(-190.0, 0.0, 0.0)).lambda, 170.0, 1e-9);
    }

    #[test]
    fn repeated_zoom_never_exceeds_bounds() {
        let mut e = engine();
        for _ in 0..50 {
            e.scale_by(1.7);
        }
        assert_eq!(e.scale(), 8.0 * 270.0);
        for _ in 0..50 {
            e.scale_by(0.3);
        }
        assert_eq!(e.scale(), 0.5 * 270.0);
        assert_eq!(e.set_scale(f64::NAN), 0.5 * 270.0);
    }

    #[test]
    fn initial_scale_respects_extent() {
        let config = GlobeConfig {
            scale_extent: [2.0, 8.0],
            ..GlobeConfig::default()
        };
        let e = ProjectionEngine::new(800.0, 600.0, &config);
        assert_eq!(e.scale_bounds(), (540.0, 2160.0));
        assert_eq!(e.scale(), 540.0);
        assert_close(e.zoom_ratio(), 2.0, 1e-12);

        let config = GlobeConfig {
            scale_extent: [0.25, 0.5],
            ..GlobeConfig::default()
        };
        let e = ProjectionEngine::new(800.0, 600.0, &config);
        assert_eq!(e.scale(), 135.0);
    }

    #[test]
    fn drag_sensitivity_depends_on_scale() {
        let mut e = engine();
        let r = e.rotate_by(10.0, 0.0);
        assert_close(r.lambda, 10.0 * 360.0 / (2.0 * std::f64::consts::PI * 270.0), 1e-12);

        let mut zoomed = engine();
        zoomed.scale_by(4.0);
        let rz = zoomed.rotate_by(10.0, 0.0);
        assert_close(rz.lambda * 4.0, r.lambda, 1e-12);

        let down = engine().rotate_by(0.0, 20.0);
        assert!(down.phi < 0.0);
    }

    #[test]
    fn viewport_resize_keeps_zoom_ratio() {
        let mut e = engine();
        e.scale_by(2.0);
        e.set_viewport(400.0, 1000.0);
        assert_close(e.base_radius(), 180.0, 1e-12);
        assert_close(e.zoom_ratio(), 2.0, 1e-12);
        assert_eq!(e.translate(), Vec2::new(200.0, 500.0));
    }

    #[test]
    fn apply_reports_change() {
        let mut e = engine();
        assert!(e.apply(CameraCommand::RotateDelta { dx: 5.0, dy: 0.0 }));
        assert!(e.apply(CameraCommand::ScaleBy(2.0)));
        e.scale_by(100.0);
        assert!(!e.apply(CameraCommand::ScaleBy(2.0)));
    }

    #[test]
    fn ring_split_at_the_limb() {
        let e = engine();
        let ring = [
            LonLat::new(60.0, -10.0),
            LonLat::new(80.0, -10.0),
            LonLat::new(100.0, -10.0),
            LonLat::new(100.0, 10.0),
            LonLat::new(80.0, 10.0),
            LonLat::new(60.0, 10.0),
        ];
        let runs = e.project_ring(&ring);
        assert_eq!(runs.len(), 1);
        // Walk starts after the first hidden vertex: (80,10) (60,10) (60,-10) (80,-10).
        assert_eq!(runs[0].len(), 4);

        let front = [
            LonLat::new(-10.0, -10.0),
            LonLat::new(10.0, -10.0),
            LonLat::new(10.0, 10.0),
        ];
        let runs = e.project_ring(&front);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 4);
        assert_eq!(runs[0][0], runs[0][3]);
    }
}
