use crate::{CelestialErrors, radec::RaDec};
use serde::{Deserialize, Serialize};

pub const SKYVIEW_WIDTH: u32 = 600;
pub const SKYVIEW_HEIGHT: u32 = 600;

/// Gnomonic projection of `event` onto the plane tangent to the sphere at `target`.
///
/// # Arguments
///
/// * `event` - Direction being projected.
/// * `target` - Tangent point of the plane.
///
/// # Returns
///
/// `(x_t, y_t)` tangent plane coordinates in radians. Directions 90 degrees from the target
/// have no projection and come back non-finite.
pub fn gnomonic(event: &RaDec, target: &RaDec) -> (f64, f64) {
    let delta = event.ra - target.ra;
    let cos_delta = delta.cos();
    let tan_dec_e = event.dec.tan();
    let tan_dec_t = target.dec.tan();

    let x_t = delta.sin() / (target.dec.sin() * tan_dec_e + target.dec.cos() * cos_delta);
    let y_t = (tan_dec_e - tan_dec_t * cos_delta) / (tan_dec_t * tan_dec_e + cos_delta);
    (x_t, y_t)
}

/// Maps tangent plane offsets in degrees to pixel indices of a sky view.
pub trait PixelIndexMap {
    /// # Arguments
    ///
    /// * `deg_x` - Horizontal tangent plane offset from the target, degrees.
    /// * `deg_y` - Vertical tangent plane offset from the target, degrees.
    /// * `places` - Number of decimal places the pixel coordinates are rounded to.
    fn skyfield_to_index(&self, deg_x: f64, deg_y: f64, places: u32) -> (f64, f64);
}

/// Dimensions of the square-pixel sky image events are binned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkyView {
    pub width: u32,
    pub height: u32,
}

impl Default for SkyView {
    fn default() -> Self {
        Self { width: SKYVIEW_WIDTH, height: SKYVIEW_HEIGHT }
    }
}

impl SkyView {
    pub fn new(width: u32, height: u32) -> Result<Self, CelestialErrors> {
        let view = Self { width, height };
        view.validate()?;
        Ok(view)
    }

    pub fn validate(&self) -> Result<(), CelestialErrors> {
        if self.width < 2 || self.height < 2 {
            return Err(CelestialErrors::InvalidSkyView(self.width, self.height));
        }
        Ok(())
    }

    /// Zero based pixel the target lands on, `width / 2 - 1` with integer division.
    pub fn reference_pixel(&self) -> f64 {
        (self.width / 2 - 1) as f64
    }

    /// Reflects a horizontal pixel coordinate about the reference pixel so that RA
    /// increases to the left, as it does on the sky.
    pub fn mirror_x(&self, x: f64) -> f64 {
        (2 * (self.width / 2 - 1)) as f64 - x
    }
}

/// Pixel map with a constant plate scale and the target on the reference pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearPixelMap {
    reference_x: f64,
    reference_y: f64,
    sky_scale_x: f64,
    sky_scale_y: f64,
}

impl LinearPixelMap {
    /// # Arguments
    ///
    /// * `view` - Sky view the indices refer to.
    /// * `sky_scale_x` - Degrees per pixel along x.
    /// * `sky_scale_y` - Degrees per pixel along y.
    pub fn new(
        view: &SkyView,
        sky_scale_x: f64,
        sky_scale_y: f64,
    ) -> Result<Self, CelestialErrors> {
        view.validate()?;
        for scale in [sky_scale_x, sky_scale_y] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(CelestialErrors::InvalidSkyScale(scale));
            }
        }
        Ok(Self {
            reference_x: view.reference_pixel(),
            reference_y: (view.height / 2 - 1) as f64,
            sky_scale_x,
            sky_scale_y,
        })
    }
}

impl PixelIndexMap for LinearPixelMap {
    fn skyfield_to_index(&self, deg_x: f64, deg_y: f64, places: u32) -> (f64, f64) {
        (
            round_places(self.reference_x + deg_x / self.sky_scale_x, places),
            round_places(self.reference_y + deg_y / self.sky_scale_y, places),
        )
    }
}

/// Rounds half to even, like numpy.
pub fn round_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round_ties_even() / factor
}

/// Projects sky directions onto the pixel grid of a sky view centered on a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct TangentPlaneProjector {
    pub target: RaDec,
    pub view: SkyView,
    pub places: u32,
}

impl TangentPlaneProjector {
    pub fn new(target: RaDec, view: SkyView, places: u32) -> Self {
        Self { target, view, places }
    }

    /// # Arguments
    ///
    /// * `pixel_map` - Converts tangent plane degrees to pixel indices.
    /// * `event` - Sky direction of the event.
    ///
    /// # Returns
    ///
    /// Pixel coordinates `(x, y)` with the horizontal axis mirrored.
    pub fn project<P: PixelIndexMap + ?Sized>(&self, pixel_map: &P, event: &RaDec) -> (f64, f64) {
        let (x_t, y_t) = gnomonic(event, &self.target);
        let (x, y) = pixel_map.skyfield_to_index(x_t.to_degrees(), y_t.to_degrees(), self.places);
        (self.view.mirror_x(x), y)
    }
}
