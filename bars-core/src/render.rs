//! Bar Geometry
//!
//! Pure transform from a byte-frequency buffer to colored bar rectangles.
//! Two layouts share the surface: tiered bars growing from the bottom edge
//! and one mirrored bar per bin anchored at the vertical mid-line.  Painting
//! the rectangles (and the fade-erase between frames) is the frontend's job,
//! which keeps the geometry testable in isolation from surface accumulation.

/// One rectangle of a bar layout
///
/// `y` is the top edge, `height` extends downwards.  Hue is in degrees, the
/// painter combines it with full saturation and 50% lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub hue: f32,
}

/// Static render configuration
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Surface width in pixels
    pub width: f32,
    /// Surface height in pixels
    pub height: f32,
    /// Number of bars in the top layout
    pub num_bars: usize,
    /// Subtracted from the raw magnitude before the tier checks
    pub magnitude_offset: f32,
    /// Tier table for the top layout: a rectangle is emitted per tier whose
    /// threshold the shifted value strictly exceeds, scaled by the factor
    pub tiers: [(f32, f32); 3],
    /// Length of the filler rectangle drawn for negative shifted values
    ///
    /// Fixed at 1.0 by default.
    pub filler_len: f32,
    /// Alpha of the black erase overlay, smaller values leave a longer trail
    pub fade_alpha: u8,
}

impl RenderParams {
    pub fn new(width: f32, height: f32) -> RenderParams {
        RenderParams {
            width,
            height,
            num_bars: 128,
            magnitude_offset: 160.0,
            tiers: [(40.0, 5.0), (35.0, 4.0), (0.0, 3.0)],
            filler_len: 1.0,
            fade_alpha: 48,
        }
    }
}

/// Hue for a bar index, rotated linearly over the color wheel
///
/// Monotonic in `index`, stays inside `[0, 360)` for `index < total`.
pub fn hue(index: usize, total: usize) -> f32 {
    index as f32 / total as f32 * 360.0
}

/// Top layout: tiered bars growing from the bottom edge
///
/// For each of `num_bars` bars the raw magnitude is shifted down by
/// `magnitude_offset`.  Every tier whose threshold the shifted value exceeds
/// contributes one rectangle of length `shifted * factor`; a negative shifted
/// value yields only the minimal filler rectangle.  A shifted value of
/// exactly zero draws nothing.
pub fn layout_top(params: &RenderParams, freqs: &[u8], out: &mut Vec<BarRect>) {
    let bar_width = params.width / params.num_bars as f32 / 2.0;
    let pitch = bar_width * 2.0;

    for (index, &raw) in freqs.iter().take(params.num_bars).enumerate() {
        let shifted = raw as f32 - params.magnitude_offset;
        let hue = hue(index, params.num_bars);
        let x = index as f32 * pitch;

        for &(threshold, factor) in params.tiers.iter() {
            if shifted > threshold {
                let len = shifted * factor;
                out.push(BarRect {
                    x,
                    y: params.height - len,
                    width: bar_width,
                    height: len,
                    hue,
                });
            }
        }

        if shifted < 0.0 {
            out.push(BarRect {
                x,
                y: params.height - params.filler_len,
                width: bar_width,
                height: params.filler_len,
                hue,
            });
        }
    }
}

/// Bottom layout: one bar per frequency bin, anchored at the mid-line
pub fn layout_bottom(params: &RenderParams, freqs: &[u8], out: &mut Vec<BarRect>) {
    if freqs.is_empty() {
        return;
    }

    let bar_width = params.width / freqs.len() as f32;

    for (index, &raw) in freqs.iter().enumerate() {
        let len = raw as f32;
        out.push(BarRect {
            x: index as f32 * bar_width,
            y: params.height / 2.0 - len,
            width: bar_width,
            height: len,
            hue: hue(index, freqs.len()),
        });
    }
}

/// Full frame geometry: clears `out`, then top layout followed by bottom layout
pub fn frame_geometry(params: &RenderParams, freqs: &[u8], out: &mut Vec<BarRect>) {
    out.clear();
    layout_top(params, freqs, out);
    layout_bottom(params, freqs, out);
}

/// Convert an HSL color to RGB bytes
///
/// Hue in degrees, saturation and lightness in `0.0..=1.0`.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());

    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
