/// Visible-area geometry derived from the VI registers.
///
/// `derive_render_area` is a pure function of the five geometry
/// registers (VI_H_START, VI_V_START, VI_X_SCALE, VI_Y_SCALE,
/// VI_WIDTH). The controller recomputes it on every write to one of
/// those registers, so the cached copy is never stale at decode time.

use crate::regs::{ViRegister, NUM_VI_REGISTERS};

/// Physical output ceiling; larger derived sizes are hard-clamped.
pub const MAX_H_RES: i32 = 640;
pub const MAX_V_RES: i32 = 480;

/// Which geometry formula set the controller uses. Two divergent
/// implementations of this hardware exist in the wild and they are not
/// reconcilable from documentation alone, so both are modeled and one
/// is picked at construction time. `HalvedBounds` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryVariant {
    /// Y start/end are each halved before the span is taken; width is
    /// clamped to 640 before the stride slack is computed; a zero
    /// origin offset declines decode.
    HalvedBounds,
    /// The Y span is halved after subtraction; stride slack is computed
    /// from the unclamped width, with any excess over 640 folded into
    /// the slack at clamp time; zero origin offsets still decode.
    HalvedSpan,
}

impl Default for GeometryVariant {
    fn default() -> Self {
        GeometryVariant::HalvedBounds
    }
}

/// Inclusive-exclusive bounds along one axis, in console display
/// coordinates. For `HalvedBounds` the Y span is stored in frame lines;
/// for `HalvedSpan` it keeps the raw interlaced half-line units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

/// The visible area and output resolution the decoder works from.
///
/// `width`/`height` are signed: a start bound past its end bound yields
/// a non-positive dimension, which the decoder treats as "nothing to
/// present". `hskip` is extra source stride beyond the visible width
/// and may be negative when VI_WIDTH is narrower than the visible area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderArea {
    pub x: Span,
    pub y: Span,
    pub width: i32,
    pub height: i32,
    pub hskip: i32,
}

// VI_WIDTH is stored verbatim as a full 32-bit word, so the slack can
// exceed i32; saturate rather than truncate so the decode-side guards
// see the true sign and magnitude.
fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn derive_render_area(
    regs: &[u32; NUM_VI_REGISTERS],
    variant: GeometryVariant,
) -> RenderArea {
    let h_start = regs[ViRegister::HStart as usize];
    let v_start = regs[ViRegister::VStart as usize];
    let width_reg = regs[ViRegister::Width as usize] as i64;

    let x_start = (h_start >> 16) & 0x3FF;
    let x_end = h_start & 0x3FF;
    let y_start = (v_start >> 16) & 0x3FF;
    let y_end = v_start & 0x3FF;

    // 2.10 fixed-point scale coefficients.
    let hcoeff = (regs[ViRegister::XScale as usize] & 0xFFF) as i64;
    let vcoeff = (regs[ViRegister::YScale as usize] & 0xFFF) as i64;

    let x_span = x_end as i64 - x_start as i64;
    let width_raw = (x_span * hcoeff >> 10) as i32;

    match variant {
        GeometryVariant::HalvedBounds => {
            // Interlaced half-lines to frame lines before the span.
            let y_start = y_start / 2;
            let y_end = y_end / 2;
            let y_span = y_end as i64 - y_start as i64;

            let width = width_raw.min(MAX_H_RES);
            let height = ((y_span * vcoeff >> 10) as i32).min(MAX_V_RES);
            // Computed from the clamped width, so any clamp excess
            // lands in the slack.
            let hskip = saturate_i32(width_reg - width as i64);

            RenderArea {
                x: Span { start: x_start, end: x_end },
                y: Span { start: y_start, end: y_end },
                width,
                height,
                hskip,
            }
        }
        GeometryVariant::HalvedSpan => {
            let y_span = (y_end as i64 - y_start as i64) >> 1;

            let mut width = width_raw;
            let mut hskip = width_reg - width as i64;
            if width > MAX_H_RES {
                hskip += (width - MAX_H_RES) as i64;
                width = MAX_H_RES;
            }
            let hskip = saturate_i32(hskip);
            let height = ((y_span * vcoeff >> 10) as i32).min(MAX_V_RES);

            RenderArea {
                x: Span { start: x_start, end: x_end },
                y: Span { start: y_start, end: y_end },
                width,
                height,
                hskip,
            }
        }
    }
}
