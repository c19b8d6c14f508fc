/// Frame decoding: register state plus the derived render area either
/// produces a `FrameDescriptor` for the presenter or declines.
///
/// Declining is the normal idle state (blank format, unconfigured
/// origin, degenerate geometry); the refresh interrupt fires on
/// schedule either way. Selecting the reserved pixel format is a
/// modeled hardware fault and surfaces as an error instead.

use crate::geometry::{GeometryVariant, RenderArea};
use crate::present::{FrameDescriptor, PixelFormat};
use crate::vif::ViError;

pub fn decode_frame(
    status: u32,
    origin: u32,
    area: &RenderArea,
    variant: GeometryVariant,
) -> Result<Option<FrameDescriptor>, ViError> {
    let format = match status & 0x3 {
        0 => return Ok(None),
        1 => return Err(ViError::ReservedFormat { status }),
        2 => PixelFormat::Rgba5551,
        _ => PixelFormat::Rgba8888,
    };

    let offset = origin & 0x00FF_FFFF;
    if variant == GeometryVariant::HalvedBounds && offset == 0 {
        // Nothing has pointed the VI at a frame buffer yet.
        return Ok(None);
    }

    if area.width <= 0 || area.height <= 0 {
        return Ok(None);
    }

    // Source rows are width + hskip pixels. A negative hskip means the
    // configured stride is narrower than the visible width; the deficit
    // folds into the decode width rather than reading past row ends.
    // Summed in i64: a verbatim full-word VI_WIDTH can push the slack to
    // i32::MAX, which must stay a wide-stride frame, not a panic.
    let source_width = area.width as i64 + area.hskip as i64;
    if source_width <= 0 {
        return Ok(None);
    }

    Ok(Some(FrameDescriptor {
        format,
        width: source_width as u32,
        height: area.height as u32,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Span;

    fn area(width: i32, height: i32, hskip: i32) -> RenderArea {
        RenderArea {
            x: Span::default(),
            y: Span::default(),
            width,
            height,
            hskip,
        }
    }

    #[test]
    fn blank_format_declines() {
        let got = decode_frame(0, 0x10_0000, &area(320, 240, 0), GeometryVariant::HalvedBounds);
        assert!(matches!(got, Ok(None)));
    }

    #[test]
    fn reserved_format_is_a_fault() {
        let got = decode_frame(1, 0x10_0000, &area(320, 240, 0), GeometryVariant::HalvedBounds);
        assert!(matches!(got, Err(ViError::ReservedFormat { status: 1 })));
    }

    #[test]
    fn zero_origin_declines() {
        let got = decode_frame(2, 0, &area(320, 240, 0), GeometryVariant::HalvedBounds);
        assert!(matches!(got, Ok(None)));
    }

    #[test]
    fn zero_origin_still_decodes_under_halved_span() {
        let got = decode_frame(2, 0, &area(320, 240, 0), GeometryVariant::HalvedSpan)
            .unwrap()
            .unwrap();
        assert_eq!(got.offset, 0);
    }

    #[test]
    fn origin_masks_to_24_bits() {
        let got = decode_frame(3, 0xA030_0000, &area(320, 240, 0), GeometryVariant::HalvedBounds)
            .unwrap()
            .unwrap();
        assert_eq!(got.offset, 0x30_0000);
    }

    #[test]
    fn degenerate_geometry_declines() {
        for bad in [area(0, 240, 0), area(-200, 240, 0), area(320, 0, 0), area(320, -10, 0)] {
            let got = decode_frame(2, 0x10_0000, &bad, GeometryVariant::HalvedBounds);
            assert!(matches!(got, Ok(None)), "area {bad:?}");
        }
    }

    #[test]
    fn sixteen_bit_frame() {
        let got = decode_frame(2, 0x10_0000, &area(320, 240, 64), GeometryVariant::HalvedBounds)
            .unwrap()
            .unwrap();
        assert_eq!(got.format, PixelFormat::Rgba5551);
        assert_eq!(got.width, 384); // visible width plus slack
        assert_eq!(got.height, 240);
        assert_eq!(got.bytes_per_pixel(), 2);
        assert_eq!(got.byte_len(), 384 * 240 * 2);
    }

    #[test]
    fn thirty_two_bit_frame() {
        let got = decode_frame(3, 0x20_0000, &area(640, 480, 0), GeometryVariant::HalvedBounds)
            .unwrap()
            .unwrap();
        assert_eq!(got.format, PixelFormat::Rgba8888);
        assert_eq!(got.bytes_per_pixel(), 4);
    }

    #[test]
    fn negative_hskip_narrows_the_decode_width() {
        let got = decode_frame(2, 0x10_0000, &area(320, 240, -64), GeometryVariant::HalvedBounds)
            .unwrap()
            .unwrap();
        assert_eq!(got.width, 256);
    }

    #[test]
    fn saturated_hskip_still_decodes() {
        let got = decode_frame(
            2,
            0x10_0000,
            &area(320, 240, i32::MAX),
            GeometryVariant::HalvedBounds,
        )
        .unwrap()
        .unwrap();
        assert_eq!(got.width, 320 + i32::MAX as u32);
    }

    #[test]
    fn hskip_swallowing_the_whole_width_declines() {
        let got = decode_frame(2, 0x10_0000, &area(320, 240, -320), GeometryVariant::HalvedBounds);
        assert!(matches!(got, Ok(None)));
    }
}
