use super::*;

use crate::canvas::drawable::SolidDrawable;
use crate::foundation::core::Extent;

fn filled_canvas(w: u32, h: u32, rgb: [u8; 3], pool: &mut BufferPool) -> Canvas {
    let mut canvas = Canvas::create(w, h, Extent::ZERO, pool).unwrap();
    canvas.add_content(Box::new(SolidDrawable::opaque(rgb[0], rgb[1], rgb[2])));
    canvas.draw_contents().unwrap();
    canvas
}

fn plane_bytes(buffer: &PixelBuffer, plane: usize) -> Vec<u8> {
    let reader = buffer.lock_readable().unwrap();
    let layout = *buffer.plane(plane).unwrap();
    let mut out = Vec::new();
    for y in 0..layout.height {
        out.extend_from_slice(reader.row(plane, y));
    }
    out
}

#[test]
fn quantized_rows_sum_exactly() {
    let info = generate_conversion(FULL_RANGE);
    assert_eq!(info.y.iter().sum::<i64>(), ONE_Q16);
    assert_eq!(info.cb.iter().sum::<i64>(), 0);
    assert_eq!(info.cr.iter().sum::<i64>(), 0);
    // Blue carries half weight in both chroma rows.
    assert_eq!(info.cb[2], ONE_Q16 / 2);
    assert_eq!(info.cr[0], ONE_Q16 / 2);
}

#[test]
fn white_maps_to_peak_luma_and_neutral_chroma() {
    let mut pool = BufferPool::new();
    let canvas = filled_canvas(6, 4, [255, 255, 255], &mut pool);
    let out = FormatConverter::new().convert(&canvas, &mut pool).unwrap();

    assert!(plane_bytes(&out, 0).iter().all(|&v| v == 255));
    assert!(plane_bytes(&out, 1).iter().all(|&v| v == 128));
}

#[test]
fn black_clamps_to_the_full_range_luma_floor() {
    let mut pool = BufferPool::new();
    let canvas = filled_canvas(4, 4, [0, 0, 0], &mut pool);
    let out = FormatConverter::new().convert(&canvas, &mut pool).unwrap();

    // The full-range table clamps luma to [1, 255]; pure black lands on 1.
    assert!(plane_bytes(&out, 0).iter().all(|&v| v == 1));
    assert!(plane_bytes(&out, 1).iter().all(|&v| v == 128));
}

#[test]
fn grays_stay_neutral_and_bit_exact() {
    let mut pool = BufferPool::new();
    for gray in [1u8, 57, 128, 200, 254] {
        let canvas = filled_canvas(4, 2, [gray, gray, gray], &mut pool);
        let out = FormatConverter::new().convert(&canvas, &mut pool).unwrap();
        assert!(plane_bytes(&out, 0).iter().all(|&v| v == gray), "gray {gray}");
        assert!(plane_bytes(&out, 1).iter().all(|&v| v == 128), "gray {gray}");
    }
}

#[test]
fn output_geometry_for_even_and_odd_dimensions() {
    let mut pool = BufferPool::new();
    let converter = FormatConverter::new();

    for (w, h, cw, ch) in [(4u32, 4u32, 2u32, 2u32), (5, 3, 3, 2), (1, 1, 1, 1)] {
        let canvas = filled_canvas(w, h, [40, 80, 120], &mut pool);
        let out = converter.convert(&canvas, &mut pool).unwrap();
        let luma = out.plane(0).unwrap();
        let chroma = out.plane(1).unwrap();
        assert_eq!((luma.width, luma.height), (w, h));
        assert_eq!((chroma.width, chroma.height), (cw, ch));
    }
}

#[test]
fn conversion_is_deterministic_for_identical_input() {
    let mut pool = BufferPool::new();
    let converter = FormatConverter::new();

    let a = filled_canvas(7, 5, [13, 77, 201], &mut pool);
    let b = filled_canvas(7, 5, [13, 77, 201], &mut pool);
    let out_a = converter.convert(&a, &mut pool).unwrap();
    let out_b = converter.convert(&b, &mut pool).unwrap();

    assert_eq!(plane_bytes(&out_a, 0), plane_bytes(&out_b, 0));
    assert_eq!(plane_bytes(&out_a, 1), plane_bytes(&out_b, 1));
}

#[test]
fn destination_inherits_the_canvas_extent() {
    let mut pool = BufferPool::new();
    let mut canvas = Canvas::create(10, 10, Extent::uniform(10), &mut pool).unwrap();
    canvas.draw_contents().unwrap();
    let out = FormatConverter::new().convert(&canvas, &mut pool).unwrap();
    assert_eq!(out.extent(), Extent::uniform(10));
}
