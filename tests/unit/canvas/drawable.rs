use super::*;

struct NeverDrawable;

impl Drawable for NeverDrawable {
    fn rasterize(&self, _width: u32, _height: u32) -> Option<RasterizedContent> {
        None
    }
}

fn px(content: &RasterizedContent, x: u32, y: u32) -> [u8; 4] {
    let i = ((y as usize) * (content.width as usize) + (x as usize)) * 4;
    [
        content.data[i],
        content.data[i + 1],
        content.data[i + 2],
        content.data[i + 3],
    ]
}

#[test]
fn solid_fill_premultiplies() {
    let out = SolidDrawable::new(255, 255, 255, 128).rasterize(2, 2).unwrap();
    assert_eq!(px(&out, 0, 0), [128, 128, 128, 128]);
    assert_eq!(px(&out, 1, 1), [128, 128, 128, 128]);
}

#[test]
fn zero_rect_is_a_silent_noop() {
    assert!(SolidDrawable::opaque(1, 2, 3).rasterize(0, 4).is_none());
    assert!(StackDrawable::new().rasterize(4, 0).is_none());
}

#[test]
fn stack_composites_in_append_order() {
    let mut stack = StackDrawable::new();
    stack.push(Box::new(SolidDrawable::opaque(255, 0, 0)));
    stack.push(Box::new(SolidDrawable::opaque(0, 0, 255)));
    let out = stack.rasterize(2, 2).unwrap();
    assert_eq!(px(&out, 0, 0), [0, 0, 255, 255]);
}

#[test]
fn failing_child_is_skipped_without_distinction() {
    // Known best-effort behavior: a child returning None is indistinguishable
    // from an intentionally empty child; the rest of the stack still draws.
    let mut stack = StackDrawable::new();
    stack.push(Box::new(SolidDrawable::opaque(10, 20, 30)));
    stack.push(Box::new(NeverDrawable));
    let out = stack.rasterize(2, 2).unwrap();
    assert_eq!(px(&out, 1, 0), [10, 20, 30, 255]);
}

#[test]
fn image_drawable_places_and_clips_at_origin() {
    let image = DecodedImage {
        width: 2,
        height: 2,
        rgba8_premul: std::sync::Arc::new(vec![9u8; 16]),
    };
    let out = ImageDrawable::new(image, Point::new(3.0, 3.0))
        .rasterize(4, 4)
        .unwrap();
    // Only the in-bounds top-left source pixel lands.
    assert_eq!(px(&out, 3, 3), [9, 9, 9, 9]);
    assert_eq!(px(&out, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn premul_over_skips_transparent_source_pixels() {
    let mut dst = vec![1u8, 2, 3, 255];
    premul_over_in_place(&mut dst, &[0u8, 0, 0, 0]);
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn rgba_image_source_premultiplies() {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 128]));
    let bytes = ImageSource::rgba8_premul(&img).into_owned();
    assert_eq!(bytes, vec![128, 128, 128, 128]);
    assert_eq!(ImageSource::dimensions(&img), (1, 1));
}
