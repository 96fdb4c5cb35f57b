use super::*;

#[test]
fn descriptor_rejects_zero_dimensions() {
    assert!(BufferDescriptor::new(0, 10, Extent::ZERO, PixelFormat::PackedArgb8).is_err());
    assert!(BufferDescriptor::new(10, 0, Extent::ZERO, PixelFormat::PackedArgb8).is_err());
    assert!(BufferDescriptor::new(10, 10, Extent::ZERO, PixelFormat::PackedArgb8).is_ok());
}

#[test]
fn pool_key_is_canonical() {
    let desc = BufferDescriptor::new(
        100,
        50,
        Extent {
            top: 5,
            left: 6,
            bottom: 7,
            right: 8,
        },
        PixelFormat::PackedArgb8,
    )
    .unwrap();
    assert_eq!(desc.pool_key(), "100,50:5,6,7,8,argb");

    let planar = BufferDescriptor::new(100, 50, Extent::ZERO, PixelFormat::PlanarYCbCr420).unwrap();
    assert_eq!(planar.pool_key(), "100,50:0,0,0,0,420f");
}

#[test]
fn display_matches_pool_key() {
    let desc = BufferDescriptor::new(8, 8, Extent::uniform(2), PixelFormat::PlanarYCbCr420).unwrap();
    assert_eq!(desc.to_string(), desc.pool_key());
}

#[test]
fn descriptors_differing_only_in_extent_are_distinct_keys() {
    let a = BufferDescriptor::new(8, 8, Extent::ZERO, PixelFormat::PackedArgb8).unwrap();
    let b = BufferDescriptor::new(8, 8, Extent::uniform(1), PixelFormat::PackedArgb8).unwrap();
    assert_ne!(a, b);
    assert_ne!(a.pool_key(), b.pool_key());
}

#[test]
fn extent_uniform_and_totals() {
    let e = Extent::uniform(3);
    assert_eq!(e, Extent { top: 3, left: 3, bottom: 3, right: 3 });
    assert_eq!(e.horizontal(), 6);
    assert_eq!(e.vertical(), 6);
    assert_eq!(Extent { top: 1, left: 2, bottom: 3, right: 4 }.halved_ceil(), Extent {
        top: 1,
        left: 1,
        bottom: 2,
        right: 2
    });
}

#[test]
fn plane_counts_per_format() {
    assert_eq!(PixelFormat::PackedArgb8.plane_count(), 1);
    assert_eq!(PixelFormat::PlanarYCbCr420.plane_count(), 2);
}
