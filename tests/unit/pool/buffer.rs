use super::*;

fn packed(w: u32, h: u32, extent: Extent) -> BufferDescriptor {
    BufferDescriptor::new(w, h, extent, PixelFormat::PackedArgb8).unwrap()
}

fn planar(w: u32, h: u32, extent: Extent) -> BufferDescriptor {
    BufferDescriptor::new(w, h, extent, PixelFormat::PlanarYCbCr420).unwrap()
}

fn allocate(desc: BufferDescriptor) -> PixelBuffer {
    let (_, len) = plane_layouts(&desc).unwrap();
    PixelBuffer::from_storage(desc, vec![0u8; len]).unwrap()
}

#[test]
fn packed_layout_has_one_aligned_plane() {
    let buf = allocate(packed(100, 50, Extent::ZERO));
    assert_eq!(buf.plane_count(), 1);
    let p = buf.plane(0).unwrap();
    assert_eq!((p.width, p.height), (100, 50));
    assert_eq!(p.bytes_per_sample, 4);
    assert_eq!(p.row_bytes(), 400);
    assert!(p.stride >= p.row_bytes());
    assert!(p.stride.is_multiple_of(64));
}

#[test]
fn planar_layout_uses_ceil_half_chroma_geometry() {
    let buf = allocate(planar(101, 51, Extent::ZERO));
    assert_eq!(buf.plane_count(), 2);

    let luma = buf.plane(0).unwrap();
    assert_eq!((luma.width, luma.height), (101, 51));
    assert_eq!(luma.bytes_per_sample, 1);

    let chroma = buf.plane(1).unwrap();
    assert_eq!((chroma.width, chroma.height), (51, 26));
    assert_eq!(chroma.bytes_per_sample, 2);
    assert_eq!(chroma.row_bytes(), 102);
}

#[test]
fn extent_is_reported_exactly_as_supplied() {
    let extent = Extent {
        top: 5,
        left: 6,
        bottom: 7,
        right: 8,
    };
    let buf = allocate(packed(32, 32, extent));
    assert_eq!(buf.extent(), extent);
}

#[test]
fn rows_round_trip_through_locks() {
    let buf = allocate(packed(4, 2, Extent::uniform(2)));
    {
        let mut writer = buf.lock_writable().unwrap();
        writer.row_mut(0, 1).copy_from_slice(&[7u8; 16]);
    }
    let reader = buf.lock_readable().unwrap();
    assert_eq!(reader.row(0, 1), &[7u8; 16]);
    // The padded region keeps logical rows separated.
    assert_eq!(reader.row(0, 0), &[0u8; 16]);
}

#[test]
fn write_lock_excludes_other_locks() {
    let buf = allocate(packed(4, 4, Extent::ZERO));
    let _writer = buf.lock_writable().unwrap();
    assert!(matches!(
        buf.lock_readable(),
        Err(crate::foundation::error::ChromaplaneError::Lock(_))
    ));
    assert!(matches!(
        buf.lock_writable(),
        Err(crate::foundation::error::ChromaplaneError::Lock(_))
    ));
}

#[test]
fn read_locks_are_shared() {
    let buf = allocate(packed(4, 4, Extent::ZERO));
    let _a = buf.lock_readable().unwrap();
    assert!(buf.lock_readable().is_ok());
}

#[test]
fn storage_length_mismatch_is_rejected() {
    let desc = packed(4, 4, Extent::ZERO);
    assert!(matches!(
        PixelBuffer::from_storage(desc, vec![0u8; 3]),
        Err(crate::foundation::error::ChromaplaneError::Allocation(_))
    ));
}
