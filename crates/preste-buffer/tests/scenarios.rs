//! End-to-end scenarios over the public buffer surface.

use std::cmp::Ordering;
use std::sync::Arc;

use preste_buffer::prelude::*;

#[test]
fn varint_length_boundaries_end_to_end() {
    let values: [u32; 10] = [
        0,
        127,
        128,
        16_383,
        16_384,
        2_097_151,
        2_097_152,
        268_435_455,
        268_435_456,
        4_294_967_295,
    ];
    let lengths = [1usize, 1, 2, 2, 3, 3, 4, 4, 5, 5];

    let mut buf = MemBuffer::allocate(0);
    let mut previous = 0;
    for (value, expected) in values.iter().zip(lengths) {
        buf.write_varuint32(*value);
        assert_eq!(buf.writer_index() - previous, expected);
        previous = buf.writer_index();
    }
    assert_eq!(buf.writer_index(), 30);

    for value in values {
        assert_eq!(buf.read_varuint32().unwrap(), value);
    }
    assert_eq!(buf.reader_index(), 30);
}

#[test]
fn zigzag_roundtrip_with_negatives() {
    let values = [-1, -64, 0, 63, 64, -65, i32::MIN, i32::MAX];
    let lengths = [1usize, 1, 1, 1, 2, 2, 5, 5];

    let mut buf = MemBuffer::allocate(0);
    let mut previous = 0;
    for (value, expected) in values.iter().zip(lengths) {
        buf.write_varint32(*value);
        assert_eq!(buf.writer_index() - previous, expected);
        previous = buf.writer_index();
    }
    for value in values {
        assert_eq!(buf.read_varint32().unwrap(), value);
    }
}

#[test]
fn aligned_varint_padding_at_offset_one() {
    let mut buf = MemBuffer::allocate(16);
    buf.set_writer_index(1).unwrap();
    buf.write_varuint32_aligned(5);

    assert_eq!(buf.writer_index(), 4);
    let bytes = &buf.as_slice()[1..4];
    assert_eq!(bytes[0], 0x05);
    assert_eq!(bytes[1], 0x00);
    assert_eq!(bytes[2] & 0xC0, 0x40);

    buf.set_reader_index(1).unwrap();
    assert_eq!(buf.read_varuint32_aligned().unwrap(), 5);
    assert_eq!(buf.reader_index(), 4);
}

#[test]
fn off_heap_buffer_promotes_to_heap_on_grow() {
    let region = Arc::new(NativeRegion::from_vec(vec![0x5A; 8]));
    let mut buf = MemBuffer::from_region(Arc::clone(&region)).unwrap();
    assert!(buf.is_off_heap());
    assert_eq!(buf.address().unwrap(), region.as_ptr() as usize);

    // Fill the region through the buffer, then write past its end.
    buf.set_writer_index(8).unwrap();
    buf.write_bytes(&[0xC3; 12]);

    assert!(!buf.is_off_heap());
    assert_eq!(buf.size(), 40);
    assert_eq!(buf.writer_index(), 20);
    assert_eq!(&buf.as_slice()[..8], &[0x5A; 8]);
    assert_eq!(&buf.as_slice()[8..20], &[0xC3; 12]);
    assert!(buf.heap_array().is_ok());

    // The foreign region is untouched by the growth.
    assert_eq!(region.as_slice(), &[0x5A; 8]);
}

#[test]
fn little_endian_wire_bytes_on_any_host() {
    let mut buf = MemBuffer::allocate(4);
    buf.put_i32(0, 0x0A0B_0C0D).unwrap();
    let bytes: Vec<u8> = (0..4).map(|i| buf.get_u8(i).unwrap()).collect();
    assert_eq!(bytes, [0x0D, 0x0C, 0x0B, 0x0A]);
}

#[test]
fn sli_boundary_encodings() {
    let mut buf = MemBuffer::allocate(0);
    buf.write_sli_i64(1_073_741_823);
    assert_eq!(buf.writer_index(), 4);
    buf.write_sli_i64(1_073_741_824);
    assert_eq!(buf.writer_index(), 13);

    assert_eq!(buf.read_sli_i64().unwrap(), 1_073_741_823);
    assert_eq!(buf.read_sli_i64().unwrap(), 1_073_741_824);
}

#[test]
fn compare_agrees_with_equal_to() {
    let a = MemBuffer::wrap(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    let b = MemBuffer::wrap(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12]);

    assert_eq!(a.compare(&b, 0, 0, 10).unwrap(), Ordering::Equal);
    assert!(a.equal_to(&b, 0, 0, 10).unwrap());

    assert_eq!(a.compare(&b, 0, 0, 11).unwrap(), Ordering::Less);
    assert!(!a.equal_to(&b, 0, 0, 11).unwrap());
    assert_eq!(b.compare(&a, 0, 0, 11).unwrap(), Ordering::Greater);
}

#[test]
fn region_view_transfers() {
    let mut buf = MemBuffer::allocate(8);
    buf.write_bytes(b"abcdefgh");

    let view = buf.region_view(2, 4).unwrap();
    let mut out = [0u8; 4];
    view.read_into(&mut out).unwrap();
    assert_eq!(&out, b"cdef");

    let mut whole = [0u8; 5];
    assert!(matches!(
        view.read_into(&mut whole),
        Err(BufferError::Underflow { need: 5, remaining: 4 })
    ));
}

#[test]
fn mixed_wire_stream_roundtrip() {
    // A representative serializer frame: flags, type ids, lengths, payloads.
    let mut buf = MemBuffer::allocate(0);
    buf.write_bool(true);
    buf.write_varuint32(0xCAFE);
    buf.write_varint64(-123_456_789_012);
    buf.write_f64(6.02214076e23);
    buf.write_bytes_with_size(b"field name");
    buf.write_sli_i64(-7);
    buf.write_varuint32_aligned(99);
    buf.write_u16s_with_size(&[0x0102, 0x0304]);

    assert!(buf.read_bool().unwrap());
    assert_eq!(buf.read_varuint32().unwrap(), 0xCAFE);
    assert_eq!(buf.read_varint64().unwrap(), -123_456_789_012);
    assert_eq!(buf.read_f64().unwrap(), 6.02214076e23);
    assert_eq!(buf.read_bytes_with_size().unwrap(), b"field name");
    assert_eq!(buf.read_sli_i64().unwrap(), -7);
    assert_eq!(buf.read_varuint32_aligned().unwrap(), 99);
    assert_eq!(buf.read_u16s_with_size().unwrap(), vec![0x0102, 0x0304]);
    assert_eq!(buf.reader_index(), buf.writer_index());
}
