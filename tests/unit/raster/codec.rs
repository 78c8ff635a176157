use std::io::Cursor;

use super::*;

fn png_bytes(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let bitmap = decode_bitmap(&png_bytes(img)).unwrap();

    assert_eq!((bitmap.width, bitmap.height), (1, 1));
    assert_eq!(
        bitmap.data.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_empty_and_garbage() {
    assert!(matches!(decode_bitmap(&[]), Err(StickerError::Input(_))));
    assert!(matches!(
        decode_bitmap(b"definitely not an image"),
        Err(StickerError::Input(_))
    ));
}

#[test]
fn encode_png_writes_magic_and_round_trips_opaque_pixels() {
    let mut bitmap = Bitmap::new(2, 1).unwrap();
    bitmap.data.copy_from_slice(&[255, 0, 0, 255, 0, 0, 0, 0]);

    let png = encode_png(&bitmap).unwrap();
    assert_eq!(&png[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    let back = decode_bitmap(&png).unwrap();
    assert_eq!(back, bitmap);
}

#[test]
fn encode_rejects_empty_bitmap() {
    let bitmap = Bitmap::new(0, 4).unwrap();
    assert!(matches!(encode_png(&bitmap), Err(StickerError::Export(_))));
}
