use super::*;

#[test]
fn new_bitmap_is_transparent() {
    let b = Bitmap::new(3, 2).unwrap();
    assert_eq!(b.data.len(), 3 * 2 * 4);
    assert!(b.data.iter().all(|&v| v == 0));
    assert!(!b.is_empty());
}

#[test]
fn zero_sized_bitmap_is_representable_but_empty() {
    let b = Bitmap::new(0, 10).unwrap();
    assert!(b.is_empty());
    assert!(b.data.is_empty());
}

#[test]
fn from_premul_rejects_wrong_length() {
    assert!(Bitmap::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(Bitmap::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn opaque_bounds_finds_painted_region() {
    let mut b = Bitmap::new(5, 4).unwrap();
    assert_eq!(b.opaque_bounds(), None);

    for (x, y) in [(1u32, 1u32), (3, 2)] {
        let i = ((y * 5 + x) * 4) as usize;
        b.data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
    }
    assert_eq!(b.opaque_bounds(), Some((1, 1, 3, 2)));
}

#[test]
fn hex_colors_parse() {
    assert_eq!("#ffffff".parse::<Rgba8>().unwrap(), Rgba8::WHITE);
    assert_eq!("fff".parse::<Rgba8>().unwrap(), Rgba8::WHITE);
    assert_eq!(
        "#ff336680".parse::<Rgba8>().unwrap(),
        Rgba8 {
            r: 0xff,
            g: 0x33,
            b: 0x66,
            a: 0x80
        }
    );
    assert!("#ff33".parse::<Rgba8>().is_err());
    assert!("#gg0000".parse::<Rgba8>().is_err());
}

#[test]
fn color_serde_uses_hex_strings() {
    let c: Rgba8 = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(c, Rgba8::rgb(0x10, 0x20, 0x30));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#102030\"");
}

#[test]
fn premul_of_half_transparent_white() {
    let c = Rgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 128,
    };
    assert_eq!(c.to_premul(), [128, 128, 128, 128]);
}
