//! End-to-end decoding of rendered symbols written to image files.
//!
//! Fixtures are generated with the crate's own ECC 200 encoder, saved as
//! PNG in a temporary directory, and read back through
//! `decode_data_matrix`, the same path the CLI takes.

use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use rust_dmtx::decoder::placement::Placement;
use rust_dmtx::{BitMatrix, DataMatrixReader, DecodeHints, SymbolVersion, decode_data_matrix, encoder};
use std::path::PathBuf;
use tempfile::TempDir;

fn save(dir: &TempDir, name: &str, image: &GrayImage) -> PathBuf {
    let path = dir.path().join(name);
    image.save(&path).expect("failed to write fixture");
    path
}

fn symbol(text: &str) -> BitMatrix {
    encoder::encode(text).expect("text should encode")
}

fn symbol_in(text: &str, rows: usize, cols: usize) -> BitMatrix {
    let version = SymbolVersion::for_dimensions(rows, cols).expect("size in table");
    encoder::encode_in(text, version).expect("text should fit")
}

#[test]
fn test_upright_symbol() {
    let dir = TempDir::new().unwrap();
    let path = save(&dir, "stego.png", &encoder::render(&symbol("Stegosaurus"), 5, 2));
    assert_eq!(decode_data_matrix(&path), "Stegosaurus");
}

#[test]
fn test_rotated_symbols() {
    let dir = TempDir::new().unwrap();
    let upright = encoder::render(&symbol("BM001128287"), 6, 3);
    let rotations = [
        ("r90.png", imageops::rotate90(&upright)),
        ("r180.png", imageops::rotate180(&upright)),
        ("r270.png", imageops::rotate270(&upright)),
    ];
    for (name, image) in &rotations {
        let path = save(&dir, name, image);
        assert_eq!(decode_data_matrix(&path), "BM001128287", "{name}");
    }
}

#[test]
fn test_multi_region_symbol() {
    let dir = TempDir::new().unwrap();
    let text = "Natural History Museum, London SW7 5BD";
    let path = save(&dir, "large.png", &encoder::render(&symbol_in(text, 32, 32), 4, 2));
    assert_eq!(decode_data_matrix(&path), text);
}

#[test]
fn test_rectangular_symbols() {
    let dir = TempDir::new().unwrap();
    let small = save(&dir, "8x18.png", &encoder::render(&symbol_in("RECT", 8, 18), 6, 2));
    assert_eq!(decode_data_matrix(&small), "RECT");

    let wide = save(&dir, "12x36.png", &encoder::render(&symbol_in("Two regions", 12, 36), 5, 2));
    assert_eq!(decode_data_matrix(&wide), "Two regions");
}

#[test]
fn test_colour_image() {
    let dir = TempDir::new().unwrap();
    let gray = encoder::render(&symbol("colour"), 5, 2);
    // Dark blue on yellow
    let rgb = RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] < 128 {
            Rgb([0, 0, 128])
        } else {
            Rgb([255, 255, 0])
        }
    });
    let path = dir.path().join("colour.png");
    rgb.save(&path).unwrap();
    assert_eq!(decode_data_matrix(&path), "colour");
}

#[test]
fn test_uneven_lighting() {
    let dir = TempDir::new().unwrap();
    let mut image = encoder::render(&symbol("shadowed label"), 6, 4);
    let width = image.width() as f32;
    for (x, _, pixel) in image.enumerate_pixels_mut() {
        // Light modules fade from 255 on the right to 120 on the left
        let light = 120.0 + 135.0 * x as f32 / width;
        pixel[0] = if pixel[0] == 0 { 20 } else { light as u8 };
    }
    let path = save(&dir, "shadow.png", &image);
    assert_eq!(decode_data_matrix(&path), "shadowed label");
}

#[test]
fn test_symbol_on_large_canvas() {
    let dir = TempDir::new().unwrap();
    let rendered = encoder::render(&symbol("offset"), 8, 2);
    let mut canvas = GrayImage::from_pixel(640, 480, Luma([240]));
    imageops::overlay(&mut canvas, &rendered, 300, 150);
    let path = save(&dir, "canvas.png", &canvas);
    assert_eq!(decode_data_matrix(&path), "offset");
}

#[test]
fn test_no_symbol() {
    let dir = TempDir::new().unwrap();
    let blank = save(&dir, "blank.png", &GrayImage::from_pixel(120, 80, Luma([255])));
    assert_eq!(decode_data_matrix(&blank), "");

    let mut square = GrayImage::from_pixel(120, 120, Luma([255]));
    for y in 30..90 {
        for x in 30..90 {
            square.put_pixel(x, y, Luma([0]));
        }
    }
    let square = save(&dir, "square.png", &square);
    assert_eq!(decode_data_matrix(&square), "");
}

#[test]
fn test_unreadable_files() {
    let dir = TempDir::new().unwrap();
    let text = dir.path().join("notes.png");
    std::fs::write(&text, "this is not an image").unwrap();
    assert_eq!(decode_data_matrix(&text), "");
    assert_eq!(decode_data_matrix(dir.path().join("missing.png")), "");
    // A directory is not a file
    assert_eq!(decode_data_matrix(dir.path()), "");
}

/// Flip one module in each of the first `count` codewords of a 16x16 symbol
fn damage(symbol: &mut BitMatrix, count: usize) {
    let placement = Placement::new(14, 14);
    for modules in &placement.codewords()[..count] {
        let (row, col) = modules[0];
        symbol.flip(col + 1, row + 1);
    }
}

#[test]
fn test_error_correction_limit() {
    let dir = TempDir::new().unwrap();

    // 12 error correction codewords repair up to 6 errors
    let mut repairable = symbol("Stegosaurus");
    assert_eq!(repairable.width(), 16);
    damage(&mut repairable, 5);
    let path = save(&dir, "five.png", &encoder::render(&repairable, 5, 2));
    assert_eq!(decode_data_matrix(&path), "Stegosaurus");

    let reader = DataMatrixReader::new(DecodeHints::new());
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(reader.decode_bytes(&bytes).unwrap().corrected_errors, 5);

    let mut broken = symbol("Stegosaurus");
    damage(&mut broken, 8);
    let path = save(&dir, "eight.png", &encoder::render(&broken, 5, 2));
    assert_eq!(decode_data_matrix(&path), "");
}

#[test]
fn test_decoding_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let path = save(&dir, "again.png", &encoder::render(&symbol("same answer"), 4, 2));
    let first = decode_data_matrix(&path);
    assert_eq!(first, "same answer");
    assert_eq!(decode_data_matrix(&path), first);
}

#[test]
fn test_reader_reports_geometry() {
    let rendered = encoder::render(&symbol("geometry"), 5, 2);
    let reader = DataMatrixReader::new(DecodeHints::new());
    let found = reader
        .decode_image(&image::DynamicImage::ImageLuma8(rendered))
        .unwrap();
    assert_eq!(found.text, "geometry");
    assert_eq!((found.version.rows, found.version.cols), (14, 14));
    assert_eq!(found.bounding_box(), (10.0, 10.0, 70.0, 70.0));
    assert_eq!(found.corrected_errors, 0);
    assert!(found.structured_append.is_none());
}

#[test]
fn test_pure_barcode_hint() {
    let rendered = encoder::render(&symbol("pure"), 3, 1);
    let reader = DataMatrixReader::new(DecodeHints::new().pure_barcode(true));
    let found = reader
        .decode_image(&image::DynamicImage::ImageLuma8(rendered))
        .unwrap();
    assert_eq!(found.text, "pure");
}
