//! Test fixtures: tiny JPEGs, optionally carrying an EXIF block.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Encode a 2x2 JPEG whose pixels depend on `seed`, so different seeds give
/// different bytes.
pub(crate) fn jpeg_bytes(seed: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(2, 2, Rgb([seed, seed.wrapping_mul(3), 255 - seed]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

/// Write a JPEG without any EXIF data.
pub(crate) fn write_plain_jpeg(path: &Path, seed: u8) {
    std::fs::write(path, jpeg_bytes(seed)).unwrap();
}

/// Write a JPEG with an APP1 EXIF segment holding `fields`.
pub(crate) fn write_jpeg_with_exif(path: &Path, seed: u8, fields: &[Field]) {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let jpeg = jpeg_bytes(seed);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();

    // SOI, then APP1 "Exif\0\0" + TIFF, then the rest of the encoded JPEG
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, out).unwrap();
}

fn ascii_field(tag: Tag, value: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![value.as_bytes().to_vec()]),
    }
}

pub(crate) fn datetime_field(value: &str) -> Field {
    ascii_field(Tag::DateTime, value)
}

pub(crate) fn datetime_original_field(value: &str) -> Field {
    ascii_field(Tag::DateTimeOriginal, value)
}

pub(crate) fn gps_fields(
    latitude: [(u32, u32); 3],
    latitude_ref: &str,
    longitude: [(u32, u32); 3],
    longitude_ref: &str,
) -> Vec<Field> {
    let rationals = |dms: [(u32, u32); 3]| {
        Value::Rational(dms.iter().map(|&(num, denom)| Rational { num, denom }).collect())
    };
    gps_value_fields(rationals(latitude), latitude_ref, rationals(longitude), longitude_ref)
}

/// GPS fields with caller-chosen value encodings (doubles, shorts, ...).
pub(crate) fn gps_value_fields(
    latitude: Value,
    latitude_ref: &str,
    longitude: Value,
    longitude_ref: &str,
) -> Vec<Field> {
    vec![
        ascii_field(Tag::GPSLatitudeRef, latitude_ref),
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: latitude,
        },
        ascii_field(Tag::GPSLongitudeRef, longitude_ref),
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: longitude,
        },
    ]
}
