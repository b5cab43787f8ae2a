//! EXIF metadata extraction from images.
//!
//! Opening the file as an image is the only hard requirement. Everything
//! read from the EXIF block afterwards is best-effort: missing or malformed
//! tags degrade to `None` instead of failing the ingestion.

use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::{GeoPoint, PhotoMetadata};

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// One degrees/minutes/seconds component as found in a GPS tag.
///
/// Writers disagree on the encoding: most store rationals, some store plain
/// floating-point or integer values. Both are accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DmsComponent {
    /// A numerator/denominator pair
    Ratio { numerator: i64, denominator: i64 },
    /// An already-evaluated value
    Plain(f64),
}

impl DmsComponent {
    /// Evaluate the component.
    ///
    /// Returns `None` for a zero denominator or a non-finite value.
    pub fn to_f64(self) -> Option<f64> {
        match self {
            DmsComponent::Ratio {
                numerator,
                denominator,
            } => {
                if denominator == 0 {
                    None
                } else {
                    Some(numerator as f64 / denominator as f64)
                }
            }
            DmsComponent::Plain(value) => value.is_finite().then_some(value),
        }
    }

    /// Decode every component held by an EXIF value.
    fn from_value(value: &Value) -> Vec<DmsComponent> {
        match value {
            Value::Rational(v) => v
                .iter()
                .map(|r| DmsComponent::Ratio {
                    numerator: i64::from(r.num),
                    denominator: i64::from(r.denom),
                })
                .collect(),
            Value::SRational(v) => v
                .iter()
                .map(|r| DmsComponent::Ratio {
                    numerator: i64::from(r.num),
                    denominator: i64::from(r.denom),
                })
                .collect(),
            Value::Float(v) => v.iter().map(|&x| DmsComponent::Plain(f64::from(x))).collect(),
            Value::Double(v) => v.iter().map(|&x| DmsComponent::Plain(x)).collect(),
            Value::Short(v) => v.iter().map(|&x| DmsComponent::Plain(f64::from(x))).collect(),
            Value::Long(v) => v.iter().map(|&x| DmsComponent::Plain(f64::from(x))).collect(),
            _ => Vec::new(),
        }
    }
}

/// Combine up to three DMS components into decimal degrees.
///
/// Missing minutes or seconds count as zero; writers that store decimal
/// degrees in a single component are handled that way.
pub fn dms_to_degrees(components: &[DmsComponent]) -> Option<f64> {
    let (degrees, minutes, seconds) = match components {
        [] => return None,
        [d] => (d.to_f64()?, 0.0, 0.0),
        [d, m] => (d.to_f64()?, m.to_f64()?, 0.0),
        [d, m, s, ..] => (d.to_f64()?, m.to_f64()?, s.to_f64()?),
    };
    Some(degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Build a position from latitude/longitude DMS tuples and hemisphere letters.
///
/// Latitude is negated for `S`, longitude for `W`. Returns `None` unless both
/// coordinates are complete and within range.
pub fn gps_from_components(
    latitude: &[DmsComponent],
    latitude_ref: char,
    longitude: &[DmsComponent],
    longitude_ref: char,
) -> Option<GeoPoint> {
    let mut lat = dms_to_degrees(latitude)?;
    let mut lon = dms_to_degrees(longitude)?;

    match latitude_ref.to_ascii_uppercase() {
        'N' => {}
        'S' => lat = -lat,
        _ => return None,
    }
    match longitude_ref.to_ascii_uppercase() {
        'E' => {}
        'W' => lon = -lon,
        _ => return None,
    }

    if lat.abs() > 90.0 || lon.abs() > 180.0 {
        return None;
    }
    Some(GeoPoint::new(lat, lon))
}

/// Parse an EXIF date/time string (`YYYY:MM:DD HH:MM:SS`).
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_end_matches('\0').trim().trim_matches('"');
    NaiveDateTime::parse_from_str(s, EXIF_DATETIME_FORMAT).ok()
}

/// Extracts location and capture time from image files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract metadata from an image file.
    ///
    /// Fails with `UnreadableImage` only when the file cannot be opened as an
    /// image. A readable image without EXIF yields `PhotoMetadata::default()`.
    pub fn extract(path: &Path) -> IngestResult<PhotoMetadata> {
        let (width, height) = Self::probe_image(path)?;
        tracing::trace!("  Image {}x{}", width, height);

        let Some(exif) = Self::read_exif(path) else {
            return Ok(PhotoMetadata::default());
        };

        Ok(PhotoMetadata {
            location: Self::get_location(&exif),
            taken_at: Self::get_datetime(&exif),
        })
    }

    /// Confirm the file is an image by reading its header.
    fn probe_image(path: &Path) -> IngestResult<(u32, u32)> {
        let unreadable = |message: String| IngestError::UnreadableImage {
            path: path.to_path_buf(),
            message,
        };

        let reader = image::ImageReader::open(path)
            .map_err(|e| unreadable(format!("Cannot open file: {}", e)))?
            .with_guessed_format()
            .map_err(|e| unreadable(format!("Cannot detect image format: {}", e)))?;

        if reader.format().is_none() {
            return Err(unreadable("Unrecognized image format".to_string()));
        }

        reader
            .into_dimensions()
            .map_err(|e| unreadable(e.to_string()))
    }

    /// Read the EXIF block, if the container has one.
    fn read_exif(path: &Path) -> Option<Exif> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Some(exif),
            Err(exif::Error::NotFound(_)) => None,
            Err(e) => {
                tracing::debug!("Ignoring malformed EXIF in {:?}: {}", path, e);
                None
            }
        }
    }

    /// Get the GPS position, if both coordinates and references are present.
    fn get_location(exif: &Exif) -> Option<GeoPoint> {
        let latitude = exif.get_field(Tag::GPSLatitude, In::PRIMARY)?;
        let longitude = exif.get_field(Tag::GPSLongitude, In::PRIMARY)?;
        let latitude = DmsComponent::from_value(&latitude.value);
        let longitude = DmsComponent::from_value(&longitude.value);
        let latitude_ref = Self::get_reference(exif, Tag::GPSLatitudeRef)?;
        let longitude_ref = Self::get_reference(exif, Tag::GPSLongitudeRef)?;

        gps_from_components(&latitude, latitude_ref, &longitude, longitude_ref)
    }

    /// Get a hemisphere reference letter (`N`, `S`, `E`, `W`).
    fn get_reference(exif: &Exif, tag: Tag) -> Option<char> {
        let text = Self::get_ascii(exif, tag)?;
        text.trim().chars().next()
    }

    /// Get the capture datetime, preferring DateTimeOriginal over DateTime.
    fn get_datetime(exif: &Exif) -> Option<NaiveDateTime> {
        [Tag::DateTimeOriginal, Tag::DateTime]
            .into_iter()
            .filter_map(|tag| Self::get_ascii(exif, tag))
            .find_map(|s| parse_exif_datetime(&s))
    }

    /// Get the first string of an ASCII field.
    fn get_ascii(exif: &Exif, tag: Tag) -> Option<String> {
        match &exif.get_field(tag, In::PRIMARY)?.value {
            Value::Ascii(strings) => strings
                .first()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }
}
