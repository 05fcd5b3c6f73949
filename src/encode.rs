//! Binary encoding of a point set into a dense little-endian float32 blob.
//!
//! The blob layout is the full contract: for each point in capture order,
//! x, then y, then z, each narrowed from f64 to IEEE-754 single precision
//! and packed as 4 little-endian bytes. There is no header, length field,
//! or padding: a blob for N points is exactly `12 * N` bytes and the
//! consumer must know N out of band. Narrowing truncates the mantissa; that
//! loss is part of the format, not an error.
//!
//! Encoding is pure and deterministic: the same point set always yields a
//! byte-identical blob.

use crate::source::types::{Point3D, PointSet};
use std::path::Path;

/// Bytes per encoded point (three little-endian f32 values).
pub const BYTES_PER_POINT: usize = 12;

/// Errors raised while encoding a point set.
///
/// Both variants are fatal by design: failing fast beats silently emitting
/// a NaN/Inf bit pattern into a blob whose consumers assume finite data.
/// The capture phase filters non-finite samples already, but the encoder is
/// also invoked standalone on hand-edited record files, so it re-validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A coordinate was NaN or infinite at encode time.
    NonFinite { index: usize, axis: char },
    /// A finite double was outside the representable float32 range.
    Overflow { index: usize, axis: char },
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::NonFinite { index, axis } => {
                write!(f, "point {index} has a non-finite {axis} coordinate")
            }
            EncodeError::Overflow { index, axis } => {
                write!(
                    f,
                    "point {index} {axis} coordinate does not fit in float32"
                )
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors raised while decoding a blob back into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte length is not a whole number of 12-byte points.
    TruncatedBlob { len: usize },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TruncatedBlob { len } => {
                write!(f, "blob length {len} is not a multiple of {BYTES_PER_POINT}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Flatten and pack a point set into the float32 blob.
pub fn encode(points: &PointSet) -> Result<Vec<u8>, EncodeError> {
    let mut blob = Vec::with_capacity(points.len() * BYTES_PER_POINT);
    for (index, point) in points.iter().enumerate() {
        for (axis, value) in [('x', point.x), ('y', point.y), ('z', point.z)] {
            if !value.is_finite() {
                return Err(EncodeError::NonFinite { index, axis });
            }
            let narrowed = value as f32;
            if !narrowed.is_finite() {
                return Err(EncodeError::Overflow { index, axis });
            }
            blob.extend_from_slice(&narrowed.to_le_bytes());
        }
    }

    log::info!(
        "encoded {} points into {} bytes",
        points.len(),
        blob.len()
    );
    Ok(blob)
}

/// Unpack a blob back into points, widening each float32 to f64.
///
/// The inverse of [`encode`] up to the precision already lost while
/// narrowing; mainly useful for inspection and round-trip testing.
pub fn decode(blob: &[u8]) -> Result<Vec<Point3D>, DecodeError> {
    if blob.len() % BYTES_PER_POINT != 0 {
        return Err(DecodeError::TruncatedBlob { len: blob.len() });
    }

    let points = blob
        .chunks_exact(BYTES_PER_POINT)
        .map(|chunk| {
            let scalar = |i: usize| {
                f32::from_le_bytes([chunk[i], chunk[i + 1], chunk[i + 2], chunk[i + 3]]) as f64
            };
            Point3D::new(scalar(0), scalar(4), scalar(8))
        })
        .collect();
    Ok(points)
}

/// Write a blob to disk, replacing any existing file at `path`.
///
/// Staged to a temporary sibling and renamed into place so a failed write
/// never leaves a truncated blob behind.
pub fn write_blob(blob: &[u8], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    let tmp = path.with_file_name(name);

    std::fs::write(&tmp, blob)?;
    std::fs::rename(&tmp, path)?;

    log::info!("wrote {} byte blob to {path:?}", blob.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(points: &[(f64, f64, f64)]) -> PointSet {
        points
            .iter()
            .map(|&(x, y, z)| Point3D::new(x, y, z))
            .collect()
    }

    #[test]
    fn test_blob_length_is_twelve_bytes_per_point() {
        for n in [0usize, 1, 7, 100] {
            let points = set(&vec![(1.0, 2.0, 3.0); n]);
            assert_eq!(encode(&points).unwrap().len(), 12 * n);
        }
    }

    #[test]
    fn test_known_byte_layout() {
        // 1.0f32 = 0x3f800000, -2.0f32 = 0xc0000000, 0.5f32 = 0x3f000000,
        // little-endian, densely concatenated.
        let blob = encode(&set(&[(1.0, -2.0, 0.5)])).unwrap();
        assert_eq!(
            blob,
            vec![
                0x00, 0x00, 0x80, 0x3f, // x
                0x00, 0x00, 0x00, 0xc0, // y
                0x00, 0x00, 0x00, 0x3f, // z
            ]
        );
    }

    #[test]
    fn test_round_trip_matches_to_f32_precision() {
        // 0.1 is not exactly representable; the round trip must agree with
        // the narrowed value bit for bit, with zero additional error.
        let points = set(&[(0.1, 1e-8, 123456.789), (std::f64::consts::PI, -0.0, 4.0)]);
        let decoded = decode(&encode(&points).unwrap()).unwrap();

        assert_eq!(decoded.len(), points.len());
        for (original, round_tripped) in points.iter().zip(&decoded) {
            assert_eq!(round_tripped.x, original.x as f32 as f64);
            assert_eq!(round_tripped.y, original.y as f32 as f64);
            assert_eq!(round_tripped.z, original.z as f32 as f64);
        }
    }

    #[test]
    fn test_order_preserved() {
        let points = set(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0), (3.0, 0.0, 0.0)]);
        let decoded = decode(&encode(&points).unwrap()).unwrap();
        let xs: Vec<f64> = decoded.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let err = encode(&set(&[(1.0, f64::NAN, 2.0)])).unwrap_err();
        assert_eq!(err, EncodeError::NonFinite { index: 0, axis: 'y' });

        let err = encode(&set(&[(1.0, 2.0, 3.0), (f64::INFINITY, 0.0, 0.0)])).unwrap_err();
        assert_eq!(err, EncodeError::NonFinite { index: 1, axis: 'x' });
    }

    #[test]
    fn test_double_beyond_f32_range_is_rejected() {
        let err = encode(&set(&[(0.0, 0.0, 1e39)])).unwrap_err();
        assert_eq!(err, EncodeError::Overflow { index: 0, axis: 'z' });
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let points = set(&[(0.1, 0.2, 0.3), (4.0, 5.0, 6.0)]);
        assert_eq!(encode(&points).unwrap(), encode(&points).unwrap());
    }

    #[test]
    fn test_decode_rejects_ragged_length() {
        assert_eq!(
            decode(&[0u8; 13]).unwrap_err(),
            DecodeError::TruncatedBlob { len: 13 }
        );
    }

    #[test]
    fn test_write_blob_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.bin");

        let blob = encode(&set(&[(1.0, 2.0, 3.0)])).unwrap();
        write_blob(&blob, &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), blob);
        assert!(!dir.path().join("points.bin.tmp").exists());
    }
}
