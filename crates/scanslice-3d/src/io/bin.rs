use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Number of fields per record in the usual sweep logs: x, y, z, intensity.
pub const DEFAULT_FIELDS_PER_POINT: usize = 4;

/// Error types for the bin module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BinError {
    /// Failed to read or write the sweep log
    #[error("Failed to access the sweep log")]
    Io(#[from] std::io::Error),

    /// Invalid file extension
    #[error("Invalid sweep log file extension. Got:{0}")]
    InvalidFileExtension(String),

    /// A record must hold at least x, y, z.
    #[error("A record needs at least 3 fields. Got: {0}")]
    InvalidFieldCount(usize),

    /// The file size is not a multiple of the record size.
    #[error("Sweep log of {len} bytes ends with a partial record of {record_size} bytes")]
    TruncatedRecord {
        /// File size in bytes.
        len: usize,
        /// Size of one record in bytes.
        record_size: usize,
    },

    /// Rows written to a log must all have the same number of fields.
    #[error("Row {index} has {len} fields, expected {expected}")]
    RaggedRows {
        /// Position of the offending row.
        index: usize,
        /// Number of fields in the row.
        len: usize,
        /// Number of fields in the first row.
        expected: usize,
    },
}

fn check_extension(path: &Path) -> Result<(), BinError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("bin") => Ok(()),
        _ => Err(BinError::InvalidFileExtension(
            path.to_string_lossy().to_string(),
        )),
    }
}

/// Read a binary sweep log.
///
/// The log is a flat sequence of little-endian `f32` records with `fields_per_point` values each,
/// starting with x, y, z.
///
/// # Arguments
///
/// * `path` - Path to the `.bin` file.
/// * `fields_per_point` - Number of `f32` values per record, see [`DEFAULT_FIELDS_PER_POINT`].
///
/// # Returns
///
/// One row of `f64` per record, in file order.
pub fn read_bin_points(
    path: impl AsRef<Path>,
    fields_per_point: usize,
) -> Result<Vec<Vec<f64>>, BinError> {
    let path = path.as_ref();
    check_extension(path)?;

    if fields_per_point < 3 {
        return Err(BinError::InvalidFieldCount(fields_per_point));
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    let record_size = fields_per_point * std::mem::size_of::<f32>();
    if buffer.len() % record_size != 0 {
        return Err(BinError::TruncatedRecord {
            len: buffer.len(),
            record_size,
        });
    }

    let points = buffer
        .chunks_exact(record_size)
        .map(|record| {
            record
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    log::debug!("Read {} points from {}", points.len(), path.display());

    Ok(points)
}

/// Write point rows as a binary sweep log of little-endian `f32` records.
///
/// # Arguments
///
/// * `path` - Path to the `.bin` file.
/// * `points` - Rows with the same number of fields, at least 3.
pub fn write_bin_points<P: AsRef<[f64]>>(
    path: impl AsRef<Path>,
    points: &[P],
) -> Result<(), BinError> {
    let path = path.as_ref();
    check_extension(path)?;

    let expected = points.first().map_or(DEFAULT_FIELDS_PER_POINT, |p| p.as_ref().len());
    if expected < 3 {
        return Err(BinError::InvalidFieldCount(expected));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for (index, point) in points.iter().enumerate() {
        let row = point.as_ref();
        if row.len() != expected {
            return Err(BinError::RaggedRows {
                index,
                len: row.len(),
                expected,
            });
        }
        for value in row {
            writer.write_all(&(*value as f32).to_le_bytes())?;
        }
    }
    writer.flush()?;

    Ok(())
}
