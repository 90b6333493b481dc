//! Tab separated integer matrices without header, rows are individuals and columns loci.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;

pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<u32>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("unable to open matrix {}", path.display()))?;

    let mut values = Vec::new();
    let mut nrows = 0;
    let mut ncols = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("invalid row {} in {}", i + 1, path.display()))?;
        ncols = record.len();
        for field in record.iter() {
            values.push(field.trim().parse::<u32>().with_context(|| {
                format!(
                    "invalid value '{}' in row {} of {}, expected a non-negative integer",
                    field,
                    i + 1,
                    path.display()
                )
            })?);
        }
        nrows += 1;
    }

    Ok(Array2::from_shape_vec((nrows, ncols), values)?)
}

pub fn write_matrix<W, T>(writer: W, matrix: &Array2<T>) -> Result<()>
where
    W: io::Write,
    T: ToString,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    for row in matrix.rows() {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_roundtrip() {
        let matrix = array![[10u32, 0, 3], [4, 5, 6]];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_matrix(&mut file, &matrix).unwrap();
        file.flush().unwrap();
        assert_eq!(read_matrix(file.path()).unwrap(), matrix);
    }

    #[test]
    fn test_invalid_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\t2\n3\t-4").unwrap();
        assert!(read_matrix(file.path()).is_err());
    }

    #[test]
    fn test_ragged_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1\t2\n3").unwrap();
        assert!(read_matrix(file.path()).is_err());
    }
}
