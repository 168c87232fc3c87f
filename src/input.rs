use crate::field::{Field, Frame};
use anyhow::{Context, Result, anyhow};
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::task;

/// Load a CSV file into a frame, parsing off the async runtime.
pub async fn load_frame(path: &Path) -> Result<Frame> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_stem()
        .map_or_else(|| "frame".to_string(), |stem| stem.to_string_lossy().into_owned());
    let frame = task::spawn_blocking(move || parse_frame_sync(&bytes, name))
        .await
        .context("failed to parse input frame")??;
    Ok(frame)
}

pub fn load_frame_from_stdin() -> Result<Frame> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    parse_frame_sync(&bytes, "stdin".to_string())
}

fn parse_frame_sync(data: &[u8], name: String) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let headers = reader
        .headers()
        .with_context(|| format!("missing CSV headers in {name}"))?
        .clone();
    if headers.is_empty() {
        return Err(anyhow!("input {name} has no columns"));
    }

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.with_context(|| format!("failed to read CSV record in {name}"))?;
        for (idx, column) in columns.iter_mut().enumerate() {
            // Flexible rows: a short row contributes empty cells.
            column.push(record.get(idx).unwrap_or("").to_string());
        }
    }

    let fields = headers
        .iter()
        .zip(columns)
        .map(|(header, values)| Field::new(header.trim().to_string(), values))
        .collect();

    Ok(Frame { name, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    #[test]
    fn parses_headers_and_typed_columns() {
        let data = b"latency,host\n1.5,web-1\n2.5,web-2\n";
        let frame = parse_frame_sync(data, "metrics".to_string()).unwrap();
        assert_eq!(frame.name, "metrics");
        assert_eq!(frame.fields.len(), 2);
        assert_eq!(frame.fields[0].field_type, FieldType::Number);
        assert_eq!(frame.fields[1].field_type, FieldType::String);
        assert_eq!(frame.row_count(), 2);
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let data = b"a,b\n1\n2,3\n";
        let frame = parse_frame_sync(data, "ragged".to_string()).unwrap();
        assert_eq!(frame.fields[1].values, vec![String::new(), "3".to_string()]);
        assert_eq!(frame.fields[1].field_type, FieldType::Number);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_frame_sync(b"", "empty".to_string()).unwrap_err();
        assert!(err.to_string().contains("no columns"));
    }
}
