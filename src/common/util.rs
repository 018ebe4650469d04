use std::fs::read_to_string;
use std::path::Path;


/// Text file content as lines
pub type FileContent = Vec<String>;

/// Numeric columns of a data file row
pub type Row = Vec<f64>;

/// Read text file as lines
pub fn read_lines(filepath: &str) -> Result<FileContent, String> {
    read_to_string(filepath)
        .map(|str| {str.lines().map(String::from).collect()})
        .map_err(|err| {format!("Can't read {}: {}", filepath, err)})
}

/// Parses whitespace-separated numeric rows, skipping blank lines and `#` comments
pub fn parse_rows(file_content: &FileContent, min_columns: usize, max_columns: usize) -> Result<Vec<Row>, String> {
    let mut rows = Vec::with_capacity(file_content.len());
    for (l, line) in file_content.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line.split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<Result<Row, _>>()
            .map_err(|err| {format!("Invalid number in line {}: {}", l+1, err)})?;
        if row.len()<min_columns || row.len()>max_columns {
            return Err(format!("Line {} must have {} to {} columns, got {}",
                l+1, min_columns, max_columns, row.len()));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Check validity of file path specification
pub fn check_file(value: &str) -> Result<(), String> {
    let p = Path::new(&value);
    if p.exists() && p.is_file() {
        match p.to_str() {
            Some(_) => Ok(()),
            None => Err(format!("Invalid file: {}", value))
        }
    } else {
        Err(format!("File path is invalid or can't be read: {}", value))
    }
}
