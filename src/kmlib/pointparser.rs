use crate::kmlib::{KmError, PointStore, Result};
use std::{
    fs::File,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

type FileHandler = io::Result<io::Lines<io::BufReader<File>>>;

fn read_lines<P>(filename: P) -> FileHandler
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

/// Lines that carry data. Blank lines and '#' comments are skipped
fn is_data(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

fn split_fields(line: &str, delimiter: Option<char>) -> Vec<&str> {
    let line = line.trim();
    match delimiter {
        Some(c) if c.is_whitespace() => line.split_whitespace().collect(),
        Some(c) => line.split(c).map(str::trim).collect(),
        None if line.contains('\t') => line.split('\t').map(str::trim).collect(),
        None if line.contains(',') => line.split(',').map(str::trim).collect(),
        None => line.split_whitespace().collect(),
    }
}

pub struct PointParser {
    /* Reads delimited observation files into one flat buffer.
    Every row must have as many columns as the first and each value must be a finite number */
    file: PathBuf,
    delimiter: Option<char>,
}

impl PointParser {
    pub fn new(path: &Path, delimiter: Option<char>) -> Self {
        Self {
            file: path.to_path_buf(),
            delimiter,
        }
    }

    pub fn parse(&self) -> Result<PointStore> {
        self.parse_lines(read_lines(&self.file)?)
    }

    fn parse_lines<I>(&self, lines: I) -> Result<PointStore>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        let mut flat: Vec<f64> = Vec::new();
        let mut dim: Option<usize> = None;
        let mut n = 0;

        for line in lines {
            // Unreadable lines (bad UTF-8 included) fail the whole file
            let line = line?;
            if !is_data(&line) {
                continue;
            }
            let fields = split_fields(&line, self.delimiter);
            let d = *dim.get_or_insert(fields.len());
            if fields.len() != d {
                return Err(KmError::DimensionMismatch {
                    expected: d,
                    found: fields.len(),
                    row: n,
                });
            }

            for (col, field) in fields.iter().enumerate() {
                match field.parse::<f64>() {
                    Ok(value) if value.is_finite() => flat.push(value),
                    _ => {
                        return Err(KmError::BadValue {
                            row: n,
                            col,
                            value: field.to_string(),
                        })
                    }
                }
            }
            n += 1;
        }

        debug!("read {} observations of dimension {:?}", n, dim);
        PointStore::from_flat(n, dim.unwrap_or(0), flat)
    }
}

/// Read one integer cluster label per line
pub fn parse_labels(path: &Path) -> Result<Vec<i64>> {
    let mut ret = vec![];
    for line in read_lines(path)? {
        let line = line?;
        if !is_data(&line) {
            continue;
        }
        let field = line.trim();
        let label = field.parse::<i64>().map_err(|_| KmError::BadValue {
            row: ret.len(),
            col: 0,
            value: field.to_string(),
        })?;
        ret.push(label);
    }
    Ok(ret)
}
