use crate::libs::error::TadError;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// ```
/// use std::io::BufRead;
/// let reader = nestad::reader("tests/tad/sample.insulation").unwrap();
/// assert_eq!(reader.lines().collect::<Vec<_>>().len(), 34);
///
/// assert!(nestad::reader("tests/tad/not_exists").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .map_err(|why| anyhow::anyhow!("could not open {}: {}", path.display(), why))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let path = std::path::Path::new(output);
        let file = std::fs::File::create(path)
            .map_err(|why| anyhow::anyhow!("could not create {}: {}", path.display(), why))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufWriter::new(flate2::write::GzEncoder::new(
                file,
                flate2::Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(file))
        }
    };

    Ok(writer)
}

/// Gzip output; close it with `finish()` to write the trailer
pub fn gz_writer(output: &str) -> anyhow::Result<flate2::write::GzEncoder<BufWriter<std::fs::File>>> {
    let path = std::path::Path::new(output);
    let file = std::fs::File::create(path)
        .map_err(|why| anyhow::anyhow!("could not create {}: {}", path.display(), why))?;

    Ok(flate2::write::GzEncoder::new(
        BufWriter::new(file),
        flate2::Compression::default(),
    ))
}

/// Lines with their 1-based numbers, skipping `#` comments and blank lines
pub fn content_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = anyhow::Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) => {
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                if line.starts_with('#') || line.trim().is_empty() {
                    None
                } else {
                    Some(Ok((i + 1, line)))
                }
            }
            Err(e) => Some(Err(e.into())),
        })
}

/// Column name to position, from a tab-separated header row
///
/// ```
/// # use nestad::libs::io::columns;
/// let fields = columns("header\tstart\tend");
/// assert_eq!(fields.get("end"), Some(&2));
/// assert_eq!(fields.get_index(0), Some((&"header".to_string(), &0)));
/// ```
pub fn columns(line: &str) -> indexmap::IndexMap<String, usize> {
    line.split('\t')
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect()
}

pub fn require_column(
    fields: &indexmap::IndexMap<String, usize>,
    name: &str,
) -> Result<usize, TadError> {
    fields
        .get(name)
        .copied()
        .ok_or_else(|| TadError::MissingColumn(name.to_string()))
}

/// Pre-flight existence check for an input path
pub fn check_file(input: &str) -> Result<(), TadError> {
    if input == "stdin" || std::path::Path::new(input).is_file() {
        Ok(())
    } else {
        Err(TadError::MissingInputFile(input.to_string()))
    }
}

/// ```
/// # use nestad::libs::io::job_name;
/// assert_eq!(job_name("data/N2.matrix.gz"), "N2");
/// assert_eq!(job_name("/tmp/N2.is480001.boundaries.gz"), "N2.is480001.boundaries");
/// assert_eq!(job_name("sample.boundaries"), "sample.boundaries");
/// ```
pub fn job_name(input: &str) -> String {
    let basename = std::path::Path::new(input)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string());

    basename.replace(".gz", "").replace(".matrix", "")
}
