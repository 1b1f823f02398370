use crate::libs::error::TadError;
use crate::libs::header::{de_group_chr, Header};
use crate::libs::matrix::format_value;
use crate::libs::tad::Tad;
use std::io::Write;

/// One BED row of a TAD
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub chr: String,
    pub start: u64,
    pub end: u64,
    pub name: String,
    pub score: f64,
}

impl TrackRecord {
    /// Coordinates come from the `boundaryHeader` ends, the name from the `header` ends
    ///
    /// ```
    /// # use nestad::libs::tad::Tad;
    /// # use nestad::libs::track::TrackRecord;
    /// let tad = Tad {
    ///     headers: ["b3|hg19|chr2-1:30-40".to_string(), "b7|hg19|chr2-1:70-80".to_string()],
    ///     boundary_headers: ["m3|hg19|chr2-1:32-36".to_string(), "m7|hg19|chr2-1:72-76".to_string()],
    ///     strength: 0.5,
    /// };
    /// let record = TrackRecord::from_tad(&tad).unwrap();
    /// assert_eq!(
    ///     record.to_string(),
    ///     "chr2\t32\t76\tb3|hg19|chr2-1:30-40___b7|hg19|chr2-1:70-80\t0.5000"
    /// );
    /// ```
    pub fn from_tad(tad: &Tad) -> Result<TrackRecord, TadError> {
        let left = Header::parse(&tad.boundary_headers[0])?;
        let right = Header::parse(&tad.boundary_headers[1])?;

        if left.chr != right.chr {
            return Err(TadError::CrossChromosomeTad {
                left: tad.boundary_headers[0].clone(),
                right: tad.boundary_headers[1].clone(),
            });
        }

        Ok(TrackRecord {
            chr: de_group_chr(&left.chr).to_string(),
            start: left.start,
            end: right.end,
            name: tad.headers.join(NAME_SEP),
            score: tad.strength,
        })
    }
}

impl std::fmt::Display for TrackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.chr,
            self.start,
            self.end,
            self.name,
            format_value(self.score, 4)
        )
    }
}

pub const NAME_SEP: &str = "___";

pub fn track_line(name: &str) -> String {
    format!(
        "track name='{}' description='{}' visibility=dense",
        name, name
    )
}

/// Track rows of all TADs, failing on the first invalid one
pub fn track_records(tads: &[Tad]) -> Result<Vec<TrackRecord>, TadError> {
    tads.iter().map(TrackRecord::from_tad).collect()
}

/// Writes the track declaration and the rows, in list order
pub fn write_track(
    writer: &mut dyn Write,
    name: &str,
    records: &[TrackRecord],
) -> std::io::Result<()> {
    writeln!(writer, "{}", track_line(name))?;
    for record in records {
        writeln!(writer, "{}", record)?;
    }

    Ok(())
}
