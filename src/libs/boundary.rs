use crate::libs::error::TadError;
use crate::libs::header::Header;
use crate::libs::io::{columns, content_lines, require_column};
use anyhow::Context;
use indexmap::{IndexMap, IndexSet};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub index: usize, // order of appearance in the table
    pub header: String,
    pub boundary_header: String,
    pub start: i64,
    pub end: i64,
    pub strength: f64,
    pub chr: usize,
    available: bool,
}

impl Boundary {
    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Boundary candidates of one run, kept in table order
///
/// Records are never reordered or resized after loading. The only mutation is
/// [`BoundarySet::consume`], which clears the `available` flag for good.
#[derive(Debug, Clone, Default)]
pub struct BoundarySet {
    records: Vec<Boundary>,
    chrs: IndexSet<String>,
    fields: IndexMap<String, usize>,
}

impl BoundarySet {
    /// Loads a boundary table
    ///
    /// Required columns: `header`, `boundaryHeader`, `start`, `end` and one of
    /// `boundaryInsulation` or `boundaryStrength`. With `boundaryInsulation`
    /// the strength is `-raw + |min(-raw)|`; `boundaryStrength` is taken as is.
    ///
    /// ```
    /// # use nestad::libs::boundary::BoundarySet;
    /// let input = "\
    /// header\tboundaryHeader\tstart\tend\tboundaryInsulation
    /// b1|hg19|chr1:0-10\tb1|hg19|chr1:0-10\t0\t10\t-0.5
    /// b2|hg19|chr1:10-20\tb2|hg19|chr1:10-20\t10\t20\t0.25
    /// ";
    /// let set = BoundarySet::from_reader(input.as_bytes()).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.get(0).unwrap().strength, 0.75);
    /// assert_eq!(set.get(1).unwrap().strength, 0.0);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<BoundarySet> {
        let mut lines = content_lines(reader);

        let header_line = match lines.next() {
            Some(line) => line?.1,
            None => return Ok(BoundarySet::default()),
        };
        let table_fields = columns(&header_line);

        let col_header = require_column(&table_fields, "header")?;
        let col_boundary_header = require_column(&table_fields, "boundaryHeader")?;
        let col_start = require_column(&table_fields, "start")?;
        let col_end = require_column(&table_fields, "end")?;
        let (col_strength, transform) = match table_fields.get("boundaryInsulation") {
            Some(&i) => (i, true),
            None => (require_column(&table_fields, "boundaryStrength")?, false),
        };
        let n_cols = [col_header, col_boundary_header, col_start, col_end, col_strength]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1;

        let mut records: Vec<Boundary> = vec![];
        let mut chrs: IndexSet<String> = IndexSet::new();

        for line in lines {
            let (line_no, line) = line?;
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < n_cols {
                return Err(TadError::MalformedLine {
                    line: line_no,
                    message: format!("expected at least {} fields, found {}", n_cols, parts.len()),
                }
                .into());
            }

            let header = parts[col_header];
            let parsed = Header::parse(header)?;
            let boundary_header = parts[col_boundary_header];
            let parsed_boundary = Header::parse(boundary_header)?;
            if parsed_boundary.chr != parsed.chr {
                return Err(TadError::MalformedLine {
                    line: line_no,
                    message: format!(
                        "boundaryHeader [{}] is not on chromosome [{}]",
                        boundary_header, parsed.chr
                    ),
                }
                .into());
            }

            // chromosomes must come in contiguous blocks
            let (chr_id, is_new) = chrs.insert_full(parsed.chr.clone());
            if !is_new && chr_id + 1 < chrs.len() {
                return Err(TadError::UnsortedInput {
                    chr: parsed.chr,
                    line: line_no,
                }
                .into());
            }

            let start = parse_field::<i64>(parts[col_start], "start", line_no)?;
            let end = parse_field::<i64>(parts[col_end], "end", line_no)?;
            let raw = parse_field::<f64>(parts[col_strength], "strength", line_no)?;
            if !raw.is_finite() {
                return Err(TadError::MalformedLine {
                    line: line_no,
                    message: format!("strength [{}] is not a finite number", parts[col_strength]),
                }
                .into());
            }

            records.push(Boundary {
                index: records.len(),
                header: header.to_string(),
                boundary_header: boundary_header.to_string(),
                start,
                end,
                strength: if transform { -raw } else { raw },
                chr: chr_id,
                available: true,
            });
        }

        if transform {
            let shift = records
                .iter()
                .map(|r| r.strength)
                .fold(f64::INFINITY, f64::min)
                .abs();
            for r in records.iter_mut() {
                r.strength += shift;
            }
        }

        // the synthetic `index` field takes position 0
        let mut fields: IndexMap<String, usize> = IndexMap::new();
        fields.insert("index".to_string(), 0);
        for (name, i) in table_fields {
            fields.entry(name).or_insert(i + 1);
        }

        log::info!(
            "Loaded {} boundaries on {} chromosomes",
            records.len(),
            chrs.len()
        );

        Ok(BoundarySet {
            records,
            chrs,
            fields,
        })
    }

    pub fn from_file(infile: &str) -> anyhow::Result<BoundarySet> {
        let reader = crate::reader(infile)?;
        BoundarySet::from_reader(reader).with_context(|| format!("loading boundaries from {}", infile))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Boundary] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Boundary> {
        self.records.get(index)
    }

    pub fn chr_count(&self) -> usize {
        self.chrs.len()
    }

    pub fn chr_name(&self, chr: usize) -> Option<&str> {
        self.chrs.get_index(chr).map(|s| s.as_str())
    }

    pub fn chr_id(&self, name: &str) -> Option<usize> {
        self.chrs.get_index_of(name)
    }

    /// Field name to column position, `index` first
    pub fn fields(&self) -> &IndexMap<String, usize> {
        &self.fields
    }

    /// Inclusive `[min, max]` record positions of a chromosome
    pub fn chr_range(&self, chr: usize) -> Option<(usize, usize)> {
        let mut range: Option<(usize, usize)> = None;
        for r in self.records.iter().filter(|r| r.chr == chr) {
            range = match range {
                None => Some((r.index, r.index)),
                Some((lo, hi)) => Some((lo.min(r.index), hi.max(r.index))),
            };
        }
        range
    }

    /// Marks a boundary as used; it never becomes available again
    pub fn consume(&mut self, index: usize) {
        if let Some(r) = self.records.get_mut(index) {
            r.available = false;
        }
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, name: &str, line: usize) -> Result<T, TadError> {
    value.parse::<T>().map_err(|_| TadError::MalformedLine {
        line,
        message: format!("invalid {} [{}]", name, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, f64)]) -> String {
        let mut s = "# comment\nheader\tstart\tend\tboundaryHeader\tboundaryInsulation\n".to_string();
        for (i, (chr, score)) in rows.iter().enumerate() {
            let h = format!("b{}|hg19|{}:{}-{}", i, chr, i * 10, i * 10 + 10);
            s += &format!("{}\t{}\t{}\t{}\t{}\n", h, i * 10, i * 10 + 10, h, score);
        }
        s
    }

    #[test]
    fn test_strength_transform() {
        let input = table(&[("chr1", 0.3), ("chr1", -0.2), ("chr2", 0.1), ("chr2", -0.6)]);
        let set = BoundarySet::from_reader(input.as_bytes()).unwrap();

        // negated: -0.3, 0.2, -0.1, 0.6; shift by 0.3
        let expected = [0.0, 0.5, 0.2, 0.9];
        for (r, e) in set.records().iter().zip(expected) {
            approx::assert_abs_diff_eq!(r.strength, e, epsilon = 1e-12);
        }
        let min = set
            .records()
            .iter()
            .map(|r| r.strength)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn test_raw_strength() {
        let input = "\
header\tboundaryHeader\tstart\tend\tboundaryStrength
b0|hg19|chr1:0-10\tm0|hg19|chr1:0-10\t0\t10\t0.1
b1|hg19|chr1:10-20\tm1|hg19|chr1:10-20\t10\t20\t0.9
";
        let set = BoundarySet::from_reader(input.as_bytes()).unwrap();
        assert_eq!(set.get(0).unwrap().strength, 0.1);
        assert_eq!(set.get(1).unwrap().strength, 0.9);
        assert_eq!(set.get(1).unwrap().boundary_header, "m1|hg19|chr1:10-20");
        assert!(set.get(1).unwrap().is_available());
    }

    #[test]
    fn test_fields() {
        let input = table(&[("chr1", 0.3)]);
        let set = BoundarySet::from_reader(input.as_bytes()).unwrap();
        let fields = set.fields();
        assert_eq!(fields.get_index(0), Some((&"index".to_string(), &0)));
        assert_eq!(fields.get("header"), Some(&1));
        assert_eq!(fields.get("boundaryInsulation"), Some(&5));
    }

    #[test]
    fn test_chr_ranges() {
        let input = table(&[
            ("chr1", 0.3),
            ("chr1", -0.2),
            ("chr1", 0.0),
            ("chr2-1", 0.1),
            ("chr3", -0.6),
            ("chr3", -0.1),
        ]);
        let set = BoundarySet::from_reader(input.as_bytes()).unwrap();
        assert_eq!(set.chr_count(), 3);
        assert_eq!(set.chr_name(1), Some("chr2-1"));
        assert_eq!(set.chr_id("chr3"), Some(2));
        assert_eq!(set.chr_range(0), Some((0, 2)));
        assert_eq!(set.chr_range(1), Some((3, 3)));
        assert_eq!(set.chr_range(2), Some((4, 5)));
        assert_eq!(set.chr_range(3), None);

        for chr in 0..set.chr_count() {
            let (lo, hi) = set.chr_range(chr).unwrap();
            assert!(set.records()[lo..=hi].iter().all(|r| r.chr == chr));
        }
    }

    #[test]
    fn test_unsorted() {
        let input = table(&[("chr1", 0.3), ("chr2", -0.2), ("chr1", 0.0)]);
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::UnsortedInput {
                chr: "chr1".to_string(),
                line: 5,
            })
        );
    }

    #[test]
    fn test_invalid_header() {
        let input = "\
header\tboundaryHeader\tstart\tend\tboundaryStrength
chr1:0-10\tchr1:0-10\t0\t10\t0.1
";
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::InvalidHeaderFormat("chr1:0-10".to_string()))
        );
    }

    #[test]
    fn test_invalid_boundary_header() {
        // a lone boundary never reaches assembly, the loader still rejects it
        let input = "\
header\tboundaryHeader\tstart\tend\tboundaryStrength
b0|hg19|chr1:0-10\tgarbage\t0\t10\t0.1
";
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::InvalidHeaderFormat("garbage".to_string()))
        );

        let input = "\
header\tboundaryHeader\tstart\tend\tboundaryStrength
b0|hg19|chr1:0-10\tm0|hg19|chr2:0-10\t0\t10\t0.1
";
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TadError>(),
            Some(TadError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_columns() {
        let input = "header\tstart\tend\tboundaryInsulation\n";
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::MissingColumn("boundaryHeader".to_string()))
        );

        let input = "header\tboundaryHeader\tstart\tend\n";
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::MissingColumn("boundaryStrength".to_string()))
        );
    }

    #[test]
    fn test_na_strength() {
        let input = table(&[("chr1", 0.3)]).replace("\t0.3\n", "\tNA\n");
        let err = BoundarySet::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TadError>(),
            Some(TadError::MalformedLine { line: 3, .. })
        ));
    }

    #[test]
    fn test_consume() {
        let input = table(&[("chr1", 0.3), ("chr1", -0.2)]);
        let mut set = BoundarySet::from_reader(input.as_bytes()).unwrap();
        set.consume(1);
        assert!(set.get(0).unwrap().is_available());
        assert!(!set.get(1).unwrap().is_available());
        set.consume(1);
        assert!(!set.get(1).unwrap().is_available());
    }

    #[test]
    fn test_empty() {
        let set = BoundarySet::from_reader("# nothing\n".as_bytes()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.chr_count(), 0);
    }
}
