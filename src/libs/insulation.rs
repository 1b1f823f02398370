use crate::libs::error::TadError;
use crate::libs::header::common_assembly;
use crate::libs::io::{columns, content_lines, require_column};
use anyhow::Context;
use indexmap::IndexSet;
use std::io::BufRead;

/// Per-bin insulation scores, in file order. `NA` is stored as NaN.
#[derive(Debug, Clone, Default)]
pub struct InsulationProfile {
    bins: IndexSet<String>,
    scores: Vec<f64>,
    missing: Vec<String>,
}

impl InsulationProfile {
    /// ```
    /// # use nestad::libs::insulation::InsulationProfile;
    /// let input = "\
    /// header\tinsulationScore
    /// b0|hg19|chr1:0-10\t0.5
    /// b1|hg19|chr1:10-20\tNA
    /// ";
    /// let profile = InsulationProfile::from_reader(input.as_bytes()).unwrap();
    /// assert_eq!(profile.len(), 2);
    /// assert_eq!(profile.index_of("b1|hg19|chr1:10-20"), Some(1));
    /// assert!(profile.scores()[1].is_nan());
    /// assert_eq!(profile.missing(), &["b1|hg19|chr1:10-20".to_string()]);
    /// ```
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<InsulationProfile> {
        let mut lines = content_lines(reader);

        let header_line = match lines.next() {
            Some(line) => line?.1,
            None => return Ok(InsulationProfile::default()),
        };
        let fields = columns(&header_line);
        let col_header = require_column(&fields, "header")?;
        let col_score = require_column(&fields, "insulationScore")?;

        let mut profile = InsulationProfile::default();
        for line in lines {
            let (line_no, line) = line?;
            let parts: Vec<&str> = line.split('\t').collect();
            let (header, value) = match (parts.get(col_header), parts.get(col_score)) {
                (Some(h), Some(v)) => (*h, *v),
                _ => {
                    return Err(TadError::MalformedLine {
                        line: line_no,
                        message: "missing header or insulationScore".to_string(),
                    }
                    .into())
                }
            };

            let score = if value == "NA" {
                f64::NAN
            } else {
                value.parse::<f64>().map_err(|_| TadError::MalformedLine {
                    line: line_no,
                    message: format!("invalid insulationScore [{}]", value),
                })?
            };

            if !profile.bins.insert(header.to_string()) {
                return Err(TadError::DuplicateBin(header.to_string()).into());
            }
            if score.is_nan() {
                profile.missing.push(header.to_string());
            }
            profile.scores.push(score);
        }

        let assembly = common_assembly(profile.bins.iter().map(|s| s.as_str()))?;
        log::info!(
            "Loaded {} insulation bins ({} missing), assembly {}",
            profile.len(),
            profile.missing.len(),
            assembly.unwrap_or_default()
        );

        Ok(profile)
    }

    pub fn from_file(infile: &str) -> anyhow::Result<InsulationProfile> {
        let reader = crate::reader(infile)?;
        InsulationProfile::from_reader(reader)
            .with_context(|| format!("loading insulation from {}", infile))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Bin headers in file order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.bins.iter().map(|s| s.as_str())
    }

    pub fn index_of(&self, header: &str) -> Option<usize> {
        self.bins.get_index_of(header)
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Headers of the bins scored `NA`
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Scores between two bins, both ends included, in either order
    pub fn span(&self, from: &str, to: &str) -> Result<&[f64], TadError> {
        let a = self
            .index_of(from)
            .ok_or_else(|| TadError::MissingBin(from.to_string()))?;
        let b = self
            .index_of(to)
            .ok_or_else(|| TadError::MissingBin(to.to_string()))?;

        Ok(&self.scores[a.min(b)..=a.max(b)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> InsulationProfile {
        let input = "\
# insulation
header\tstart\tend\tinsulationScore
b0|hg19|chr1:0-10\t0\t10\t0.5
b1|hg19|chr1:10-20\t10\t20\t-0.25
b2|hg19|chr1:20-30\t20\t30\tNA
b3|hg19|chr1:30-40\t30\t40\t0
";
        InsulationProfile::from_reader(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_load() {
        let profile = profile();
        assert_eq!(profile.len(), 4);
        assert_eq!(
            profile.headers().collect::<Vec<_>>(),
            vec![
                "b0|hg19|chr1:0-10",
                "b1|hg19|chr1:10-20",
                "b2|hg19|chr1:20-30",
                "b3|hg19|chr1:30-40"
            ]
        );
        assert_eq!(profile.scores()[1], -0.25);
        assert!(profile.scores()[2].is_nan());
        assert_eq!(profile.missing(), &["b2|hg19|chr1:20-30".to_string()]);
    }

    #[test]
    fn test_span() {
        let profile = profile();
        let span = profile.span("b3|hg19|chr1:30-40", "b1|hg19|chr1:10-20").unwrap();
        assert_eq!(span.len(), 3);
        assert_eq!(span[0], -0.25);

        assert_eq!(
            profile.span("b0|hg19|chr1:0-10", "zz|hg19|chr1:0-1"),
            Err(TadError::MissingBin("zz|hg19|chr1:0-1".to_string()))
        );
    }

    #[test]
    fn test_case_sensitive_na() {
        let input = "header\tinsulationScore\nb0|hg19|chr1:0-10\tna\n";
        let err = InsulationProfile::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TadError>(),
            Some(TadError::MalformedLine { line: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_bin() {
        let input = "header\tinsulationScore\nb0|hg19|chr1:0-10\t1\nb0|hg19|chr1:0-10\t2\n";
        let err = InsulationProfile::from_reader(input.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TadError>(),
            Some(&TadError::DuplicateBin("b0|hg19|chr1:0-10".to_string()))
        );
    }

    #[test]
    fn test_mixed_assembly() {
        let input = "header\tinsulationScore\nb0|hg19|chr1:0-10\t1\nb1|mm9|chr1:10-20\t2\n";
        let err = InsulationProfile::from_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TadError>(),
            Some(TadError::InconsistentAssembly { .. })
        ));
    }
}
