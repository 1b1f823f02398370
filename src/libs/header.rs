use crate::libs::error::TadError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_HEADER: Regex = Regex::new(r"(\S+)\|(\S+)\|(\S+):(\d+)-(\d+)").unwrap();
}

/// A bin header of the form `name|assembly|chr:start-end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub assembly: String,
    pub chr: String,
    pub start: u64,
    pub end: u64,
}

impl Header {
    /// ```
    /// # use nestad::libs::header::Header;
    /// let header = Header::parse("bin3|hg19|chr1-2:120000-160000").unwrap();
    /// assert_eq!(header.name, "bin3");
    /// assert_eq!(header.assembly, "hg19");
    /// assert_eq!(header.chr, "chr1-2");
    /// assert_eq!(header.start, 120000);
    /// assert_eq!(header.end, 160000);
    ///
    /// assert!(Header::parse("chr1:100-200").is_err());
    /// ```
    pub fn parse(header: &str) -> Result<Header, TadError> {
        let caps = RE_HEADER
            .captures(header)
            .ok_or_else(|| TadError::InvalidHeaderFormat(header.to_string()))?;

        let coord = |i: usize| -> Result<u64, TadError> {
            caps[i]
                .parse::<u64>()
                .map_err(|_| TadError::InvalidHeaderFormat(header.to_string()))
        };

        Ok(Header {
            name: caps[1].to_string(),
            assembly: caps[2].to_string(),
            chr: caps[3].to_string(),
            start: coord(4)?,
            end: coord(5)?,
        })
    }
}

/// Strips a chromosome group suffix for UCSC usage
///
/// ```
/// # use nestad::libs::header::de_group_chr;
/// assert_eq!(de_group_chr("chr2-1"), "chr2");
/// assert_eq!(de_group_chr("chrX"), "chrX");
/// ```
pub fn de_group_chr(chr: &str) -> &str {
    chr.split('-').next().unwrap_or(chr)
}

/// The single assembly shared by all headers, `None` for an empty list
pub fn common_assembly<'a, I>(headers: I) -> Result<Option<String>, TadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut assembly: Option<String> = None;
    for header in headers {
        let parsed = Header::parse(header)?;
        match &assembly {
            None => assembly = Some(parsed.assembly),
            Some(expected) if *expected != parsed.assembly => {
                return Err(TadError::InconsistentAssembly {
                    expected: expected.clone(),
                    found: parsed.assembly,
                });
            }
            _ => {}
        }
    }

    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedded() {
        // unanchored search, surrounding text is tolerated
        let header = Header::parse("x bin1|mm9|chr7:0-40000 y").unwrap();
        assert_eq!(header.name, "bin1");
        assert_eq!(header.chr, "chr7");
        assert_eq!(header.end, 40000);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "bin1|hg19|chr1", "bin1|hg19|chr1:a-b", "bin1|chr1:1-2"] {
            assert_eq!(
                Header::parse(bad),
                Err(TadError::InvalidHeaderFormat(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_common_assembly() {
        let headers = ["b1|hg19|chr1:0-10", "b2|hg19|chr2:0-10"];
        assert_eq!(
            common_assembly(headers.iter().copied()).unwrap(),
            Some("hg19".to_string())
        );

        let headers = ["b1|hg19|chr1:0-10", "b2|mm9|chr2:0-10"];
        assert_eq!(
            common_assembly(headers.iter().copied()),
            Err(TadError::InconsistentAssembly {
                expected: "hg19".to_string(),
                found: "mm9".to_string(),
            })
        );

        assert_eq!(common_assembly(std::iter::empty()).unwrap(), None);
    }
}
