use itertools::Itertools;
use nalgebra::DMatrix;
use std::io::Write;

/// A dense matrix with row and column headers
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    data: DMatrix<f64>,
}

impl NamedMatrix {
    pub fn new(rows: Vec<String>, cols: Vec<String>, data: DMatrix<f64>) -> anyhow::Result<Self> {
        if data.nrows() != rows.len() || data.ncols() != cols.len() {
            anyhow::bail!(
                "header/data mismatch! {}x{} headers for a {}x{} matrix",
                rows.len(),
                cols.len(),
                data.nrows(),
                data.ncols()
            );
        }
        Ok(Self { rows, cols, data })
    }

    /// A zero-filled square matrix over `names`
    pub fn zeros(names: Vec<String>) -> Self {
        let n = names.len();
        Self {
            rows: names.clone(),
            cols: names,
            data: DMatrix::zeros(n, n),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// `<rows>x<cols>` and column headers, then one line per row
    ///
    /// ```
    /// # use nestad::libs::matrix::NamedMatrix;
    /// let mut m = NamedMatrix::zeros(vec!["a".to_string(), "b".to_string()]);
    /// m.data_mut()[(0, 1)] = 1.0 / 3.0;
    /// m.data_mut()[(1, 1)] = f64::NAN;
    /// let mut out: Vec<u8> = vec![];
    /// m.write_to(&mut out, 4).unwrap();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     "2x2\ta\tb\na\t0.0000\t0.3333\nb\t0.0000\tnan\n"
    /// );
    /// ```
    pub fn write_to(&self, writer: &mut dyn Write, precision: usize) -> anyhow::Result<()> {
        writeln!(
            writer,
            "{}x{}\t{}",
            self.rows.len(),
            self.cols.len(),
            self.cols.join("\t")
        )?;

        for (i, header) in self.rows.iter().enumerate() {
            let values = self
                .data
                .row(i)
                .iter()
                .map(|&v| format_value(v, precision))
                .join("\t");
            writeln!(writer, "{}\t{}", header, values)?;
        }

        Ok(())
    }
}

/// Fixed precision, with `nan`, `inf` and `-inf` for non-finite values
pub fn format_value(v: f64, precision: usize) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.*}", precision, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.8, 4), "1.8000");
        assert_eq!(format_value(-0.00004, 4), "-0.0000");
        assert_eq!(format_value(f64::NEG_INFINITY, 4), "-inf");
        assert_eq!(format_value(2.0, 0), "2");
    }

    #[test]
    fn test_new_mismatch() {
        let data = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        assert!(NamedMatrix::new(vec!["r".to_string()], vec!["c".to_string()], data.clone()).is_err());

        let m = NamedMatrix::new(
            vec!["r".to_string()],
            vec!["c1".to_string(), "c2".to_string()],
            data,
        )
        .unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.cols().len(), 2);
    }
}
