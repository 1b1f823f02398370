use crate::libs::error::TadError;
use crate::libs::insulation::InsulationProfile;
use crate::libs::matrix::NamedMatrix;
use crate::libs::tad::Tad;

/// Projects TADs onto a bin x bin matrix
///
/// Each TAD adds its strength to the square block of the half-open range
/// between its two `boundaryHeader` bins, so nested TADs accumulate. Rows and
/// columns of bins with missing insulation end up NaN.
pub fn densify(tads: &[Tad], profile: &InsulationProfile) -> Result<NamedMatrix, TadError> {
    let names: Vec<String> = profile.headers().map(|s| s.to_string()).collect();
    let mut matrix = NamedMatrix::zeros(names);

    for tad in tads {
        let a = bin_index(profile, &tad.boundary_headers[0])?;
        let b = bin_index(profile, &tad.boundary_headers[1])?;
        let (start, end) = (a.min(b), a.max(b));
        if start == end {
            continue;
        }

        let len = end - start;
        matrix
            .data_mut()
            .view_mut((start, start), (len, len))
            .add_scalar_mut(tad.strength);
    }

    for header in profile.missing() {
        let i = bin_index(profile, header)?;
        let data = matrix.data_mut();
        data.row_mut(i).fill(f64::NAN);
        data.column_mut(i).fill(f64::NAN);
    }

    Ok(matrix)
}

fn bin_index(profile: &InsulationProfile, header: &str) -> Result<usize, TadError> {
    profile
        .index_of(header)
        .ok_or_else(|| TadError::MissingBin(header.to_string()))
}
