use crate::libs::boundary::BoundarySet;
use crate::libs::insulation::InsulationProfile;

/// A domain between two boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct Tad {
    /// `header` of the two ends, used for naming
    pub headers: [String; 2],
    /// `boundaryHeader` of the two ends, used for coordinates
    pub boundary_headers: [String; 2],
    /// max - min of the insulation scores across the domain, NaNs ignored
    pub strength: f64,
}

/// Missing-data summary of an insulation span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanQuality {
    pub na_fraction: f64,
    pub longest_na_run: usize,
}

impl SpanQuality {
    /// ```
    /// # use nestad::libs::tad::SpanQuality;
    /// let q = SpanQuality::of(&[1.0, f64::NAN, f64::NAN, 0.5, f64::NAN]);
    /// assert_eq!(q.na_fraction, 0.6);
    /// assert_eq!(q.longest_na_run, 2);
    /// ```
    pub fn of(scores: &[f64]) -> SpanQuality {
        let mut na = 0;
        let mut run = 0;
        let mut longest = 0;
        for v in scores {
            if v.is_nan() {
                na += 1;
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }

        SpanQuality {
            na_fraction: if scores.is_empty() {
                0.0
            } else {
                na as f64 / scores.len() as f64
            },
            longest_na_run: longest,
        }
    }
}

/// max - min ignoring NaNs; NaN if nothing is left
///
/// ```
/// # use nestad::libs::tad::nan_range;
/// assert_eq!(nan_range(&[0.25, f64::NAN, -0.5, 0.0]), 0.75);
/// assert!(nan_range(&[f64::NAN]).is_nan());
/// ```
pub fn nan_range(scores: &[f64]) -> f64 {
    let (min, max) = scores
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        f64::NAN
    } else {
        max - min
    }
}

/// Greedy nested-TAD assembly
#[derive(Debug, Clone, Copy)]
pub struct TadCaller {
    /// Strength band within which a neighbor counts as noise
    pub noise: f64,
    /// A TAD is emitted only if its NaN fraction is strictly below this
    pub max_na_fraction: f64,
    /// ... and its longest NaN run strictly below this
    pub max_na_run: usize,
}

impl Default for TadCaller {
    fn default() -> Self {
        Self {
            noise: 0.25,
            max_na_fraction: 0.25,
            max_na_run: 10,
        }
    }
}

impl TadCaller {
    pub fn new(noise: f64) -> Self {
        Self {
            noise,
            ..Default::default()
        }
    }

    /// Assembles every chromosome in table order
    pub fn assemble(
        &self,
        boundaries: &mut BoundarySet,
        profile: &InsulationProfile,
    ) -> anyhow::Result<Vec<Tad>> {
        let mut tads: Vec<Tad> = vec![];
        for chr in 0..boundaries.chr_count() {
            let before = tads.len();
            let anchors = self.assemble_chr(boundaries, chr, profile, &mut tads)?;
            log::info!(
                "{}: {} anchors, {} TADs",
                boundaries.chr_name(chr).unwrap_or_default(),
                anchors,
                tads.len() - before
            );
        }

        Ok(tads)
    }

    /// Assembles one chromosome, appending to `tads`. Returns the number of anchors.
    pub fn assemble_chr(
        &self,
        boundaries: &mut BoundarySet,
        chr: usize,
        profile: &InsulationProfile,
        tads: &mut Vec<Tad>,
    ) -> anyhow::Result<usize> {
        let (lo, hi) = match boundaries.chr_range(chr) {
            Some(range) => range,
            None => return Ok(0),
        };

        // ascending and stable, the strongest is popped first
        let mut candidates: Vec<(f64, usize)> = boundaries.records()[lo..=hi]
            .iter()
            .map(|r| (r.strength, r.index))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut anchors = 0;
        while let Some((strength, anchor)) = candidates.pop() {
            boundaries.consume(anchor);
            anchors += 1;
            log::debug!("anchor {} strength {:.4}", anchor, strength);

            self.create_tads(boundaries, anchor, (lo, hi), profile, tads)?;
        }

        Ok(anchors)
    }

    /// Whether a scanned boundary ends the search started at the anchor
    ///
    /// The two clauses overlap; both are kept as-is.
    pub fn is_terminus(&self, anchor: f64, strength: f64) -> bool {
        strength > anchor - self.noise || (anchor - strength).abs() > self.noise
    }

    fn create_tads(
        &self,
        boundaries: &BoundarySet,
        anchor: usize,
        (lo, hi): (usize, usize),
        profile: &InsulationProfile,
        tads: &mut Vec<Tad>,
    ) -> anyhow::Result<()> {
        let records = boundaries.records();
        let anchor_strength = records[anchor].strength;

        let left_bound = (lo..anchor).rev().find(|&i| records[i].is_available());
        let right_bound = (anchor + 1..=hi).find(|&i| records[i].is_available());

        if let Some(bound) = left_bound {
            let left = (bound..anchor)
                .rev()
                .find(|&i| self.is_terminus(anchor_strength, records[i].strength));
            if let Some(left) = left {
                if let Some(tad) = self.admit(boundaries, left, anchor, profile)? {
                    tads.push(tad);
                }
            }
        }

        if let Some(bound) = right_bound {
            let right = (anchor + 1..=bound)
                .find(|&i| self.is_terminus(anchor_strength, records[i].strength));
            if let Some(right) = right {
                if let Some(tad) = self.admit(boundaries, anchor, right, profile)? {
                    tads.push(tad);
                }
            }
        }

        Ok(())
    }

    /// Builds the TAD between two records, or `None` if too much data is missing
    fn admit(
        &self,
        boundaries: &BoundarySet,
        from: usize,
        to: usize,
        profile: &InsulationProfile,
    ) -> anyhow::Result<Option<Tad>> {
        let a = &boundaries.records()[from];
        let b = &boundaries.records()[to];

        let span = profile.span(&a.boundary_header, &b.boundary_header)?;
        let quality = SpanQuality::of(span);
        if quality.na_fraction >= self.max_na_fraction || quality.longest_na_run >= self.max_na_run {
            log::debug!(
                "rejected {} - {}: NA fraction {:.4}, NA run {}",
                a.header,
                b.header,
                quality.na_fraction,
                quality.longest_na_run
            );
            return Ok(None);
        }

        let tad = Tad {
            headers: [a.header.clone(), b.header.clone()],
            boundary_headers: [a.boundary_header.clone(), b.boundary_header.clone()],
            strength: nan_range(span),
        };
        log::debug!("TAD {} - {} strength {:.4}", a.header, b.header, tad.strength);

        Ok(Some(tad))
    }
}
