//! Calibrated 1-D surface profile extraction.
//!
//! Vision64 stores a line scan under the conventional `1D_Data/Raw` dict:
//! a `PositionFunction` PosData (raw positions plus divisor), an `Array` of
//! raw intensities, and `Extent`/`DataScale` quantities giving the scan
//! length and the height calibration factor. [`Profile1D`] resolves those
//! paths once and owns plain `f64` arrays from then on.

use crate::util::{polyfit, polyval, search_sorted, Error, Result};
use crate::vca::{Document, Value};

/// Dict holding the raw 1-D channel.
const RAW_1D: [&str; 2] = ["1D_Data", "Raw"];

/// A calibrated surface profile extracted from a decoded [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct Profile1D {
    x: Vec<f64>,
    y: Vec<f64>,
    extent: f64,
    scale: f64,
}

impl Profile1D {
    /// Resolve the `1D_Data/Raw` channel of a document.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let extent = raw_quantity(doc, "Extent")?;
        let scale = raw_quantity(doc, "DataScale")?;

        let pos = doc.get(&path_to("PositionFunction"))?;
        let pos = pos
            .as_pos_data()
            .ok_or_else(|| Error::mismatch("PosData", pos.type_name()))?;
        let x = pos.scaled();

        let array = doc.get(&path_to("Array"))?;
        let samples = array
            .as_samples()
            .ok_or_else(|| Error::mismatch("Array", array.type_name()))?;
        let y: Vec<f64> = samples.iter().map(|s| s * scale).collect();

        if x.len() != y.len() {
            return Err(Error::other(format!(
                "position/height length mismatch: {} vs {}",
                x.len(),
                y.len()
            )));
        }

        Ok(Self {
            x,
            y,
            extent,
            scale,
        })
    }

    /// Calibrated positions, ascending.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Calibrated heights (raw array × DataScale).
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Scan length from the `Extent` quantity.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Height calibration factor from the `DataScale` quantity.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the profile holds no samples.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Fit a degree-`deg` polynomial through the samples nearest the given
    /// anchor positions and evaluate it at every position.
    pub fn baseline(&self, anchors: &[f64], deg: usize) -> Result<Vec<f64>> {
        if self.x.is_empty() {
            return Err(Error::other("baseline of an empty profile"));
        }
        let last = self.x.len() - 1;
        let mut axs = Vec::with_capacity(anchors.len());
        let mut ays = Vec::with_capacity(anchors.len());
        for &a in anchors {
            let i = search_sorted(&self.x, a).min(last);
            axs.push(self.x[i]);
            ays.push(self.y[i]);
        }
        let coefs = polyfit(&axs, &ays, deg)?;
        Ok(self.x.iter().map(|&x| polyval(&coefs, x)).collect())
    }

    /// Level the profile against a linear baseline anchored at `start` and
    /// `end`, returning `(x, y − fit)` pairs.
    ///
    /// `start` defaults to 0 and `end` to the extent; a negative `end` is
    /// taken relative to the extent (`extent − end`). `end` must land past
    /// `start`.
    pub fn leveled(&self, start: Option<f64>, end: Option<f64>) -> Result<Vec<(f64, f64)>> {
        let r = start.unwrap_or(0.0);
        let m = match end {
            None => self.extent,
            Some(m) if m < 0.0 => self.extent - m,
            Some(m) => m,
        };
        if m <= r {
            return Err(Error::other(format!(
                "leveling span end {} must exceed start {}",
                m, r
            )));
        }
        let fit = self.baseline(&[r, m], 1)?;
        Ok(self
            .x
            .iter()
            .zip(self.y.iter().zip(&fit))
            .map(|(&x, (&y, &f))| (x, y - f))
            .collect())
    }
}

fn path_to(leaf: &str) -> [&str; 3] {
    [RAW_1D[0], RAW_1D[1], leaf]
}

fn raw_quantity(doc: &Document, leaf: &str) -> Result<f64> {
    let value = doc.get(&path_to(leaf))?;
    match value {
        Value::Quantity(q) => Ok(q.value),
        other => Err(Error::mismatch("Quantity", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted_profile() -> Profile1D {
        // y = 3 + 0.5x: a pure tilt that leveling should cancel exactly
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|x| 3.0 + 0.5 * x).collect();
        Profile1D {
            x,
            y,
            extent: 19.0,
            scale: 1.0,
        }
    }

    #[test]
    fn test_baseline_recovers_tilt() {
        let p = tilted_profile();
        let fit = p.baseline(&[0.0, 19.0], 1).unwrap();
        for (f, y) in fit.iter().zip(p.y()) {
            assert!((f - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_leveled_cancels_tilt() {
        let p = tilted_profile();
        let leveled = p.leveled(None, None).unwrap();
        assert_eq!(leveled.len(), p.len());
        for (x, y) in leveled {
            assert!(y.abs() < 1e-9, "residual {} at {}", y, x);
        }
    }

    #[test]
    fn test_leveled_negative_end() {
        let p = tilted_profile();
        // end = extent - (-4) = 23, clamped to the last sample by the
        // nearest-sample anchor lookup
        assert!(p.leveled(Some(2.0), Some(-4.0)).is_ok());
    }

    #[test]
    fn test_leveled_inverted_span() {
        let p = tilted_profile();
        assert!(matches!(
            p.leveled(Some(10.0), Some(5.0)),
            Err(Error::Other(_))
        ));
    }

    #[test]
    fn test_baseline_empty_profile() {
        let p = Profile1D {
            x: vec![],
            y: vec![],
            extent: 0.0,
            scale: 1.0,
        };
        assert!(p.baseline(&[0.0, 1.0], 1).is_err());
    }
}
