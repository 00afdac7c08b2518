use crate::model::Category;

/// Values per bin the bin count is sized for.
pub const VALUES_PER_BIN: usize = 5;

pub fn bin_count(values: usize) -> usize {
    values.div_ceil(VALUES_PER_BIN)
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bin_count(values.len())` bins. Returns `None` for an
    /// empty collection. Non-finite values are left out of the counts.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let bins = bin_count(values.len());
        let finite = || values.iter().copied().filter(|value| value.is_finite());

        let min = finite().reduce(f64::min)?;
        let max = finite().reduce(f64::max)?;
        let (low, high) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        // Edges interpolate between the bounds so spans wider than f64::MAX
        // still produce finite edges.
        let edges: Vec<f64> = (0..=bins)
            .map(|index| match index {
                0 => low,
                _ if index == bins => high,
                _ => {
                    let t = index as f64 / bins as f64;
                    low * (1.0 - t) + high * t
                }
            })
            .collect();

        let width = high / bins as f64 - low / bins as f64;

        let mut counts = vec![0usize; bins];
        for value in finite() {
            let slot = (value / width - low / width).floor() as usize;
            counts[slot.min(bins - 1)] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn range(&self) -> (f64, f64) {
        let low = self.edges.first().copied().unwrap_or(0.0);
        let high = self.edges.last().copied().unwrap_or(low);
        (low, high)
    }

    /// `(left edge, right edge, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, count)| (edge[0], edge[1], *count))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramLayer {
    pub category: Category,
    pub histogram: Histogram,
}
