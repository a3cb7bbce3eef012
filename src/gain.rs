use std::fmt;
use winnow::ascii::{float, newline};
use winnow::combinator::{opt, separated, terminated};
use winnow::error::ContextError;
use winnow::Parser;

/// The ordered sequence of per-event average gains.
///
/// One entry is appended per completed event, in event order. The `Display`
/// and [`FromStr`](std::str::FromStr) implementations speak the persisted
/// format: one real number per line, no header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GainSeries {
    entries: Vec<f64>,
}

impl GainSeries {
    /// Creates a new empty series.
    ///
    /// # Examples
    ///
    /// ```
    /// use gain::gain::GainSeries;
    /// let series = GainSeries::new();
    /// assert!(series.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
    /// Creates a new empty series with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }
    /// Appends one event's average gain to the series.
    ///
    /// # Examples
    ///
    /// ```
    /// use gain::gain::GainSeries;
    ///
    /// let mut series = GainSeries::new();
    /// series.push(6.0);
    /// series.push(1.25);
    ///
    /// assert_eq!(series.len(), 2);
    /// assert_eq!(series.max_gain(), Some(6.0));
    /// ```
    pub fn push(&mut self, average_gain: f64) {
        self.entries.push(average_gain);
    }
    /// Returns the number of events in the series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// Returns `true` if no event has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Iterates over the per-event average gains in event order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().copied()
    }
    /// Returns the largest average gain, or `None` for an empty series.
    pub fn max_gain(&self) -> Option<f64> {
        self.entries.iter().copied().reduce(f64::max)
    }
}

impl fmt::Display for GainSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .entries
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        write!(f, "{text}")
    }
}

fn parse_entry(input: &mut &str) -> winnow::Result<f64> {
    float.parse_next(input)
}

/// The error type returned when parsing a [`GainSeries`] fails.
#[derive(Debug)]
pub struct ParseError {
    input: String,
    span: std::ops::Range<usize>,
}

impl ParseError {
    fn from_parse(error: winnow::error::ParseError<&str, ContextError>) -> Self {
        let input = error.input().to_string();
        let span = error.char_span();
        Self { input, span }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = annotate_snippets::Level::Error
            .title("invalid gain entry starting here")
            .snippet(
                annotate_snippets::Snippet::source(&self.input)
                    .fold(true)
                    .annotation(annotate_snippets::Level::Error.span(self.span.clone())),
            );
        let renderer = annotate_snippets::Renderer::plain();
        let rendered = renderer.render(message);
        write!(f, "{rendered}")
    }
}

impl std::error::Error for ParseError {}

impl std::str::FromStr for GainSeries {
    type Err = ParseError;

    /// Parse a [`GainSeries`] from a string in the persisted format: one real
    /// number per line, with an optional trailing newline.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use gain::gain::GainSeries;
    /// # use std::str::FromStr;
    /// let string = std::fs::read_to_string("gain.txt")?;
    /// let series = GainSeries::from_str(&string)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let entries = terminated(separated(0.., parse_entry, newline), opt(newline))
            .parse(input)
            .map_err(ParseError::from_parse)?;

        Ok(Self { entries })
    }
}

/// A fixed-bin-count summary of a [`GainSeries`].
///
/// Bins are equal width and span `[0, max + 1)`, where `max` is the largest
/// entry of the series. A histogram is derived from a finalized series; it is
/// never updated incrementally.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    counts: Vec<u32>,
    upper: f64,
}

impl Histogram {
    /// Bins `series` into `bins` equal-width bins over `[0, max + 1)`.
    ///
    /// Returns `None` when the series is empty or `bins` is zero. Entries at
    /// or above the upper edge are clamped into the last bin, so the bin
    /// counts always sum to the series length.
    ///
    /// # Examples
    ///
    /// ```
    /// use gain::gain::{GainSeries, Histogram};
    ///
    /// let mut series = GainSeries::new();
    /// for gain in [1.0, 2.0, 3.0, 9.0] {
    ///     series.push(gain);
    /// }
    ///
    /// let histogram = Histogram::over(&series, 5).unwrap();
    /// assert_eq!(histogram.upper(), 10.0);
    /// assert_eq!(histogram.counts(), [1, 2, 0, 0, 1]);
    /// ```
    pub fn over(series: &GainSeries, bins: u32) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let max = series.max_gain()?;
        let upper = max + 1.0;
        let width = upper / f64::from(bins);

        let mut counts = vec![0; bins as usize];
        for gain in series.iter() {
            let bin = ((gain / width) as usize).min(counts.len() - 1);
            counts[bin] += 1;
        }

        Some(Self { counts, upper })
    }
    /// Returns the per-bin entry counts, lowest bin first.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }
    /// Returns the lower edge of the first bin.
    pub fn lower(&self) -> f64 {
        0.0
    }
    /// Returns the upper edge of the last bin.
    pub fn upper(&self) -> f64 {
        self.upper
    }
    /// Returns the width of one bin.
    pub fn bin_width(&self) -> f64 {
        self.upper / self.counts.len() as f64
    }
    /// Returns the total number of entries over all bins.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.bin_width();
        let text = self
            .counts
            .iter()
            .enumerate()
            .map(|(bin, count)| {
                let lower = width * bin as f64;
                format!("[{lower:.3}, {:.3}) {count}", lower + width)
            })
            .collect::<Vec<_>>()
            .join("\n");

        write!(f, "{text}")
    }
}
