use crate::error::{Error, ErrorOrigin};
use std::iter::{Skip, Take};

///
/// PageWindow
///
/// Half-open pagination window `[low, high)` over the filtered, ordered
/// result set. `high == None` means unbounded.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageWindow {
    pub low: usize,
    pub high: Option<usize>,
}

impl PageWindow {
    /// Build a window from host marks, rejecting `low > high`.
    pub fn new(low: usize, high: Option<usize>) -> Result<Self, Error> {
        if let Some(high) = high
            && low > high
        {
            return Err(Error::validation(
                ErrorOrigin::Query,
                format!("pagination window is inverted: low mark {low} > high mark {high}"),
            ));
        }

        Ok(Self { low, high })
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self { low: 0, high: None }
    }

    /// Rows the window can hold; `None` when unbounded.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        match self.high {
            Some(high) => Some(high.saturating_sub(self.low)),
            None => None,
        }
    }

    /// Narrow the window to at most `rows` rows starting at `low`.
    #[must_use]
    pub fn capped(self, rows: usize) -> Self {
        let cap = self.low.saturating_add(rows);

        Self {
            low: self.low,
            high: Some(self.high.map_or(cap, |high| high.min(cap))),
        }
    }

    /// Number of rows that survive the window out of `total` candidates.
    #[must_use]
    pub fn clamp_len(&self, total: usize) -> usize {
        let end = self.high.map_or(total, |high| high.min(total));

        end.saturating_sub(self.low)
    }

    /// Skip to `low` and stop at `high`.
    pub fn apply<I: Iterator>(self, rows: I) -> Take<Skip<I>> {
        rows.skip(self.low).take(self.limit().unwrap_or(usize::MAX))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::PageWindow;

    #[test]
    fn inverted_marks_are_rejected() {
        let err = PageWindow::new(5, Some(3)).expect_err("inverted window");

        assert!(err.message.contains("low mark 5 > high mark 3"));
    }

    #[test]
    fn equal_marks_are_an_empty_window() {
        let window = PageWindow::new(4, Some(4)).expect("empty window");

        assert_eq!(window.limit(), Some(0));
        assert_eq!(window.apply(0..10).count(), 0);
    }

    #[test]
    fn apply_selects_logical_offsets() {
        let window = PageWindow::new(3, Some(5)).expect("window");

        assert_eq!(window.apply(0..10).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn unbounded_window_keeps_the_tail() {
        let window = PageWindow::new(7, None).expect("window");

        assert_eq!(window.apply(0..10).collect::<Vec<_>>(), vec![7, 8, 9]);
        assert_eq!(window.limit(), None);
    }

    #[test]
    fn clamp_len_counts_rows_inside_the_window() {
        let window = PageWindow::new(3, Some(5)).expect("window");

        assert_eq!(window.clamp_len(10), 2);
        assert_eq!(window.clamp_len(4), 1);
        assert_eq!(window.clamp_len(2), 0);
        assert_eq!(PageWindow::unbounded().clamp_len(6), 6);
    }

    #[test]
    fn capped_never_widens_the_window() {
        assert_eq!(
            PageWindow::unbounded().capped(1),
            PageWindow {
                low: 0,
                high: Some(1),
            }
        );
        assert_eq!(
            PageWindow::new(2, Some(2)).expect("window").capped(1).limit(),
            Some(0)
        );
        assert_eq!(
            PageWindow::new(2, Some(9)).expect("window").capped(1).high,
            Some(3)
        );
    }

    #[test]
    fn high_bounds_saturate() {
        let window = PageWindow::new(usize::MAX, None).expect("window").capped(1);

        assert_eq!(window.high, Some(usize::MAX));
        assert_eq!(window.clamp_len(usize::MAX), 0);
    }
}
