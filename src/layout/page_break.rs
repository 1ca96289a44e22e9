//! # Page Break Decisions
//!
//! Flow units are atomic, so the only question at a page boundary is how
//! many whole units the page takes.

/// Slack for float error in stacked heights.
const EPSILON: f64 = 1e-6;

/// What to do with the units offered to a page.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Every remaining unit fits. This is the last page.
    Place,
    /// Place the first `units_on_current_page` units; the rest overflow.
    Split { units_on_current_page: usize },
    /// Not even the first unit fits an empty page. It is placed on its own
    /// and clipped, otherwise pagination could never advance.
    Oversized,
}

/// How many leading units fit, given the stacked height after each one.
pub fn fit_count(available_height: f64, stacked_heights: &[f64]) -> usize {
    stacked_heights
        .iter()
        .take_while(|&&h| h <= available_height + EPSILON)
        .count()
}

/// Given the content height of a page and the stacked height after adding
/// each unit in turn, decide how to break.
///
/// `stacked_heights` may stop early (at the first height that no longer
/// fits); `remaining_units` is how many units were left to place in total.
pub fn decide_break(
    available_height: f64,
    stacked_heights: &[f64],
    remaining_units: usize,
) -> BreakDecision {
    let fits = fit_count(available_height, stacked_heights);

    if fits >= remaining_units {
        return BreakDecision::Place;
    }

    if fits == 0 {
        return BreakDecision::Oversized;
    }

    BreakDecision::Split {
        units_on_current_page: fits,
    }
}
