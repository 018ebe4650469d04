//! Elevation based vertex coloring for terrain previews and prints.

use tracing::{trace, warn};

use crate::common::types::*;
use crate::common::color::*;


/// Height ranges below this are treated as flat terrain
const FLAT_RANGE: Height = 1e-4;

/// Normalized height assigned to flat terrain
const FLAT_POSITION: f64 = 0.5;

/// Smoothness below this snaps to the nearer of two stops
const HARD_BANDING_LIMIT: f64 = 0.3;

/// Smoothness below this quantizes into [`BAND_COUNT`] bands
const SOFT_BANDING_LIMIT: f64 = 0.7;

const BAND_COUNT: f64 = 5.0;


#[derive(Debug, Clone, PartialEq, Default)]
/// Flat RGB triplets, one per mesh vertex, index-aligned with the position buffer
pub struct VertexColorBuffer (Vec<ColorComponent>);

impl VertexColorBuffer {
    fn with_capacity(vertices: usize) -> Self {
        VertexColorBuffer (Vec::with_capacity(3*vertices))
    }

    fn push(&mut self, color: RGB) {
        self.0.extend_from_slice(&[color.0, color.1, color.2]);
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.0.len()/3
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color of vertex `i`
    pub fn vertex(&self, i: usize) -> Option<RGB> {
        self.0.get(3*i..3*i+3).map(|c| RGB (c[0], c[1], c[2]))
    }

    pub fn as_slice(&self) -> &[ColorComponent] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ColorComponent> {
        self.0
    }
}

fn is_clipped(clipped_mask: &[bool], i: usize) -> bool {
    clipped_mask.get(i).copied().unwrap_or(false)
}

/// Min and max over unclipped vertices, (0, 0) when every vertex is clipped
fn height_range(elevations: &[Height], clipped_mask: &[bool]) -> (Height, Height) {
    let range = elevations.iter()
        .enumerate()
        .filter(|(i, _)| !is_clipped(clipped_mask, *i))
        .fold(None, |acc: Option<(Height, Height)>, (_, &h)| match acc {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        });
    range.unwrap_or((0.0, 0.0))
}

/// Bracketing stops for `t`: first pair in stop order containing it, else the end pair nearest to it
fn bracket(gradient: &[ColorStop], t: f64) -> (&ColorStop, &ColorStop) {
    let first = &gradient[0];
    let last = &gradient[gradient.len()-1];
    if gradient.len()==1 {
        return (first, first);
    }

    gradient.windows(2)
        .find(|w| w[0].position<=t && t<=w[1].position)
        .map(|w| (&w[0], &w[1]))
        .unwrap_or_else(|| {
            if t<first.position {
                (first, &gradient[1])
            } else {
                (&gradient[gradient.len()-2], last)
            }
        })
}

/// Applies the smoothness banding to an interpolation factor
fn band(u: f64, smoothness: f64) -> f64 {
    if smoothness<HARD_BANDING_LIMIT {
        if u<0.5 {0.0} else {1.0}
    } else if smoothness<SOFT_BANDING_LIMIT {
        (u*BAND_COUNT).round()/BAND_COUNT
    } else {
        u
    }
}

/// Color of normalized height `t` on a non-empty gradient
pub(crate) fn gradient_color(gradient: &[ColorStop], t: f64, smoothness: f64) -> RGB {
    let (low, high) = bracket(gradient, t);
    let span = high.position - low.position;
    let u = if span==0.0 {0.0} else {((t - low.position)/span).clamp(0.0, 1.0)};
    low.color.lerp(&high.color, band(u, smoothness) as ColorComponent)
}

/// Colors mesh vertices by their elevation.
///
/// Clipped vertices always receive `fallback_color`, as does every vertex when the
/// gradient is empty. A clip mask shorter than `elevations` leaves the remaining vertices unclipped.
pub fn colorize(elevations: &[Height], clipped_mask: &[bool], gradient: &[ColorStop],
        smoothness: f64, fallback_color: RGB) -> VertexColorBuffer {

    if clipped_mask.len()!=elevations.len() {
        warn!(elevations = elevations.len(), clipped_mask = clipped_mask.len(), "clip mask length differs from vertex count");
    }

    let (min, max) = height_range(elevations, clipped_mask);
    let range = max - min;
    trace!(vertices = elevations.len(), min, max, stops = gradient.len(), "colorizing terrain");

    let mut colors = VertexColorBuffer::with_capacity(elevations.len());
    for (i, &h) in elevations.iter().enumerate() {
        if is_clipped(clipped_mask, i) || gradient.is_empty() {
            colors.push(fallback_color);
            continue;
        }

        let t = if range<FLAT_RANGE {FLAT_POSITION} else {(h - min)/range};
        colors.push(gradient_color(gradient, t, smoothness));
    }

    colors
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BLACK: RGB = RGB (0.0, 0.0, 0.0);
    const WHITE: RGB = RGB (1.0, 1.0, 1.0);
    const RED: RGB = RGB (1.0, 0.0, 0.0);

    fn black_white() -> Gradient {
        vec![
            ColorStop {position: 0.0, color: BLACK},
            ColorStop {position: 1.0, color: WHITE},
        ]
    }

    fn assert_gray(color: RGB, level: ColorComponent) {
        for c in [color.0, color.1, color.2] {
            assert!((c - level).abs()<1e-6, "{:?} is not gray {}", color, level);
        }
    }

    #[rstest]
    #[case(0.1, 0.0)]
    #[case(0.29, 0.0)]
    #[case(0.3, 0.4)]
    #[case(0.5, 0.4)]
    #[case(0.69, 0.4)]
    #[case(0.7, 0.4)]
    #[case(0.9, 0.4)]
    fn banding_t0(#[case] smoothness: f64, #[case] level: ColorComponent) {
        // the middle vertex sits at t = 0.4
        let colors = colorize(&[0.0, 40.0, 100.0], &[false; 3], &black_white(), smoothness, RED);
        assert_gray(colors.vertex(1).unwrap(), level);
    }

    #[rstest]
    #[case(0.1, 1.0)]
    #[case(0.5, 0.6)]
    #[case(0.9, 0.63)]
    fn banding_t1(#[case] smoothness: f64, #[case] level: ColorComponent) {
        let colors = colorize(&[0.0, 63.0, 100.0], &[false; 3], &black_white(), smoothness, RED);
        assert_gray(colors.vertex(1).unwrap(), level);
    }

    #[test]
    fn colorize_t0() {
        let colors = colorize(&[0.0, 50.0, 100.0], &[false; 3], &black_white(), 1.0, RED);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.as_slice().len(), 9);
        assert_eq!(colors.vertex(0), Some(BLACK));
        assert_gray(colors.vertex(1).unwrap(), 0.5);
        assert_eq!(colors.vertex(2), Some(WHITE));
        assert_eq!(colors.vertex(3), None);
    }

    #[test]
    fn colorize_clipped_t0() {
        // clipped extremes do not stretch the height range
        let elevations = [-500.0, 10.0, 20.0, 9000.0];
        let clipped = [true, false, false, true];
        let colors = colorize(&elevations, &clipped, &black_white(), 1.0, RED);
        assert_eq!(colors.vertex(0), Some(RED));
        assert_eq!(colors.vertex(1), Some(BLACK));
        assert_eq!(colors.vertex(2), Some(WHITE));
        assert_eq!(colors.vertex(3), Some(RED));
    }

    #[test]
    fn colorize_clipped_t1() {
        let colors = colorize(&[1.0, 2.0], &[true, true], &black_white(), 1.0, RED);
        assert_eq!(colors.into_vec(), vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn colorize_clipped_t2() {
        // missing mask entries are unclipped
        let colors = colorize(&[0.0, 10.0], &[true], &black_white(), 1.0, RED);
        assert_eq!(colors.vertex(0), Some(RED));
        assert_gray(colors.vertex(1).unwrap(), 0.5);
    }

    #[test]
    fn colorize_flat_t0() {
        let colors = colorize(&[250.0, 250.00005, 250.0], &[false; 3], &black_white(), 1.0, RED);
        for i in 0..3 {
            assert_gray(colors.vertex(i).unwrap(), 0.5);
        }
    }

    #[test]
    fn colorize_empty_gradient_t0() {
        let colors = colorize(&[0.0, 100.0], &[false, false], &[], 1.0, RED);
        assert_eq!(colors.vertex(0), Some(RED));
        assert_eq!(colors.vertex(1), Some(RED));
        assert!(colorize(&[], &[], &black_white(), 1.0, RED).is_empty());
    }

    #[test]
    fn gradient_color_t0() {
        let gradient = three_stop_gradient(BLACK, RED, WHITE);
        assert_eq!(gradient_color(&gradient, 0.5, 1.0), RED);
        assert_eq!(gradient_color(&gradient, 0.25, 1.0), RGB (0.5, 0.0, 0.0));
        assert_eq!(gradient_color(&gradient, 0.75, 1.0), RGB (1.0, 0.5, 0.5));
    }

    #[test]
    fn gradient_color_t1() {
        // stops not covering [0, 1] clamp to the end colors
        let gradient = vec![
            ColorStop {position: 0.2, color: BLACK},
            ColorStop {position: 0.8, color: WHITE},
        ];
        assert_eq!(gradient_color(&gradient, 0.0, 1.0), BLACK);
        assert_eq!(gradient_color(&gradient, 1.0, 1.0), WHITE);
        assert_gray(gradient_color(&gradient, 0.5, 1.0), 0.5);
    }

    #[test]
    fn gradient_color_t2() {
        let single = vec![ColorStop {position: 0.5, color: RED}];
        assert_eq!(gradient_color(&single, 0.0, 1.0), RED);
        assert_eq!(gradient_color(&single, 1.0, 0.0), RED);

        // coincident stops give a hard edge
        let step = vec![
            ColorStop {position: 0.0, color: BLACK},
            ColorStop {position: 0.5, color: BLACK},
            ColorStop {position: 0.5, color: WHITE},
            ColorStop {position: 1.0, color: WHITE},
        ];
        assert_eq!(gradient_color(&step, 0.5, 1.0), BLACK);
        assert_eq!(gradient_color(&step, 0.6, 1.0), WHITE);
    }
}
