//! Polygon triangulation by ear clipping.
//!
//! Handles convex and concave simple polygons in either winding. Collinear
//! vertices are dropped without emitting triangles; self-intersecting input
//! falls back to a fan over whatever is left, which fills something sensible
//! rather than nothing.

/// Appends triangles covering `points` to `out` as index triples into `points`.
///
/// Returns the number of triangles written.
pub fn triangulate(points: &[[f32; 2]], out: &mut Vec<u32>) -> usize {
    let n = points.len();
    if n < 3 {
        return 0;
    }

    let mut ring: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        ring.reverse();
    }

    let start = out.len();
    while ring.len() > 3 {
        match find_ear(points, &ring) {
            Some(i) => {
                let (a, b, c) = neighbours(&ring, i);
                push_triangle(out, a, b, c);
                ring.remove(i);
            }
            None => match find_collinear(points, &ring) {
                Some(i) => {
                    ring.remove(i);
                }
                None => {
                    log::trace!("no ear in {}-vertex remainder, filling as fan", ring.len());
                    for w in 1..ring.len() - 1 {
                        push_triangle(out, ring[0], ring[w], ring[w + 1]);
                    }
                    ring.clear();
                }
            },
        }
    }

    if ring.len() == 3 && cross(points[ring[0]], points[ring[1]], points[ring[2]]) != 0.0 {
        push_triangle(out, ring[0], ring[1], ring[2]);
    }

    (out.len() - start) / 3
}

/// Shoelace area; positive for counter-clockwise in a +Y-up frame.
pub fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    let mut twice = 0.0;
    for i in 0..n {
        let [x0, y0] = points[i];
        let [x1, y1] = points[(i + 1) % n];
        twice += x0 * y1 - x1 * y0;
    }
    twice * 0.5
}

fn neighbours(ring: &[usize], i: usize) -> (usize, usize, usize) {
    let n = ring.len();
    (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n])
}

fn find_ear(points: &[[f32; 2]], ring: &[usize]) -> Option<usize> {
    (0..ring.len()).find(|&i| {
        let (a, b, c) = neighbours(ring, i);
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        if cross(pa, pb, pc) <= 0.0 {
            return false;
        }
        ring.iter().all(|&j| {
            let p = points[j];
            j == a || j == b || j == c || p == pa || p == pb || p == pc || !in_triangle(p, pa, pb, pc)
        })
    })
}

fn find_collinear(points: &[[f32; 2]], ring: &[usize]) -> Option<usize> {
    (0..ring.len()).find(|&i| {
        let (a, b, c) = neighbours(ring, i);
        cross(points[a], points[b], points[c]) == 0.0
    })
}

#[inline]
fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Inclusive test against a counter-clockwise triangle.
#[inline]
fn in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

#[inline]
fn push_triangle(out: &mut Vec<u32>, a: usize, b: usize, c: usize) {
    out.extend_from_slice(&[a as u32, b as u32, c as u32]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(points: &[[f32; 2]], indices: &[u32]) -> f32 {
        indices
            .chunks(3)
            .map(|t| {
                let tri = [points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]];
                signed_area(&tri).abs()
            })
            .sum()
    }

    fn check(points: &[[f32; 2]]) -> Vec<u32> {
        let mut out = Vec::new();
        let tris = triangulate(points, &mut out);
        assert_eq!(tris, points.len() - 2, "triangle count for {points:?}");
        let expected = signed_area(points).abs();
        let got = area_of(points, &out);
        assert!((expected - got).abs() < 1e-3, "area {got} != {expected}");
        out
    }

    #[test]
    fn square_in_both_windings() {
        check(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        check(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
    }

    #[test]
    fn concave_l_shape() {
        check(&[
            [0.0, 0.0],
            [20.0, 0.0],
            [20.0, 5.0],
            [5.0, 5.0],
            [5.0, 20.0],
            [0.0, 20.0],
        ]);
    }

    #[test]
    fn star_shape() {
        let mut pts = Vec::new();
        for i in 0..10 {
            let r = if i % 2 == 0 { 50.0 } else { 20.0 };
            let a = i as f32 * std::f32::consts::PI / 5.0;
            pts.push([r * a.cos(), r * a.sin()]);
        }
        check(&pts);
    }

    #[test]
    fn triangle_passes_through() {
        let out = check(&[[0.0, 0.0], [4.0, 0.0], [0.0, 3.0]]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn indices_are_offset_free() {
        let mut out = vec![99, 99, 99];
        triangulate(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], &mut out);
        assert_eq!(&out[..3], &[99, 99, 99]);
        assert!(out[3..].iter().all(|&i| i < 3));
    }

    #[test]
    fn collinear_vertices_are_skipped() {
        let pts = [[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let mut out = Vec::new();
        triangulate(&pts, &mut out);
        assert!((area_of(&pts, &out) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        let mut out = Vec::new();
        assert_eq!(triangulate(&[[0.0, 0.0], [1.0, 1.0]], &mut out), 0);
        assert_eq!(triangulate(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]], &mut out), 0);
        assert!(out.is_empty());
    }
}
