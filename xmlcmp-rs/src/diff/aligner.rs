//! O(NP) sequence alignment.
//!
//! Implements the furthest-reaching-point edit graph search from Wu, Manber,
//! Myers and Miller, "An O(NP) Sequence Comparison Algorithm" (1990). The
//! shorter sequence is always explored as the first operand so the working
//! arrays are bounded by `|a| + |b|` and the search by the shorter side.

use super::edit_op::EditOp;
use super::AlignOptions;

/// A point reached in the edit graph, linked to the point it was reached from.
#[derive(Debug, Clone, Copy)]
struct Vertex {
    x: usize,
    y: usize,
    route: Option<usize>,
}

/// Working state for one alignment.
pub(super) struct Aligner<'a, T, F> {
    /// Shorter sequence.
    a: &'a [T],
    /// Longer sequence.
    b: &'a [T],
    /// True when the caller's sequences were exchanged to make `a` shorter.
    swapped: bool,
    equals: F,
    options: &'a AlignOptions,
    /// Index into `vertices` of the furthest point on each diagonal.
    path: Vec<Option<usize>>,
    vertices: Vec<Vertex>,
}

impl<'a, T, F> Aligner<'a, T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    pub(super) fn new(a: &'a [T], b: &'a [T], equals: F, options: &'a AlignOptions) -> Self {
        let swapped = a.len() >= b.len();
        let (a, b) = if swapped { (b, a) } else { (a, b) };
        Aligner {
            a,
            b,
            swapped,
            equals,
            options,
            path: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Runs the search and replays the route found into an edit script.
    pub(super) fn run(mut self) -> Vec<EditOp<T>> {
        let route = self.compose();
        self.record(&route)
    }

    /// Explores the edit graph and returns the points of the route to the
    /// furthest point reached on the target diagonal, end first.
    fn compose(&mut self) -> Vec<(usize, usize)> {
        let m = self.a.len() as isize;
        let n = self.b.len() as isize;
        let size = self.a.len() + self.b.len() + 3;

        let mut fp: Vec<isize> = vec![-1; size];
        self.path = vec![None; size];
        self.vertices.clear();

        let offset = m + 1;
        let delta = n - m;
        let at = |k: isize| (k + offset) as usize;

        let mut p: isize = 0;
        let capped = loop {
            for k in -p..delta {
                fp[at(k)] = self.snake(k, fp[at(k - 1)] + 1, fp[at(k + 1)], offset);
            }
            let mut k = delta + p;
            while k > delta {
                fp[at(k)] = self.snake(k, fp[at(k - 1)] + 1, fp[at(k + 1)], offset);
                k -= 1;
            }
            fp[at(delta)] = self.snake(delta, fp[at(delta - 1)] + 1, fp[at(delta + 1)], offset);

            if fp[at(delta)] >= n {
                break false;
            }
            if self.vertices.len() > self.options.max_vertices {
                break true;
            }
            p += 1;
        };

        tracing::trace!(
            vertices = self.vertices.len(),
            p,
            capped,
            "edit graph search finished"
        );

        let mut points = Vec::new();
        let mut r = self.path[at(delta)];
        while let Some(idx) = r {
            let v = self.vertices[idx];
            points.push((v.x, v.y));
            r = v.route;
        }
        points
    }

    /// Follows the diagonal `k` from the furthest of its two neighbours as far
    /// as elements keep matching. Returns the `y` reached.
    fn snake(&mut self, k: isize, p: isize, pp: isize, offset: isize) -> isize {
        let route = if p > pp {
            self.path[(k - 1 + offset) as usize]
        } else {
            self.path[(k + 1 + offset) as usize]
        };

        let mut y = p.max(pp);
        let mut x = y - k;
        let m = self.a.len() as isize;
        let n = self.b.len() as isize;
        while x < m && y < n && (self.equals)(&self.a[x as usize], &self.b[y as usize]) {
            x += 1;
            y += 1;
        }

        self.path[(k + offset) as usize] = Some(self.vertices.len());
        self.vertices.push(Vertex {
            x: x as usize,
            y: y as usize,
            route,
        });

        y
    }

    /// Converts route points (end first) into edit operations, restoring the
    /// caller's operand order.
    fn record(&self, points: &[(usize, usize)]) -> Vec<EditOp<T>> {
        let mut ops = Vec::new();
        let (mut px, mut py) = (0usize, 0usize);

        for &(cx, cy) in points.iter().rev() {
            while px < cx || py < cy {
                let target = cy as isize - cx as isize;
                let current = py as isize - px as isize;
                if target > current {
                    let element = self.b[py].clone();
                    ops.push(if self.swapped {
                        EditOp::delete(element, py)
                    } else {
                        EditOp::add(element, py)
                    });
                    py += 1;
                } else if target < current {
                    let element = self.a[px].clone();
                    ops.push(if self.swapped {
                        EditOp::add(element, px)
                    } else {
                        EditOp::delete(element, px)
                    });
                    px += 1;
                } else {
                    if self.options.record_same {
                        ops.push(if self.swapped {
                            EditOp::same(self.b[py].clone(), py, px)
                        } else {
                            EditOp::same(self.a[px].clone(), px, py)
                        });
                    }
                    px += 1;
                    py += 1;
                }
            }
        }

        ops
    }
}
