//! Buchheim-Jünger-Leipert tidy tree placement.
//!
//! Linear-time Walker layout over a tree given as index arrays (node `0` is
//! the root, indices are pre-order). Produces one raw breadth coordinate per
//! node in separation units; the caller scales it onto the canvas.
//!
//! 1. **First walk (post-order):** preliminary coordinates, contour merging
//!    via threads, subtree shifts recorded as `change`/`shift`.
//! 2. **Second walk (pre-order):** accumulate modifiers into final values.

/// Relative spacing between neighbouring nodes at the same depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separation {
    /// Gap between nodes sharing a parent
    pub siblings: f64,
    /// Gap between nodes with different parents
    pub cousins: f64,
}

impl Separation {
    /// Separation weight for two nodes given their parents
    #[must_use]
    pub fn between(self, parent_a: Option<usize>, parent_b: Option<usize>) -> f64 {
        if parent_a == parent_b {
            self.siblings
        } else {
            self.cousins
        }
    }
}

/// Per-node walk state. `virtual` parent index `n` sits above the root.
struct Walker<'a> {
    children: &'a [Vec<usize>],
    parent: Vec<usize>,
    sibling_index: Vec<usize>,
    prelim: Vec<f64>,
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    ancestor: Vec<usize>,
    thread: Vec<Option<usize>>,
    default_ancestor: Vec<Option<usize>>,
    separation: Separation,
    root_children: [usize; 1],
}

impl<'a> Walker<'a> {
    fn new(children: &'a [Vec<usize>], separation: Separation) -> Self {
        let n = children.len();
        let mut parent = vec![n; n + 1];
        let mut sibling_index = vec![0; n + 1];
        for (v, kids) in children.iter().enumerate() {
            for (i, &child) in kids.iter().enumerate() {
                parent[child] = v;
                sibling_index[child] = i;
            }
        }
        Self {
            children,
            parent,
            sibling_index,
            prelim: vec![0.0; n + 1],
            modifier: vec![0.0; n + 1],
            change: vec![0.0; n + 1],
            shift: vec![0.0; n + 1],
            ancestor: (0..=n).collect(),
            thread: vec![None; n + 1],
            default_ancestor: vec![None; n + 1],
            separation,
            root_children: [0],
        }
    }

    fn virtual_root(&self) -> usize {
        self.children.len()
    }

    fn kids(&self, v: usize) -> &[usize] {
        if v == self.virtual_root() {
            &self.root_children
        } else {
            &self.children[v]
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        self.separation
            .between(Some(self.parent[a]), Some(self.parent[b]))
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.kids(v).first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.kids(v).last().copied().or(self.thread[v])
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        #[allow(clippy::cast_precision_loss)]
        let span = (self.sibling_index[wp] - self.sibling_index[wm]) as f64;
        let change = shift / span;
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for idx in (0..self.kids(v).len()).rev() {
            let w = self.kids(v)[idx];
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, fallback: usize) -> usize {
        let candidate = self.ancestor[vim];
        if self.parent[candidate] == self.parent[v] {
            candidate
        } else {
            fallback
        }
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut default: usize) -> usize {
        let Some(w) = left_sibling else {
            return default;
        };
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.kids(self.parent[v])[0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let (inner_left, inner_right) = loop {
            let (Some(next_vim), Some(next_vip)) = (self.next_right(vim), self.next_left(vip)) else {
                break (self.next_right(vim), self.next_left(vip));
            };
            vim = next_vim;
            vip = next_vip;
            let (Some(next_vom), Some(next_vop)) = (self.next_left(vom), self.next_right(vop)) else {
                break (None, None);
            };
            vom = next_vom;
            vop = next_vop;
            self.ancestor[vop] = v;

            let shift = self.prelim[vim] + sim - self.prelim[vip] - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, default);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];
        };

        if let Some(vim) = inner_left {
            if self.next_right(vop).is_none() {
                self.thread[vop] = Some(vim);
                self.modifier[vop] += sim - sop;
            }
        }
        if let Some(vip) = inner_right {
            if self.next_left(vom).is_none() {
                self.thread[vom] = Some(vip);
                self.modifier[vom] += sip - som;
                default = v;
            }
        }
        default
    }

    fn first_walk(&mut self, v: usize) {
        let p = self.parent[v];
        let i = self.sibling_index[v];
        let left_sibling = (i > 0).then(|| self.kids(p)[i - 1]);

        let ends = self.kids(v).first().copied().zip(self.kids(v).last().copied());
        if let Some((first, last)) = ends {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = left_sibling {
                self.prelim[v] = self.prelim[w] + self.separation(v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.prelim[v] = self.prelim[w] + self.separation(v, w);
        }

        let default = self.default_ancestor[p].unwrap_or(self.kids(p)[0]);
        self.default_ancestor[p] = Some(self.apportion(v, left_sibling, default));
    }

    fn post_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.children.len());
        let mut stack = vec![(0usize, 0usize)];
        while let Some((v, next)) = stack.pop() {
            if let Some(&child) = self.children[v].get(next) {
                stack.push((v, next + 1));
                stack.push((child, 0));
            } else {
                order.push(v);
            }
        }
        order
    }

    fn run(mut self) -> Vec<f64> {
        for v in self.post_order() {
            self.first_walk(v);
        }
        let top = self.virtual_root();
        self.modifier[top] = -self.prelim[0];

        // Pre-order indices let a single forward pass see parents first.
        let n = self.children.len();
        let mut breadth = vec![0.0; n];
        for v in 0..n {
            let parent_mod = self.modifier[self.parent[v]];
            breadth[v] = self.prelim[v] + parent_mod;
            self.modifier[v] += parent_mod;
        }
        breadth
    }
}

/// Raw breadth coordinate per node.
///
/// `children[v]` lists the children of `v` in order; indices must be a
/// pre-order numbering rooted at `0`. The root ends up at `0.0`; coordinates
/// are in separation units.
#[must_use]
pub fn tidy_breadth(children: &[Vec<usize>], separation: Separation) -> Vec<f64> {
    if children.is_empty() {
        return Vec::new();
    }
    Walker::new(children, separation).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: Separation = Separation {
        siblings: 1.0,
        cousins: 2.0,
    };

    fn layout(children: &[Vec<usize>]) -> Vec<f64> {
        tidy_breadth(children, SEP)
    }

    #[test]
    fn test_single_node() {
        assert_eq!(layout(&[vec![]]), vec![0.0]);
    }

    #[test]
    fn test_parent_centered_over_children() {
        // 0 -> 1, 2, 3
        let x = layout(&[vec![1, 2, 3], vec![], vec![], vec![]]);
        assert!((x[2] - x[1] - 1.0).abs() < 1e-9);
        assert!((x[3] - x[2] - 1.0).abs() < 1e-9);
        assert!((x[0] - (x[1] + x[3]) / 2.0).abs() < 1e-9);
        assert!(x[0].abs() < 1e-9);
    }

    #[test]
    fn test_cousins_get_wider_gap() {
        // 0 -> 1 (-> 2, 3), 4 (-> 5, 6)
        let children = vec![vec![1, 4], vec![2, 3], vec![], vec![], vec![5, 6], vec![], vec![]];
        let x = layout(&children);
        assert!((x[3] - x[2] - 1.0).abs() < 1e-9);
        assert!((x[5] - x[3] - 2.0).abs() < 1e-9);
        assert!((x[6] - x[5] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_deep_subtrees_do_not_overlap() {
        // 0 -> 1 (-> 2 (-> 3, 4)), 5 (-> 6 (-> 7, 8))
        let children = vec![
            vec![1, 5],
            vec![2],
            vec![3, 4],
            vec![],
            vec![],
            vec![6],
            vec![7, 8],
            vec![],
            vec![],
        ];
        let x = layout(&children);
        assert!(x[7] - x[4] >= 2.0 - 1e-9);
        assert!(x[5] > x[1]);
    }

    #[test]
    fn test_small_subtree_between_large_ones_is_spread() {
        // 0 -> 1 (-> 2, 3, 4), 5, 6 (-> 7, 8, 9)
        let children = vec![
            vec![1, 5, 6],
            vec![2, 3, 4],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![7, 8, 9],
            vec![],
            vec![],
            vec![],
        ];
        let x = layout(&children);
        assert!(x[5] > x[1] && x[6] > x[5]);
        // The middle leaf sits halfway between its siblings.
        assert!(((x[5] - x[1]) - (x[6] - x[5])).abs() < 1e-9);
        assert!(x[7] - x[4] >= 2.0 - 1e-9);
    }
}
