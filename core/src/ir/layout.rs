//! Loose-object layouts and their symmetry groups

use super::objects::ObjectKind;
use serde::{Deserialize, Serialize};

/// A relabeling of loose objects: `mapping[i]` is the image of slot `i`
pub type SymmetryMapping = Vec<usize>;

/// Arrangement of the free objects a configuration starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LooseObjectLayout {
    /// `n` points with no declared symmetry
    FreePoints(usize),

    /// Three interchangeable points
    Triangle,

    /// Three points with a right angle at the first one
    RightTriangle,

    /// Four points in cyclic order
    Quadrilateral,

    /// A line and a point
    LineAndPoint,

    /// A line and two interchangeable points
    LineAndTwoPoints,

    /// A circle and a point
    CircleAndPoint,
}

impl LooseObjectLayout {
    /// Kinds of the loose objects, by slot
    pub fn kinds(&self) -> Vec<ObjectKind> {
        use ObjectKind::*;

        match self {
            LooseObjectLayout::FreePoints(n) => vec![Point; *n],
            LooseObjectLayout::Triangle | LooseObjectLayout::RightTriangle => vec![Point; 3],
            LooseObjectLayout::Quadrilateral => vec![Point; 4],
            LooseObjectLayout::LineAndPoint => vec![Line, Point],
            LooseObjectLayout::LineAndTwoPoints => vec![Line, Point, Point],
            LooseObjectLayout::CircleAndPoint => vec![Circle, Point],
        }
    }

    pub fn len(&self) -> usize {
        self.kinds().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All admissible relabelings, the identity first
    pub fn symmetry_mappings(&self) -> Vec<SymmetryMapping> {
        match self {
            LooseObjectLayout::Triangle => all_permutations(3),
            LooseObjectLayout::RightTriangle => vec![vec![0, 1, 2], vec![0, 2, 1]],
            LooseObjectLayout::Quadrilateral => {
                let rotations = (0..4).map(|k| (0..4).map(|i| (i + k) % 4).collect::<Vec<usize>>());
                let reflections = (0..4).map(|k| (0..4).map(|i| (k + 4 - i) % 4).collect::<Vec<usize>>());
                rotations.chain(reflections).collect()
            }
            LooseObjectLayout::LineAndTwoPoints => vec![vec![0, 1, 2], vec![0, 2, 1]],
            other => vec![(0..other.len()).collect()],
        }
    }
}

/// All permutations of `0..n` in lexicographic order
pub fn all_permutations(n: usize) -> Vec<SymmetryMapping> {
    fn extend(current: &mut Vec<usize>, used: &mut [bool], out: &mut Vec<SymmetryMapping>) {
        if current.len() == used.len() {
            out.push(current.clone());
            return;
        }
        for i in 0..used.len() {
            if !used[i] {
                used[i] = true;
                current.push(i);
                extend(current, used, out);
                current.pop();
                used[i] = false;
            }
        }
    }

    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(n), &mut vec![false; n], &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL_LAYOUTS: [LooseObjectLayout; 7] = [
        LooseObjectLayout::FreePoints(4),
        LooseObjectLayout::Triangle,
        LooseObjectLayout::RightTriangle,
        LooseObjectLayout::Quadrilateral,
        LooseObjectLayout::LineAndPoint,
        LooseObjectLayout::LineAndTwoPoints,
        LooseObjectLayout::CircleAndPoint,
    ];

    #[test]
    fn test_group_sizes() {
        assert_eq!(LooseObjectLayout::FreePoints(5).symmetry_mappings().len(), 1);
        assert_eq!(LooseObjectLayout::Triangle.symmetry_mappings().len(), 6);
        assert_eq!(LooseObjectLayout::RightTriangle.symmetry_mappings().len(), 2);
        assert_eq!(LooseObjectLayout::Quadrilateral.symmetry_mappings().len(), 8);
    }

    #[test]
    fn test_mappings_are_kind_preserving_permutations() {
        for layout in ALL_LAYOUTS {
            let kinds = layout.kinds();
            let mappings = layout.symmetry_mappings();
            assert_eq!(mappings[0], (0..kinds.len()).collect::<Vec<_>>(), "{layout:?}");

            let distinct: HashSet<_> = mappings.iter().cloned().collect();
            assert_eq!(distinct.len(), mappings.len(), "{layout:?} has repeated mappings");

            for m in &mappings {
                let mut sorted = m.clone();
                sorted.sort();
                assert_eq!(sorted, (0..kinds.len()).collect::<Vec<_>>());
                for (i, &j) in m.iter().enumerate() {
                    assert_eq!(kinds[i], kinds[j]);
                }
            }
        }
    }

    #[test]
    fn test_quadrilateral_keeps_adjacency() {
        for m in LooseObjectLayout::Quadrilateral.symmetry_mappings() {
            for i in 0..4 {
                let diff = (m[(i + 1) % 4] + 4 - m[i]) % 4;
                assert!(diff == 1 || diff == 3);
            }
        }
    }
}
