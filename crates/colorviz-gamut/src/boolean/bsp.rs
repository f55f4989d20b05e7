//! Binary space partitioning tree over convex polygons.
//!
//! Nodes live in a flat arena and are walked with explicit stacks, so deep
//! trees never recurse.

use super::polygon::{Polygon, Split, SplitPlane};
use crate::error::BooleanError;

/// Upper bound on tree nodes before giving up.
pub(crate) const MAX_NODES: usize = 1 << 20;

#[derive(Debug, Default)]
struct Node {
    plane: Option<SplitPlane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

/// Solid described by a BSP tree. Node 0 is the root.
#[derive(Debug, Default)]
pub(crate) struct Bsp {
    nodes: Vec<Node>,
}

impl Bsp {
    /// Builds a tree from polygons.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Result<Self, BooleanError> {
        let mut bsp = Self::default();
        bsp.build(polygons)?;
        Ok(bsp)
    }

    fn push_node(&mut self) -> Result<usize, BooleanError> {
        if self.nodes.len() >= MAX_NODES {
            return Err(BooleanError::TooComplex { nodes: MAX_NODES });
        }
        self.nodes.push(Node::default());
        Ok(self.nodes.len() - 1)
    }

    /// Inserts polygons, splitting them across existing planes and growing
    /// new nodes where a side is empty.
    pub fn build(&mut self, polygons: Vec<Polygon>) -> Result<(), BooleanError> {
        if polygons.is_empty() {
            return Ok(());
        }
        if self.nodes.is_empty() {
            self.push_node()?;
        }

        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }
            let plane = match self.nodes[index].plane {
                Some(plane) => plane,
                None => {
                    let plane = polygons[0].plane;
                    self.nodes[index].plane = Some(plane);
                    plane
                }
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon) {
                    Split::CoplanarFront(p) | Split::CoplanarBack(p) => {
                        self.nodes[index].polygons.push(p)
                    }
                    Split::Front(p) => front.push(p),
                    Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            if !front.is_empty() {
                let child = match self.nodes[index].front {
                    Some(child) => child,
                    None => {
                        let child = self.push_node()?;
                        self.nodes[index].front = Some(child);
                        child
                    }
                };
                stack.push((child, front));
            }
            if !back.is_empty() {
                let child = match self.nodes[index].back {
                    Some(child) => child,
                    None => {
                        let child = self.push_node()?;
                        self.nodes[index].back = Some(child);
                        child
                    }
                };
                stack.push((child, back));
            }
        }
        Ok(())
    }

    /// Swaps solid and empty space.
    pub fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Removes the parts of `polygons` that lie inside this solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        if self.nodes.is_empty() {
            return polygons;
        }

        let mut kept = Vec::new();
        let mut stack = vec![(0usize, polygons)];
        while let Some((index, polygons)) = stack.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                match plane.split(polygon) {
                    Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
                    Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
                    Split::Spanning { front: f, back: b } => {
                        front.extend(f);
                        back.extend(b);
                    }
                }
            }

            match node.front {
                Some(child) => stack.push((child, front)),
                None => kept.extend(front),
            }
            // Back leaves are solid: polygons ending there are dropped.
            if let Some(child) = node.back {
                stack.push((child, back));
            }
        }
        kept
    }

    /// Clips every polygon of this tree against `other`.
    pub fn clip_to(&mut self, other: &Bsp) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    /// All polygons stored in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|n| n.polygons.iter().cloned())
            .collect()
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
