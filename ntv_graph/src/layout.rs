use crate::aggregate::PairKey;
use crate::store::GraphStore;
use std::collections::HashMap;

/// Margin kept between nodes and the canvas edge.
const EDGE_MARGIN: f64 = 15.0;

#[derive(Clone, Copy, Debug)]
pub struct LayoutParams {
    /// Rest length of the link springs.
    pub link_distance: f64,
    /// Pairwise charge; negative repels.
    pub charge: f64,
    /// Per-node collision radius.
    pub collision_radius: f64,
    pub spring_strength: f64,
    pub center_strength: f64,
    /// Fraction of velocity retained per step.
    pub velocity_decay: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            charge: -300.0,
            collision_radius: 40.0,
            spring_strength: 0.1,
            center_strength: 0.03,
            velocity_decay: 0.6,
            alpha_decay: 0.03,
            alpha_min: 0.001,
        }
    }
}

/// Force-directed layout over the store's nodes: link springs, pairwise
/// charge repulsion, a centering pull and circle collision, integrated with
/// a cooling alpha. Pinned nodes hold their position while still exerting
/// forces on their neighbours.
#[derive(Clone, Debug)]
pub struct ForceLayout {
    params: LayoutParams,
    alpha: f64,
    width: f64,
    height: f64,
}

impl ForceLayout {
    pub fn new(params: LayoutParams, width: f64, height: f64) -> Self {
        Self {
            params,
            alpha: 1.0,
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Full restart, used by the reset-view action.
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Mild restart after a data change.
    pub fn nudge(&mut self) {
        self.alpha = self.alpha.max(0.3);
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.alpha_min
    }

    /// Advances the simulation one step over the filtered subgraph.
    pub fn step(&mut self, store: &mut GraphStore, pairs: &[PairKey]) {
        if self.is_settled() {
            return;
        }

        let mut ids: Vec<&str> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for key in pairs {
            let (a, b) = key.endpoints();
            for id in [a, b] {
                if !index.contains_key(id) {
                    index.insert(id, ids.len());
                    ids.push(id);
                }
            }
        }
        let n = ids.len();
        if n == 0 {
            return;
        }

        let mut pos: Vec<(f64, f64)> = Vec::with_capacity(n);
        let mut vel: Vec<(f64, f64)> = Vec::with_capacity(n);
        let mut pinned: Vec<bool> = Vec::with_capacity(n);
        for id in &ids {
            match store.node(id) {
                Some(node) => {
                    pos.push((node.x, node.y));
                    vel.push((node.vx, node.vy));
                    pinned.push(node.pinned);
                }
                None => {
                    pos.push((self.width / 2.0, self.height / 2.0));
                    vel.push((0.0, 0.0));
                    pinned.push(false);
                }
            }
        }

        let alpha = self.alpha;
        let p = self.params;
        let mut disp: Vec<(f64, f64)> = vec![(0.0, 0.0); n];

        // Charge repulsion, O(n^2); host maps stay small.
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist2 = (dx * dx + dy * dy).max(1.0);
                let dist = dist2.sqrt();
                let f = (-p.charge) * alpha / dist2;
                let fx = (dx / dist) * f;
                let fy = (dy / dist) * f;
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        // Link springs toward the rest length.
        for key in pairs {
            let (a, b) = key.endpoints();
            let (i, j) = (index[a], index[b]);
            let dx = pos[i].0 - pos[j].0;
            let dy = pos[i].1 - pos[j].1;
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);
            let f = (dist - p.link_distance) * p.spring_strength * alpha;
            let fx = (dx / dist) * f * 0.5;
            let fy = (dy / dist) * f * 0.5;
            disp[i].0 -= fx;
            disp[i].1 -= fy;
            disp[j].0 += fx;
            disp[j].1 += fy;
        }

        // Gentle pull toward the canvas center.
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        for i in 0..n {
            disp[i].0 += (cx - pos[i].0) * p.center_strength * alpha;
            disp[i].1 += (cy - pos[i].1) * p.center_strength * alpha;
        }

        // Circle collision: separate overlapping nodes.
        let min_dist = p.collision_radius * 2.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                if dist < min_dist {
                    let push = (min_dist - dist) * 0.5 * alpha;
                    let fx = (dx / dist) * push;
                    let fy = (dy / dist) * push;
                    disp[i].0 += fx;
                    disp[i].1 += fy;
                    disp[j].0 -= fx;
                    disp[j].1 -= fy;
                }
            }
        }

        // Integrate and write back.
        for i in 0..n {
            let node = match store.node_mut(ids[i]) {
                Some(node) => node,
                None => continue,
            };
            if pinned[i] {
                node.vx = 0.0;
                node.vy = 0.0;
                continue;
            }
            let vx = (vel[i].0 + disp[i].0) * p.velocity_decay;
            let vy = (vel[i].1 + disp[i].1) * p.velocity_decay;
            node.vx = vx;
            node.vy = vy;
            node.x = (pos[i].0 + vx).clamp(EDGE_MARGIN, self.width - EDGE_MARGIN);
            node.y = (pos[i].1 + vy).clamp(EDGE_MARGIN, self.height - EDGE_MARGIN);
        }

        self.alpha *= 1.0 - p.alpha_decay;
    }
}
