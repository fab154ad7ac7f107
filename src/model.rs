//! Model - registry of nodes, supports, loads and elements
//!
//! Nodes are owned here and lent to elements per call, so an element never
//! holds a node reference across operations. Equations are numbered node by
//! node in ascending tag order once [`Model::initialize`] has run.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::elements::{Element, Node, Support};
use crate::error::{FEAError, FEAResult};
use crate::loads::{ElementLoad, NodeLoad};
use crate::math::{Mat, Vec};
use crate::results::NodeDisplacement;
use crate::state::TrialCommit;
use crate::transform::EndNodes;

/// The finite element model
#[derive(Debug, Default)]
pub struct Model {
    nodes: BTreeMap<usize, Node>,
    supports: BTreeMap<usize, Support>,
    /// Reference nodal loads, scaled by the load factor
    node_loads: BTreeMap<usize, std::vec::Vec<NodeLoad>>,
    elements: BTreeMap<usize, Box<dyn Element>>,
    /// Reference element loads by element tag
    element_loads: std::vec::Vec<(usize, ElementLoad)>,
    /// First equation of each node
    dof_map: BTreeMap<usize, usize>,
    num_eqn: usize,
    time: f64,
    committed_time: f64,
    initialized: bool,
}

/// Borrow the end nodes of an element from the registry
fn end_nodes<'a>(nodes: &'a BTreeMap<usize, Node>, [i, j]: [usize; 2]) -> FEAResult<EndNodes<'a>> {
    let ni = nodes.get(&i).ok_or(FEAError::NodeNotFound(i))?;
    let nj = nodes.get(&j).ok_or(FEAError::NodeNotFound(j))?;
    Ok([ni, nj])
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, node: Node) -> FEAResult<()> {
        if self.nodes.contains_key(&node.tag) {
            return Err(FEAError::DuplicateTag(node.tag));
        }
        self.nodes.insert(node.tag, node);
        self.initialized = false;
        Ok(())
    }

    /// Add a support condition to a node
    pub fn add_support(&mut self, node: usize, support: Support) -> FEAResult<()> {
        if !self.nodes.contains_key(&node) {
            return Err(FEAError::NodeNotFound(node));
        }
        self.supports.insert(node, support);
        self.initialized = false;
        Ok(())
    }

    /// Add a reference load to a node
    pub fn add_node_load(&mut self, node: usize, load: NodeLoad) -> FEAResult<()> {
        if !self.nodes.contains_key(&node) {
            return Err(FEAError::NodeNotFound(node));
        }
        self.node_loads.entry(node).or_default().push(load);
        Ok(())
    }

    /// Add an element to the model
    pub fn add_element(&mut self, element: Box<dyn Element>) -> FEAResult<()> {
        let tag = element.tag();
        if self.elements.contains_key(&tag) {
            return Err(FEAError::DuplicateTag(tag));
        }
        for node in element.node_tags() {
            if !self.nodes.contains_key(&node) {
                return Err(FEAError::NodeNotFound(node));
            }
        }
        self.elements.insert(tag, element);
        self.initialized = false;
        Ok(())
    }

    /// Add a reference load to an element
    pub fn add_element_load(&mut self, element: usize, load: ElementLoad) -> FEAResult<()> {
        if !self.elements.contains_key(&element) {
            return Err(FEAError::ElementNotFound(element));
        }
        self.element_loads.push((element, load));
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    pub fn node(&self, tag: usize) -> FEAResult<&Node> {
        self.nodes.get(&tag).ok_or(FEAError::NodeNotFound(tag))
    }

    pub fn element(&self, tag: usize) -> FEAResult<&dyn Element> {
        self.elements
            .get(&tag)
            .map(|e| e.as_ref())
            .ok_or(FEAError::ElementNotFound(tag))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_equations(&self) -> usize {
        self.num_eqn
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current pseudo-time
    pub fn current_time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Committed displacement of every node
    pub fn node_displacements(&self) -> std::vec::Vec<(usize, NodeDisplacement)> {
        self.nodes
            .values()
            .map(|n| (n.tag, NodeDisplacement::from_components(
                        n.committed_displacement().as_slice(),
                        n.dof_components(),
                    )))
            .collect()
    }

    // ========================
    // Analysis Support
    // ========================

    /// Number equations and bind every element to its nodes
    pub fn initialize(&mut self) -> FEAResult<()> {
        self.dof_map.clear();
        let mut next = 0;
        for node in self.nodes.values() {
            self.dof_map.insert(node.tag, next);
            next += node.num_dof();
        }
        self.num_eqn = next;

        for element in self.elements.values_mut() {
            let ends = end_nodes(&self.nodes, element.node_tags())?;
            element.set_domain(ends)?;
        }

        self.initialized = true;
        debug!(
            "model initialized: {} nodes, {} elements, {} equations",
            self.nodes.len(),
            self.elements.len(),
            self.num_eqn
        );
        Ok(())
    }

    /// Equation numbers of an element's DOF, node i first
    fn element_equations(&self, element: &dyn Element) -> FEAResult<std::vec::Vec<usize>> {
        let per_node = element.num_dof() / 2;
        let mut eqs = std::vec::Vec::with_capacity(element.num_dof());
        for node in element.node_tags() {
            let base = *self.dof_map.get(&node).ok_or(FEAError::NodeNotFound(node))?;
            eqs.extend(base..base + per_node);
        }
        Ok(eqs)
    }

    /// Equations not restrained by a support
    pub fn free_equations(&self) -> std::vec::Vec<usize> {
        let mut free = std::vec::Vec::new();
        for node in self.nodes.values() {
            let base = self.dof_map.get(&node.tag).copied().unwrap_or(0);
            let support = self.supports.get(&node.tag).copied().unwrap_or_default();
            for (k, restrained) in support.mask(node.dof_components()).enumerate() {
                if !restrained {
                    free.push(base + k);
                }
            }
        }
        free
    }

    /// Refresh element loads for load factor `lambda`
    pub fn apply_load_factor(&mut self, lambda: f64) -> FEAResult<()> {
        for element in self.elements.values_mut() {
            element.zero_load();
        }
        for (tag, load) in &self.element_loads {
            let element = self
                .elements
                .get_mut(tag)
                .ok_or(FEAError::ElementNotFound(*tag))?;
            element.add_load(load, lambda)?;
        }
        Ok(())
    }

    /// Let every element pull its trial state from the nodes
    pub fn update(&mut self) -> FEAResult<()> {
        for element in self.elements.values_mut() {
            let ends = end_nodes(&self.nodes, element.node_tags())?;
            element.update(ends)?;
        }
        Ok(())
    }

    /// Assemble the tangent (or initial) stiffness
    pub fn tangent_stiffness(&self, initial: bool) -> FEAResult<Mat> {
        let mut k_global = Mat::zeros(self.num_eqn, self.num_eqn);
        for element in self.elements.values() {
            let k = if initial {
                element.initial_stiff()
            } else {
                element.tangent_stiff()
            };
            let eqs = self.element_equations(element.as_ref())?;
            for (a, &ea) in eqs.iter().enumerate() {
                for (b, &eb) in eqs.iter().enumerate() {
                    k_global[(ea, eb)] += k[(a, b)];
                }
            }
        }
        Ok(k_global)
    }

    /// Reference nodal load vector
    pub fn reference_load(&self) -> FEAResult<Vec> {
        let mut p = Vec::zeros(self.num_eqn);
        for (tag, loads) in &self.node_loads {
            let node = self.node(*tag)?;
            let base = *self.dof_map.get(tag).ok_or(FEAError::NodeNotFound(*tag))?;
            for load in loads {
                let v = load.as_vector(node.dof_components());
                for k in 0..node.num_dof() {
                    p[base + k] += v[k];
                }
            }
        }
        Ok(p)
    }

    /// Unbalanced force `λ·P − F(t)` at the current pseudo-time
    pub fn unbalance(&mut self, lambda: f64) -> FEAResult<Vec> {
        let mut r = self.reference_load()? * lambda;
        let time = self.time;
        let mut contributions = std::vec::Vec::with_capacity(self.elements.len());
        for element in self.elements.values_mut() {
            let ends = end_nodes(&self.nodes, element.node_tags())?;
            contributions.push((element.tag(), element.resisting_force(ends, time)?));
        }
        for (tag, f) in contributions {
            let eqs = self.element_equations(self.element(tag)?)?;
            for (a, &ea) in eqs.iter().enumerate() {
                r[ea] -= f[a];
            }
        }
        Ok(r)
    }

    /// Add a displacement correction (one entry per equation) to the nodes
    pub fn incr_trial_displacement(&mut self, du: &Vec) -> FEAResult<()> {
        if du.len() != self.num_eqn {
            return Err(FEAError::DofMismatch(format!(
                "model has {} equations, received correction of size {}",
                self.num_eqn,
                du.len()
            )));
        }
        for node in self.nodes.values_mut() {
            let base = self.dof_map.get(&node.tag).copied().unwrap_or(0);
            let incr = du.rows(base, node.num_dof()).into_owned();
            node.incr_trial_displacement(&incr)?;
        }
        Ok(())
    }

    /// Commit nodes and elements at the current pseudo-time
    pub fn commit(&mut self) -> FEAResult<()> {
        for node in self.nodes.values_mut() {
            node.commit_state()?;
        }
        for element in self.elements.values_mut() {
            element.commit_state()?;
        }
        self.committed_time = self.time;
        Ok(())
    }

    /// Return nodes and elements to the last committed state
    ///
    /// Elements that cannot revert (e.g. remote actuators) are logged and skipped.
    pub fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        for node in self.nodes.values_mut() {
            node.revert_to_last_commit()?;
        }
        for element in self.elements.values_mut() {
            match element.revert_to_last_commit() {
                Err(e) if e.is_informational() => {
                    warn!("element {}: {}", element.tag(), e)
                }
                other => other?,
            }
        }
        self.time = self.committed_time;
        Ok(())
    }

    /// Return nodes and elements to the initial state
    pub fn revert_to_start(&mut self) -> FEAResult<()> {
        for node in self.nodes.values_mut() {
            node.revert_to_start()?;
        }
        for element in self.elements.values_mut() {
            match element.revert_to_start() {
                Err(e) if e.is_informational() => {
                    warn!("element {}: {}", element.tag(), e)
                }
                other => other?,
            }
        }
        self.time = 0.0;
        self.committed_time = 0.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{BeamSection, ElasticBeam3d};
    use crate::math::Vec3;
    use crate::transform::LinearCrdTransf3d;

    fn beam(tag: usize, i: usize, j: usize) -> Box<dyn Element> {
        Box::new(ElasticBeam3d::new(
            tag,
            i,
            j,
            BeamSection::new(200e9, 77e9, 0.01, 1e-5, 1e-5, 2e-5),
            Box::new(LinearCrdTransf3d::new(Vec3::z())),
        ))
    }

    fn portal() -> Model {
        let mut model = Model::new();
        model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
        model.add_node(Node::frame(2, 0.0, 3.0, 0.0)).unwrap();
        model.add_node(Node::frame(3, 4.0, 3.0, 0.0)).unwrap();
        model.add_support(1, Support::fixed()).unwrap();
        model.add_element(beam(1, 1, 2)).unwrap();
        model.add_element(beam(2, 2, 3)).unwrap();
        model
    }

    #[test]
    fn test_registry_errors() {
        let mut model = portal();
        assert!(matches!(
            model.add_node(Node::frame(1, 9.0, 9.0, 9.0)),
            Err(FEAError::DuplicateTag(1))
        ));
        assert!(matches!(model.add_element(beam(1, 1, 3)), Err(FEAError::DuplicateTag(1))));
        assert!(matches!(model.add_element(beam(9, 1, 42)), Err(FEAError::NodeNotFound(42))));
        assert!(matches!(
            model.add_support(42, Support::fixed()),
            Err(FEAError::NodeNotFound(42))
        ));
        assert!(matches!(
            model.add_element_load(7, ElementLoad::default()),
            Err(FEAError::ElementNotFound(7))
        ));
    }

    #[test]
    fn test_numbering_and_free_equations() {
        let mut model = portal();
        model.initialize().unwrap();
        assert_eq!(model.num_equations(), 18);
        let free = model.free_equations();
        assert_eq!(free.len(), 12);
        assert_eq!(free[0], 6);
    }

    #[test]
    fn test_assembled_stiffness_is_symmetric() {
        let mut model = portal();
        model.initialize().unwrap();
        let k = model.tangent_stiffness(false).unwrap();
        assert!((&k - k.transpose()).amax() < 1e-6 * k.amax());
        // node 2 is shared by both members
        assert!(k[(6, 6)] > k[(12, 12)]);
    }

    #[test]
    fn test_unbalance_at_rest_is_load() {
        let mut model = portal();
        model.add_node_load(3, NodeLoad::force(0.0, -10.0, 0.0)).unwrap();
        model.initialize().unwrap();
        model.update().unwrap();
        let r = model.unbalance(0.5).unwrap();
        assert_eq!(r[13], -5.0);
        assert_eq!(r.iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn test_correction_updates_nodes() {
        let mut model = portal();
        model.initialize().unwrap();
        let mut du = Vec::zeros(18);
        du[12] = 0.1;
        model.incr_trial_displacement(&du).unwrap();
        assert_eq!(model.node(3).unwrap().trial_displacement()[0], 0.1);

        model.set_time(1.0);
        model.revert_to_last_commit().unwrap();
        assert_eq!(model.node(3).unwrap().trial_displacement()[0], 0.0);
        assert_eq!(model.current_time(), 0.0);

        assert!(model.incr_trial_displacement(&Vec::zeros(3)).is_err());
    }
}
