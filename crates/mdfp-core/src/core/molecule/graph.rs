use super::element::Element;
use slotmap::{SecondaryMap, SlotMap, new_key_type};

new_key_type! {
    pub struct AtomId;
    pub struct BondId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Contribution of the bond to an atom's valence, with aromatic bonds counted as one.
    pub fn valence_contribution(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Hydrogen count written inside a bracket atom; `None` for organic-subset atoms.
    pub bracket_hydrogens: Option<u8>,
    /// Hydrogens implied by the default valence model, filled in by
    /// [`MolecularGraph::update_property_cache`].
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            aromatic: false,
            charge: 0,
            isotope: None,
            bracket_hydrogens: None,
            implicit_hydrogens: 0,
        }
    }

    pub fn is_bracket(&self) -> bool {
        self.bracket_hydrogens.is_some()
    }

    /// Hydrogens attached without being explicit graph nodes.
    pub fn attached_hydrogens(&self) -> u8 {
        self.bracket_hydrogens.unwrap_or(self.implicit_hydrogens)
    }

    /// Aromatic atoms that donate a lone pair to the ring rather than a pi bond.
    fn donates_lone_pair(&self) -> bool {
        matches!(
            self.element,
            Element::OXYGEN | Element::SULFUR | Element::SELENIUM | Element::TELLURIUM
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub begin: AtomId,
    pub end: AtomId,
    pub order: BondOrder,
    pub in_ring: bool,
}

impl Bond {
    pub fn other(&self, atom: AtomId) -> AtomId {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// A valence violation found while sanitizing a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValenceViolation {
    pub element: Element,
    pub charge: i8,
    pub valence: u16,
    pub allowed: u8,
}

/// An undirected molecular graph with cached ring membership and hydrogen counts.
///
/// Atoms and bonds are stored in slot maps so that iteration follows insertion
/// order, which keeps every derived count independent of hashing.
#[derive(Debug, Clone, Default)]
pub struct MolecularGraph {
    atoms: SlotMap<AtomId, Atom>,
    bonds: SlotMap<BondId, Bond>,
    adjacency: SecondaryMap<AtomId, Vec<(AtomId, BondId)>>,
}

impl MolecularGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.adjacency.insert(id, Vec::new());
        id
    }

    /// Adds a bond between two distinct atoms.
    ///
    /// Returns `None` if either atom is missing, the atoms are identical, or they
    /// are already bonded.
    pub fn add_bond(&mut self, begin: AtomId, end: AtomId, order: BondOrder) -> Option<BondId> {
        if begin == end || !self.atoms.contains_key(begin) || !self.atoms.contains_key(end) {
            return None;
        }
        if self.bond_between(begin, end).is_some() {
            return None;
        }
        let id = self.bonds.insert(Bond {
            begin,
            end,
            order,
            in_ring: false,
        });
        self.adjacency.get_mut(begin)?.push((end, id));
        self.adjacency.get_mut(end)?.push((begin, id));
        Some(id)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn neighbors(&self, id: AtomId) -> &[(AtomId, BondId)] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<BondId> {
        self.neighbors(a)
            .iter()
            .find(|(other, _)| *other == b)
            .map(|(_, bond)| *bond)
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.values().filter(|a| a.element.is_heavy()).count()
    }

    pub fn count_element(&self, element: Element) -> usize {
        self.atoms.values().filter(|a| a.element == element).count()
    }

    /// Number of heavy-atom neighbours.
    pub fn heavy_degree(&self, id: AtomId) -> usize {
        self.neighbors(id)
            .iter()
            .filter(|(other, _)| self.atoms.get(*other).is_some_and(|a| a.element.is_heavy()))
            .count()
    }

    /// Hydrogens on an atom, whether implicit, bracketed, or explicit graph nodes.
    pub fn total_hydrogens(&self, id: AtomId) -> usize {
        let Some(atom) = self.atoms.get(id) else {
            return 0;
        };
        let explicit = self
            .neighbors(id)
            .iter()
            .filter(|(other, _)| {
                self.atoms
                    .get(*other)
                    .is_some_and(|a| a.element == Element::HYDROGEN)
            })
            .count();
        atom.attached_hydrogens() as usize + explicit
    }

    pub fn has_bond_of_order(&self, id: AtomId, order: BondOrder) -> bool {
        self.neighbors(id)
            .iter()
            .any(|(_, bond)| self.bonds.get(*bond).is_some_and(|b| b.order == order))
    }

    pub fn is_ring_atom(&self, id: AtomId) -> bool {
        self.neighbors(id)
            .iter()
            .any(|(_, bond)| self.bonds.get(*bond).is_some_and(|b| b.in_ring))
    }

    /// Cyclomatic number of the graph, i.e. the size of the smallest set of smallest rings.
    pub fn ring_count(&self) -> usize {
        (self.bond_count() + self.component_count()).saturating_sub(self.atom_count())
    }

    pub fn component_count(&self) -> usize {
        let mut seen: SecondaryMap<AtomId, ()> = SecondaryMap::new();
        let mut count = 0;
        for start in self.atoms.keys() {
            if seen.contains_key(start) {
                continue;
            }
            count += 1;
            let mut stack = vec![start];
            seen.insert(start, ());
            while let Some(current) = stack.pop() {
                for &(next, _) in self.neighbors(current) {
                    if seen.insert(next, ()).is_none() {
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    /// Sum of bond valence contributions around an atom, excluding attached hydrogens.
    pub fn bond_valence(&self, id: AtomId) -> u16 {
        self.neighbors(id)
            .iter()
            .filter_map(|(_, bond)| self.bonds.get(*bond))
            .map(|b| u16::from(b.order.valence_contribution()))
            .sum()
    }

    /// Recomputes ring membership and implicit hydrogen counts.
    ///
    /// With `strict` set, the first valence violation aborts the update. Otherwise
    /// implicit hydrogens are clamped at zero for over-valent atoms.
    pub fn update_property_cache(&mut self, strict: bool) -> Result<(), ValenceViolation> {
        self.perceive_rings();

        let ids: Vec<AtomId> = self.atoms.keys().collect();
        for id in ids {
            let valence = self.bond_valence(id);
            let atom = &self.atoms[id];

            if atom.is_bracket() {
                if strict {
                    let total = valence + u16::from(atom.attached_hydrogens());
                    if let Some(allowed) = atom.element.max_valence(atom.charge) {
                        if total > u16::from(allowed) {
                            return Err(ValenceViolation {
                                element: atom.element,
                                charge: atom.charge,
                                valence: total,
                                allowed,
                            });
                        }
                    }
                }
                continue;
            }

            let pi_contribution = u16::from(atom.aromatic && !atom.donates_lone_pair());
            let effective = valence + pi_contribution;
            let implicit = match atom.element.default_valences() {
                Some(valences) => match valences.iter().find(|&&v| u16::from(v) >= effective) {
                    // `target >= effective`, so the difference always fits.
                    Some(&target) => u8::try_from(u16::from(target) - effective).unwrap_or(0),
                    None if strict => {
                        return Err(ValenceViolation {
                            element: atom.element,
                            charge: atom.charge,
                            valence: effective,
                            allowed: valences.last().copied().unwrap_or(0),
                        });
                    }
                    None => 0,
                },
                None => 0,
            };
            self.atoms[id].implicit_hydrogens = implicit;
        }
        Ok(())
    }

    /// Marks every non-bridge bond as a ring bond (iterative Tarjan low-link).
    fn perceive_rings(&mut self) {
        let mut discovery: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut low: SecondaryMap<AtomId, usize> = SecondaryMap::new();
        let mut bridges: SecondaryMap<BondId, ()> = SecondaryMap::new();
        let mut timer = 0;

        for root in self.atoms.keys() {
            if discovery.contains_key(root) {
                continue;
            }
            discovery.insert(root, timer);
            low.insert(root, timer);
            timer += 1;

            // (atom, bond used to enter it, next neighbour index to visit)
            let mut stack: Vec<(AtomId, Option<BondId>, usize)> = vec![(root, None, 0)];
            while let Some(frame) = stack.last_mut() {
                let (atom, parent_bond, cursor) = *frame;
                let neighbors = self.neighbors(atom);
                if cursor < neighbors.len() {
                    frame.2 += 1;
                    let (next, bond) = neighbors[cursor];
                    if Some(bond) == parent_bond {
                        continue;
                    }
                    if let Some(&d) = discovery.get(next) {
                        if d < low[atom] {
                            low[atom] = d;
                        }
                    } else {
                        discovery.insert(next, timer);
                        low.insert(next, timer);
                        timer += 1;
                        stack.push((next, Some(bond), 0));
                    }
                } else {
                    stack.pop();
                    if let (Some(bond), Some(parent)) = (parent_bond, stack.last()) {
                        let parent_atom = parent.0;
                        if low[atom] < low[parent_atom] {
                            low[parent_atom] = low[atom];
                        }
                        if low[atom] > discovery[parent_atom] {
                            bridges.insert(bond, ());
                        }
                    }
                }
            }
        }

        for (id, bond) in self.bonds.iter_mut() {
            bond.in_ring = !bridges.contains_key(id);
        }
    }
}
