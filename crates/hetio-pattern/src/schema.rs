//! The fixed HetioNet vocabulary: node kinds, metaedge codes and
//! regulation directions.

use std::fmt;
use std::str::FromStr;

use crate::error::PatternError;

/// A node kind from the HetioNet schema.
///
/// Only `Anatomy`, `Compound`, `Disease` and `Gene` take part in queries;
/// the other kinds exist so a complete HetioNet node set can be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Anatomical structure (Uberon).
    Anatomy,
    /// Gene Ontology biological process.
    BiologicalProcess,
    /// Gene Ontology cellular component.
    CellularComponent,
    /// Small-molecule compound (DrugBank).
    Compound,
    /// Disease (Disease Ontology).
    Disease,
    /// Protein-coding gene (Entrez).
    Gene,
    /// Gene Ontology molecular function.
    MolecularFunction,
    /// Pathway.
    Pathway,
    /// Pharmacologic class.
    PharmacologicClass,
    /// Side effect (SIDER).
    SideEffect,
    /// Symptom (MeSH).
    Symptom,
}

impl NodeKind {
    /// Every node kind in the schema.
    pub const ALL: [NodeKind; 11] = [
        NodeKind::Anatomy,
        NodeKind::BiologicalProcess,
        NodeKind::CellularComponent,
        NodeKind::Compound,
        NodeKind::Disease,
        NodeKind::Gene,
        NodeKind::MolecularFunction,
        NodeKind::Pathway,
        NodeKind::PharmacologicClass,
        NodeKind::SideEffect,
        NodeKind::Symptom,
    ];

    /// Returns the schema name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Anatomy => "Anatomy",
            NodeKind::BiologicalProcess => "BiologicalProcess",
            NodeKind::CellularComponent => "CellularComponent",
            NodeKind::Compound => "Compound",
            NodeKind::Disease => "Disease",
            NodeKind::Gene => "Gene",
            NodeKind::MolecularFunction => "MolecularFunction",
            NodeKind::Pathway => "Pathway",
            NodeKind::PharmacologicClass => "PharmacologicClass",
            NodeKind::SideEffect => "SideEffect",
            NodeKind::Symptom => "Symptom",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PatternError::UnknownKind(s.to_string()))
    }
}

/// Direction of a regulation effect on a gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Regulation {
    /// Up-regulation.
    Up,
    /// Down-regulation.
    Down,
}

impl Regulation {
    /// Returns the opposite direction.
    pub fn opposite(self) -> Regulation {
        match self {
            Regulation::Up => Regulation::Down,
            Regulation::Down => Regulation::Up,
        }
    }
}

/// A metaedge (typed relationship) code from the HetioNet schema.
///
/// The code spells the source kind, the verb and the target kind:
/// `CtD` is Compound-treats-Disease, `DlA` is Disease-localizes-Anatomy.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metaedge {
    AdG,
    AeG,
    AuG,
    CbG,
    CcSE,
    CdG,
    CpD,
    CrC,
    CtD,
    CuG,
    DaG,
    DdG,
    DlA,
    DpS,
    DrD,
    DuG,
    GcG,
    GiG,
    GpBP,
    GpCC,
    GpMF,
    GpPW,
    #[cfg_attr(feature = "serde", serde(rename = "Gr>G"))]
    GrG,
    PCiC,
}

impl Metaedge {
    /// Every metaedge in the schema.
    pub const ALL: [Metaedge; 24] = [
        Metaedge::AdG,
        Metaedge::AeG,
        Metaedge::AuG,
        Metaedge::CbG,
        Metaedge::CcSE,
        Metaedge::CdG,
        Metaedge::CpD,
        Metaedge::CrC,
        Metaedge::CtD,
        Metaedge::CuG,
        Metaedge::DaG,
        Metaedge::DdG,
        Metaedge::DlA,
        Metaedge::DpS,
        Metaedge::DrD,
        Metaedge::DuG,
        Metaedge::GcG,
        Metaedge::GiG,
        Metaedge::GpBP,
        Metaedge::GpCC,
        Metaedge::GpMF,
        Metaedge::GpPW,
        Metaedge::GrG,
        Metaedge::PCiC,
    ];

    /// Compound treats or palliates a disease.
    pub const TREATMENT: [Metaedge; 2] = [Metaedge::CtD, Metaedge::CpD];
    /// Compound up- or down-regulates a gene.
    pub const COMPOUND_REGULATION: [Metaedge; 2] = [Metaedge::CuG, Metaedge::CdG];
    /// Anatomy up- or down-regulates a gene.
    pub const ANATOMY_REGULATION: [Metaedge; 2] = [Metaedge::AuG, Metaedge::AdG];
    /// Disease up- or down-regulates a gene. Association (`DaG`) is not regulation.
    pub const DISEASE_REGULATION: [Metaedge; 2] = [Metaedge::DuG, Metaedge::DdG];
    /// Disease down-regulates, up-regulates or associates with a gene.
    pub const DISEASE_GENE: [Metaedge; 3] = [Metaedge::DdG, Metaedge::DuG, Metaedge::DaG];

    /// Returns the schema code, e.g. `"CtD"`.
    pub fn code(self) -> &'static str {
        match self {
            Metaedge::AdG => "AdG",
            Metaedge::AeG => "AeG",
            Metaedge::AuG => "AuG",
            Metaedge::CbG => "CbG",
            Metaedge::CcSE => "CcSE",
            Metaedge::CdG => "CdG",
            Metaedge::CpD => "CpD",
            Metaedge::CrC => "CrC",
            Metaedge::CtD => "CtD",
            Metaedge::CuG => "CuG",
            Metaedge::DaG => "DaG",
            Metaedge::DdG => "DdG",
            Metaedge::DlA => "DlA",
            Metaedge::DpS => "DpS",
            Metaedge::DrD => "DrD",
            Metaedge::DuG => "DuG",
            Metaedge::GcG => "GcG",
            Metaedge::GiG => "GiG",
            Metaedge::GpBP => "GpBP",
            Metaedge::GpCC => "GpCC",
            Metaedge::GpMF => "GpMF",
            Metaedge::GpPW => "GpPW",
            Metaedge::GrG => "Gr>G",
            Metaedge::PCiC => "PCiC",
        }
    }

    /// Kind of the node an edge of this type starts at.
    pub fn source_kind(self) -> NodeKind {
        match self {
            Metaedge::AdG | Metaedge::AeG | Metaedge::AuG => NodeKind::Anatomy,
            Metaedge::CbG
            | Metaedge::CcSE
            | Metaedge::CdG
            | Metaedge::CpD
            | Metaedge::CrC
            | Metaedge::CtD
            | Metaedge::CuG => NodeKind::Compound,
            Metaedge::DaG
            | Metaedge::DdG
            | Metaedge::DlA
            | Metaedge::DpS
            | Metaedge::DrD
            | Metaedge::DuG => NodeKind::Disease,
            Metaedge::GcG
            | Metaedge::GiG
            | Metaedge::GpBP
            | Metaedge::GpCC
            | Metaedge::GpMF
            | Metaedge::GpPW
            | Metaedge::GrG => NodeKind::Gene,
            Metaedge::PCiC => NodeKind::PharmacologicClass,
        }
    }

    /// Kind of the node an edge of this type ends at.
    pub fn target_kind(self) -> NodeKind {
        match self {
            Metaedge::AdG
            | Metaedge::AeG
            | Metaedge::AuG
            | Metaedge::CbG
            | Metaedge::CdG
            | Metaedge::CuG
            | Metaedge::DaG
            | Metaedge::DdG
            | Metaedge::DuG
            | Metaedge::GcG
            | Metaedge::GiG
            | Metaedge::GrG => NodeKind::Gene,
            Metaedge::CcSE => NodeKind::SideEffect,
            Metaedge::CpD | Metaedge::CtD | Metaedge::DrD => NodeKind::Disease,
            Metaedge::CrC | Metaedge::PCiC => NodeKind::Compound,
            Metaedge::DlA => NodeKind::Anatomy,
            Metaedge::DpS => NodeKind::Symptom,
            Metaedge::GpBP => NodeKind::BiologicalProcess,
            Metaedge::GpCC => NodeKind::CellularComponent,
            Metaedge::GpMF => NodeKind::MolecularFunction,
            Metaedge::GpPW => NodeKind::Pathway,
        }
    }

    /// Regulation direction carried by this metaedge, if it is a regulation edge.
    pub fn regulation(self) -> Option<Regulation> {
        match self {
            Metaedge::AuG | Metaedge::CuG | Metaedge::DuG => Some(Regulation::Up),
            Metaedge::AdG | Metaedge::CdG | Metaedge::DdG => Some(Regulation::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Metaedge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Metaedge {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metaedge::ALL
            .iter()
            .copied()
            .find(|m| m.code() == s)
            .ok_or_else(|| PatternError::UnknownMetaedge(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_from_str() {
        assert_eq!("Disease".parse::<NodeKind>().unwrap(), NodeKind::Disease);
        assert_eq!(
            "SideEffect".parse::<NodeKind>().unwrap(),
            NodeKind::SideEffect
        );
        assert_eq!(
            "disease".parse::<NodeKind>(),
            Err(PatternError::UnknownKind("disease".to_string()))
        );
    }

    #[test]
    fn test_metaedge_codes_parse_back() {
        for metaedge in Metaedge::ALL {
            assert_eq!(metaedge.code().parse::<Metaedge>().unwrap(), metaedge);
        }
        assert_eq!("Gr>G".parse::<Metaedge>().unwrap(), Metaedge::GrG);
        assert!("CtG".parse::<Metaedge>().is_err());
    }

    #[test]
    fn test_metaedge_endpoint_kinds() {
        assert_eq!(Metaedge::CtD.source_kind(), NodeKind::Compound);
        assert_eq!(Metaedge::CtD.target_kind(), NodeKind::Disease);
        assert_eq!(Metaedge::DlA.source_kind(), NodeKind::Disease);
        assert_eq!(Metaedge::DlA.target_kind(), NodeKind::Anatomy);
        assert_eq!(Metaedge::AdG.source_kind(), NodeKind::Anatomy);
        assert_eq!(Metaedge::PCiC.target_kind(), NodeKind::Compound);
    }

    #[test]
    fn test_regulation_directions() {
        assert_eq!(Metaedge::CuG.regulation(), Some(Regulation::Up));
        assert_eq!(Metaedge::AdG.regulation(), Some(Regulation::Down));
        assert_eq!(Metaedge::DdG.regulation(), Some(Regulation::Down));
        assert_eq!(Metaedge::DaG.regulation(), None);
        assert_eq!(Metaedge::CtD.regulation(), None);
        assert_eq!(Regulation::Up.opposite(), Regulation::Down);
    }

    #[test]
    fn test_metaedge_groups() {
        assert!(!Metaedge::DISEASE_REGULATION.contains(&Metaedge::DaG));
        assert!(Metaedge::DISEASE_GENE.contains(&Metaedge::DaG));
        assert_eq!(Metaedge::TREATMENT, [Metaedge::CtD, Metaedge::CpD]);
    }
}
