//! GraphQL documents sent to the Open Targets Platform.
//! One named operation per document; variables are bound by the callers.

#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

pub const SEARCH_ENTITY: Operation = Operation {
    name: "SearchEntity",
    document: r#"
query SearchEntity($queryString: String!, $entityNames: [String!], $size: Int!) {
  search(queryString: $queryString, entityNames: $entityNames, page: { index: 0, size: $size }) {
    total
    hits {
      id
      name
      entity
      description
      score
    }
  }
}
"#,
};

pub const DISEASE_ASSOCIATED_TARGETS: Operation = Operation {
    name: "DiseaseAssociatedTargets",
    document: r#"
query DiseaseAssociatedTargets($efoId: String!, $size: Int!) {
  disease(efoId: $efoId) {
    id
    name
    associatedTargets(page: { index: 0, size: $size }) {
      count
      rows {
        target {
          id
          approvedSymbol
        }
        score
        datatypeScores {
          id
          score
        }
      }
    }
  }
}
"#,
};

pub const TARGET_KNOWN_DRUGS: Operation = Operation {
    name: "TargetKnownDrugs",
    document: r#"
query TargetKnownDrugs($ensemblId: String!, $size: Int!) {
  target(ensemblId: $ensemblId) {
    id
    approvedSymbol
    knownDrugs(size: $size) {
      count
      rows {
        drugId
        prefName
        drug {
          id
          name
        }
      }
    }
  }
}
"#,
};

pub const DRUG_DETAILS: Operation = Operation {
    name: "DrugDetails",
    document: r#"
query DrugDetails($chemblId: String!) {
  drug(chemblId: $chemblId) {
    id
    name
    description
    maximumClinicalTrialPhase
    mechanismsOfAction {
      rows {
        mechanismOfAction
        actionType
        targetName
        targets {
          id
          approvedSymbol
        }
      }
    }
  }
}
"#,
};

pub const TARGET_TRACTABILITY: Operation = Operation {
    name: "TargetTractability",
    document: r#"
query TargetTractability($ensemblId: String!) {
  target(ensemblId: $ensemblId) {
    id
    approvedSymbol
    tractability {
      modality
      value
      label
    }
  }
}
"#,
};

pub const TARGET_CHEMICAL_PROBES: Operation = Operation {
    name: "TargetChemicalProbes",
    document: r#"
query TargetChemicalProbes($ensemblId: String!) {
  target(ensemblId: $ensemblId) {
    id
    approvedSymbol
    chemicalProbes {
      id
      control
      drugId
      isHighQuality
      mechanismOfAction
      origin
      probesDrugsScore
      probeMinerScore
      scoreInCells
      scoreInOrganisms
      targetFromSourceId
      urls {
        niceName
        url
      }
    }
  }
}
"#,
};

pub const TARGET_PRIORITISATION: Operation = Operation {
    name: "TargetPrioritisation",
    document: r#"
query TargetPrioritisation($ensemblId: String!) {
  target(ensemblId: $ensemblId) {
    id
    approvedSymbol
    prioritisation {
      items {
        key
        value
      }
    }
  }
}
"#,
};

pub const TARGET_SAFETY: Operation = Operation {
    name: "TargetSafety",
    document: r#"
query TargetSafety($ensemblId: String!) {
  target(ensemblId: $ensemblId) {
    id
    approvedSymbol
    safetyLiabilities {
      event
      eventId
      biosamples {
        cellFormat
        cellLabel
        tissueLabel
        tissueId
      }
      effects {
        dosing
        direction
      }
      studies {
        name
        type
        description
      }
      datasource
      literature
      url
    }
  }
}
"#,
};

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operation; 8] = [
        SEARCH_ENTITY,
        DISEASE_ASSOCIATED_TARGETS,
        TARGET_KNOWN_DRUGS,
        DRUG_DETAILS,
        TARGET_TRACTABILITY,
        TARGET_CHEMICAL_PROBES,
        TARGET_PRIORITISATION,
        TARGET_SAFETY,
    ];

    #[test]
    fn test_document_declares_its_operation_name() {
        for op in ALL {
            assert!(
                op.document.contains(&format!("query {}(", op.name)),
                "{} does not declare its own name",
                op.name
            );
        }
    }

    #[test]
    fn test_braces_balanced() {
        for op in ALL {
            let open = op.document.matches('{').count();
            let close = op.document.matches('}').count();
            assert_eq!(open, close, "unbalanced braces in {}", op.name);
        }
    }
}
