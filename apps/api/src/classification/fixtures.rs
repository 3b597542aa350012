//! Synthetic taxonomy shared by the classification tests.

use crate::classification::index::{build_index, NormalizedIndex};
use crate::classification::matcher::TitleClassifier;
use crate::classification::taxonomy::Taxonomy;
use crate::classification::tuning::MatchTuning;

pub const SAMPLE_TAXONOMY: &str = r#"{
    "Automotive": {
        "Automotive Mechanic": {
            "description": "Services and repairs light vehicles",
            "qualifications": ["AUT-SVC-2"],
            "keywords": ["engine", "brake"],
            "alternate_titles": ["Auto Mechanic"],
            "specialized_titles": [
                {
                    "title": "Diesel Engine Mechanic",
                    "qualifications": ["AUT-DSL-2"],
                    "keywords": ["diesel"],
                    "alternate_titles": ["Diesel Mechanic"]
                }
            ]
        }
    },
    "Agriculture": {
        "Farm Machinery Mechanic": {
            "qualifications": ["AGR-FMM-2"]
        },
        "Farm Worker": {
            "qualifications": ["AGR-FW-1"],
            "alternate_titles": ["Farm Laborer"]
        },
        "Poultry Raiser": {
            "qualifications": ["AGR-PR-2"]
        }
    },
    "Electronics": {
        "Electronics Technician": {
            "qualifications": ["ELC-EPAS-2"],
            "keywords": ["circuit"]
        }
    },
    "Health": {
        "Dental Technician": {
            "qualifications": ["HLT-DT-4"]
        }
    },
    "Metals and Engineering": {
        "Welder": {
            "specialized_titles": [
                {"title": "Pipe Welder", "qualifications": ["MET-SMAW-2"]},
                {"title": "TIG Welder", "qualifications": ["MET-GTAW-2"]}
            ]
        }
    },
    "Construction": {
        "Plumber": {
            "qualifications": ["CON-PLB-2"],
            "alternate_titles": ["Pipe Welder", "Pipefitter"]
        }
    },
    "Human Resource Management": {
        "HR Officer": {
            "qualifications": ["HRM-OFF-1"],
            "keywords": ["recruitment", "payroll"],
            "alternate_titles": ["Personnel Officer"]
        }
    },
    "Tourism": {
        "Cook": {
            "qualifications": ["TOU-CK-2"],
            "keywords": ["culinary"],
            "alternate_titles": ["Line Cook"]
        },
        "Kitchen Steward": {
            "qualifications": ["TOU-KS-2"]
        },
        "Kitchen Helper": {}
    },
    "Maritime": {
        "Lighthouse Keeper": {}
    }
}"#;

pub fn sample_taxonomy() -> Taxonomy {
    Taxonomy::from_json(SAMPLE_TAXONOMY).expect("sample taxonomy is valid")
}

pub fn sample_index() -> NormalizedIndex {
    build_index(&sample_taxonomy())
}

pub fn sample_classifier() -> TitleClassifier {
    TitleClassifier::new(sample_index(), MatchTuning::default())
}
