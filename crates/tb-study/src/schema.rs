//! Study schema definitions.

use serde::{Deserialize, Serialize};
use tb_fcirc::{Isotopomer, LabeledElement};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Study {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub animals: Vec<AnimalDef>,
    #[serde(default)]
    pub serum_samples: Vec<SerumSampleDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimalDef {
    pub id: String,
    pub body_weight_g: f64,
    /// Infusion rate shared by all tracers (nmol/min/g). Version 1 files carry
    /// it here only; migration copies it onto each tracer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infusion_rate: Option<f64>,
    #[serde(default)]
    pub infusate: Vec<TracerDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TracerDef {
    pub compound: String,
    pub concentration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infusion_rate: Option<f64>,
    #[serde(default)]
    pub labels: Vec<LabelDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LabelDef {
    pub element: LabeledElement,
    /// Labeled atoms of `element` in the tracer.
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerumSampleDef {
    pub id: String,
    pub animal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_collected_min: Option<f64>,
    #[serde(default)]
    pub measurements: Vec<MeasurementDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementDef {
    pub tracer: String,
    pub element: LabeledElement,
    pub source: MeasurementSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MeasurementSource {
    /// Fractions already computed upstream.
    Fractions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fraction: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enrichment_fraction: Option<f64>,
    },
    /// Corrected isotopomer abundances of the tracer's peak group.
    PeakGroup {
        atom_count: u32,
        #[serde(default)]
        isotopomers: Vec<Isotopomer>,
    },
}

impl Study {
    pub fn animal(&self, id: &str) -> Option<&AnimalDef> {
        self.animals.iter().find(|a| a.id == id)
    }

    pub fn samples_for_animal<'a>(
        &'a self,
        animal_id: &'a str,
    ) -> impl Iterator<Item = &'a SerumSampleDef> + 'a {
        self.serum_samples
            .iter()
            .filter(move |s| s.animal_id == animal_id)
    }
}

impl AnimalDef {
    pub fn tracer(&self, compound: &str) -> Option<&TracerDef> {
        self.infusate.iter().find(|t| t.compound == compound)
    }
}

impl TracerDef {
    pub fn label_count(&self, element: LabeledElement) -> Option<u32> {
        self.labels
            .iter()
            .find(|l| l.element == element)
            .map(|l| l.count)
    }
}
