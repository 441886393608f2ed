use serde::{Deserialize, Serialize};

/// Number of entries in the 5C analysis.
pub const ANALYSIS_SECTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariantName {
    A,
    B,
}

impl VariantName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            _ => None,
        }
    }

    /// Badge shown next to the variant title.
    pub fn role(&self) -> &'static str {
        match self {
            Self::A => "Control",
            Self::B => "Challenger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaVariant {
    pub variant_name: VariantName,
    pub html_block: String,
    pub preview_explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbTestPair {
    pub position: String,
    pub reasoning: String,
    pub variants: [CtaVariant; 2],
}

impl AbTestPair {
    pub fn variant(&self, name: VariantName) -> Option<&CtaVariant> {
        self.variants.iter().find(|v| v.variant_name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub title: String,
    pub content: String,
}

/// Everything one generation run produces. Replaced wholesale on the next run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFullStrategyResponse {
    pub shared_css: String,
    pub overall_strategy: String,
    pub analysis: Vec<AnalysisItem>,
    pub risks_and_recommendations: String,
    pub ab_test_pairs: Vec<AbTestPair>,
}

impl AiFullStrategyResponse {
    /// Shape checks serde cannot express: five analysis entries and
    /// variants tagged A then B in every pair.
    pub fn validate(&self) -> Result<(), String> {
        if self.analysis.len() != ANALYSIS_SECTIONS {
            return Err(format!(
                "Expected {} analysis entries, got {}",
                ANALYSIS_SECTIONS,
                self.analysis.len()
            ));
        }
        for (i, pair) in self.ab_test_pairs.iter().enumerate() {
            let names = [pair.variants[0].variant_name, pair.variants[1].variant_name];
            if names != [VariantName::A, VariantName::B] {
                return Err(format!(
                    "A/B pair {} must hold variants A and B in order, got {} and {}",
                    i + 1,
                    names[0].as_str(),
                    names[1].as_str()
                ));
            }
        }
        Ok(())
    }

    pub fn variants_mut(&mut self) -> impl Iterator<Item = &mut CtaVariant> {
        self.ab_test_pairs
            .iter_mut()
            .flat_map(|pair| pair.variants.iter_mut())
    }
}
