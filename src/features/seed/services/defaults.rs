//! Catalog rows inserted by the seed routine.

use crate::features::legal_rules::models::RuleSeverity;
use crate::shared::prompts::TemplateFileEntry;

/// The same file the template fallback store reads at runtime
const DEFAULT_TEMPLATES: &str = include_str!("../../../../templates/prompts.json");

pub struct SeedBrand {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tone: &'static str,
    pub values: &'static str,
    pub industry: &'static str,
}

pub struct SeedDemographic {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub characteristics: &'static str,
    pub age_range: &'static str,
}

pub struct SeedLegalRule {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub severity: RuleSeverity,
}

pub const BRANDS: &[SeedBrand] = &[
    SeedBrand {
        id: "apple",
        name: "Apple",
        description: "Designs consumer electronics, software and services built around a tightly integrated ecosystem.",
        tone: "minimal, confident, premium",
        values: "privacy, design excellence, simplicity",
        industry: "Technology",
    },
    SeedBrand {
        id: "nike",
        name: "Nike",
        description: "Athletic footwear, apparel and equipment for professional and everyday athletes.",
        tone: "bold, motivational, energetic",
        values: "performance, inclusion, determination",
        industry: "Sportswear",
    },
    SeedBrand {
        id: "patagonia",
        name: "Patagonia",
        description: "Outdoor clothing and gear company known for environmental activism.",
        tone: "earnest, outdoorsy, activist",
        values: "sustainability, durability, environmental responsibility",
        industry: "Outdoor Apparel",
    },
];

pub const DEMOGRAPHICS: &[SeedDemographic] = &[
    SeedDemographic {
        id: "gen-z",
        name: "Gen Z Consumer",
        description: "A digital native who discovers products through short-form video and friends.",
        characteristics: "values authenticity, skeptical of polished ads, price conscious, socially aware",
        age_range: "18-27",
    },
    SeedDemographic {
        id: "millennial",
        name: "Millennial Professional",
        description: "A working professional balancing career, family plans and experiences.",
        characteristics: "researches before buying, brand loyal when trust is earned, values convenience",
        age_range: "28-43",
    },
    SeedDemographic {
        id: "gen-x",
        name: "Gen X Parent",
        description: "A pragmatic parent making most of the household purchasing decisions.",
        characteristics: "practical, values reliability and value for money, reads reviews",
        age_range: "44-59",
    },
    SeedDemographic {
        id: "boomer",
        name: "Baby Boomer Retiree",
        description: "A retiree with time to compare options and strong opinions on service.",
        characteristics: "prefers clear information, values customer service, loyal to familiar brands",
        age_range: "60-78",
    },
];

pub const LEGAL_RULES: &[SeedLegalRule] = &[
    SeedLegalRule {
        name: "No unsubstantiated health claims",
        category: "health",
        description: "Claims that a product prevents, treats or cures a condition require scientific substantiation.",
        severity: RuleSeverity::Critical,
    },
    SeedLegalRule {
        name: "No guaranteed results",
        category: "claims",
        description: "Do not promise specific outcomes such as guaranteed weight loss, income or returns.",
        severity: RuleSeverity::High,
    },
    SeedLegalRule {
        name: "Disclose sponsorships",
        category: "disclosure",
        description: "Paid partnerships and endorsements must be clearly labelled as advertising.",
        severity: RuleSeverity::High,
    },
    SeedLegalRule {
        name: "Substantiate comparative claims",
        category: "claims",
        description: "Superlatives and comparisons with competitors (\"best\", \"#1\") need verifiable evidence.",
        severity: RuleSeverity::Medium,
    },
    SeedLegalRule {
        name: "Clear pricing terms",
        category: "pricing",
        description: "Prices, discounts and free offers must state material conditions such as subscriptions or fees.",
        severity: RuleSeverity::Medium,
    },
    SeedLegalRule {
        name: "Avoid misleading urgency",
        category: "pressure",
        description: "Countdowns and scarcity claims must reflect real limits on time or stock.",
        severity: RuleSeverity::Low,
    },
];

/// Prompt templates shipped in `templates/prompts.json`
pub fn prompt_templates() -> Result<Vec<TemplateFileEntry>, serde_json::Error> {
    serde_json::from_str(DEFAULT_TEMPLATES)
}
