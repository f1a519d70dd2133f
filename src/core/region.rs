use super::types::RegionalFactor;

/// Canonical adjustment rows. The social security replacement ratio is
/// carried for future use and is not consumed by the calculation.
const US: RegionalFactor = RegionalFactor {
    inflation_multiplier: 1.00,
    tax_rate: 0.22,
    social_security_replacement_ratio: 0.40,
};

const CA: RegionalFactor = RegionalFactor {
    inflation_multiplier: 1.02,
    tax_rate: 0.26,
    social_security_replacement_ratio: 0.35,
};

const UK: RegionalFactor = RegionalFactor {
    inflation_multiplier: 1.05,
    tax_rate: 0.28,
    social_security_replacement_ratio: 0.30,
};

const AU: RegionalFactor = RegionalFactor {
    inflation_multiplier: 1.03,
    tax_rate: 0.24,
    social_security_replacement_ratio: 0.38,
};

const EU: RegionalFactor = RegionalFactor {
    inflation_multiplier: 1.04,
    tax_rate: 0.30,
    social_security_replacement_ratio: 0.45,
};

/// Total lookup: unknown codes resolve to the US row.
pub fn lookup(region: &str) -> RegionalFactor {
    match region.to_ascii_uppercase().as_str() {
        "CA" => CA,
        "UK" => UK,
        "AU" => AU,
        "EU" => EU,
        _ => US,
    }
}
