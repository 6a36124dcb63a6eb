//! Threshold validation.
//!
//! All problems are collected before reporting so a broken configuration is
//! fixed in one pass rather than one field at a time.

use super::thresholds::SmellThresholds;
use super::AnalyzerConfig;
use crate::errors::ConfigError;

pub fn validate_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    let mut errors = validate_thresholds(&config.smells);
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ConfigError::Multiple(errors)),
    }
}

fn validate_thresholds(t: &SmellThresholds) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    let line_counts = [
        ("smells.long_method_lines", t.long_method_lines),
        ("smells.god_class_loc", t.god_class_loc),
        ("smells.lazy_class_loc", t.lazy_class_loc),
        ("smells.lazy_class_methods", t.lazy_class_methods),
        ("smells.complex_class_cc", t.complex_class_cc),
        ("smells.message_chain_length", t.message_chain_length),
        ("smells.duplicate_min_lines", t.duplicate_min_lines),
    ];
    for (field, value) in line_counts {
        if value == 0 {
            errors.push(ConfigError::invalid(field, "must be greater than 0"));
        }
    }

    let ratios = [
        ("smells.data_class_accessor_ratio", t.data_class_accessor_ratio),
        ("smells.middle_man_ratio", t.middle_man_ratio),
    ];
    for (field, value) in ratios {
        if !is_valid_ratio(value) {
            errors.push(ConfigError::invalid(
                field,
                format!("ratio out of range: {} (must be in (0.0, 1.0])", value),
            ));
        }
    }

    errors
}

fn is_valid_ratio(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AnalyzerConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let mut config = AnalyzerConfig::default();
        config.smells.data_class_accessor_ratio = -0.2;

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold { ref field, .. } if field == "smells.data_class_accessor_ratio"
        ));
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = AnalyzerConfig::default();
        config.smells.middle_man_ratio = f64::NAN;
        config.smells.long_method_lines = 0;

        match validate_config(&config) {
            Err(ConfigError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected multiple errors, got {:?}", other),
        }
    }
}
