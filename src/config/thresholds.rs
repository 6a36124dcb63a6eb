use serde::{Deserialize, Serialize};

/// Thresholds for the smell detectors.
///
/// Every rule compares strictly (`value > threshold`), except the two
/// "small class" bounds of Lazy Class which compare with `<`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmellThresholds {
    #[serde(default = "default_long_method_lines")]
    pub long_method_lines: usize,

    #[serde(default = "default_god_class_loc")]
    pub god_class_loc: usize,

    #[serde(default = "default_god_class_methods")]
    pub god_class_methods: usize,

    /// Accessor share of all methods above which a class is a Data Class.
    #[serde(default = "default_data_class_accessor_ratio")]
    pub data_class_accessor_ratio: f64,

    /// Accesses to other objects' members within one method.
    #[serde(default = "default_feature_envy_accesses")]
    pub feature_envy_accesses: usize,

    #[serde(default = "default_lazy_class_loc")]
    pub lazy_class_loc: usize,

    #[serde(default = "default_lazy_class_methods")]
    pub lazy_class_methods: usize,

    #[serde(default = "default_complex_class_cc")]
    pub complex_class_cc: usize,

    #[serde(default = "default_long_parameter_list")]
    pub long_parameter_list: usize,

    #[serde(default = "default_too_many_fields")]
    pub too_many_fields: usize,

    #[serde(default = "default_message_chain_length")]
    pub message_chain_length: usize,

    #[serde(default = "default_middle_man_ratio")]
    pub middle_man_ratio: f64,

    #[serde(default = "default_switch_statements")]
    pub switch_statements: usize,

    #[serde(default = "default_duplicate_min_lines")]
    pub duplicate_min_lines: usize,

    #[serde(default = "default_coupling_cbo")]
    pub coupling_cbo: usize,
}

impl Default for SmellThresholds {
    fn default() -> Self {
        Self {
            long_method_lines: default_long_method_lines(),
            god_class_loc: default_god_class_loc(),
            god_class_methods: default_god_class_methods(),
            data_class_accessor_ratio: default_data_class_accessor_ratio(),
            feature_envy_accesses: default_feature_envy_accesses(),
            lazy_class_loc: default_lazy_class_loc(),
            lazy_class_methods: default_lazy_class_methods(),
            complex_class_cc: default_complex_class_cc(),
            long_parameter_list: default_long_parameter_list(),
            too_many_fields: default_too_many_fields(),
            message_chain_length: default_message_chain_length(),
            middle_man_ratio: default_middle_man_ratio(),
            switch_statements: default_switch_statements(),
            duplicate_min_lines: default_duplicate_min_lines(),
            coupling_cbo: default_coupling_cbo(),
        }
    }
}

fn default_long_method_lines() -> usize {
    40
}
fn default_god_class_loc() -> usize {
    200
}
fn default_god_class_methods() -> usize {
    10
}
fn default_data_class_accessor_ratio() -> f64 {
    0.7
}
fn default_feature_envy_accesses() -> usize {
    10
}
fn default_lazy_class_loc() -> usize {
    50
}
fn default_lazy_class_methods() -> usize {
    3
}
fn default_complex_class_cc() -> usize {
    50
}
fn default_long_parameter_list() -> usize {
    5
}
fn default_too_many_fields() -> usize {
    10
}
fn default_message_chain_length() -> usize {
    3
}
fn default_middle_man_ratio() -> f64 {
    0.5
}
fn default_switch_statements() -> usize {
    1
}
fn default_duplicate_min_lines() -> usize {
    6
}
fn default_coupling_cbo() -> usize {
    5
}
