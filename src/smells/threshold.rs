//! Threshold strategy: boolean rules over metric values and raw counts.
//!
//! Ratio rules treat an empty denominator as "does not trigger".

use crate::config::{AnalyzerConfig, GodClassPreset, SmellThresholds};
use crate::core::Severity;
use crate::extraction::StructuralFacts;
use crate::metrics::MetricValues;

use super::{format_comparison, format_number, Smell, SmellKind, SmellMap};

/// The numbers the threshold rules look at for one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassProfile {
    pub declares_type: bool,
    pub loc: f64,
    pub cc: f64,
    pub cbo: f64,
    pub lcom: f64,
    pub dit: f64,
    pub num_methods: usize,
    pub num_fields: usize,
    pub getters_setters: usize,
    pub max_method_length: usize,
    pub max_parameters: usize,
    pub switch_count: usize,
    pub max_call_chain: usize,
    pub delegating_methods: usize,
    pub overriding_methods: usize,
    pub super_calls: usize,
    /// Most external accesses in any single method, with that method's own accesses.
    pub max_external_accesses: usize,
    pub own_accesses_at_max: usize,
}

impl ClassProfile {
    pub fn from_facts(values: &MetricValues, facts: &StructuralFacts) -> Self {
        let envious = facts.methods().max_by_key(|m| m.external_accesses);

        Self {
            declares_type: !facts.types.is_empty(),
            loc: values.loc,
            cc: values.cc,
            cbo: values.cbo,
            lcom: values.lcom,
            dit: values.dit,
            num_methods: facts.method_count(),
            num_fields: facts.fields.len(),
            getters_setters: facts.getters_setters(),
            max_method_length: facts.methods().map(|m| m.body_lines()).max().unwrap_or(0),
            max_parameters: facts.methods.iter().map(|m| m.param_count()).max().unwrap_or(0),
            switch_count: facts.switches.len(),
            max_call_chain: facts
                .methods
                .iter()
                .map(|m| m.longest_call_chain)
                .max()
                .unwrap_or(0),
            delegating_methods: facts.methods().filter(|m| m.is_delegation).count(),
            overriding_methods: facts.methods().filter(|m| m.has_override).count(),
            super_calls: facts.methods.iter().filter(|m| m.calls_super).count(),
            max_external_accesses: envious.map_or(0, |m| m.external_accesses),
            own_accesses_at_max: envious.map_or(0, |m| m.own_accesses),
        }
    }
}

/// Evaluate every threshold rule.
pub fn detect_threshold_smells(profile: &ClassProfile, config: &AnalyzerConfig) -> SmellMap {
    let t = &config.smells;
    let detectors = [
        detect_god_class(profile, t, config.god_class_preset),
        detect_data_class(profile, t),
        detect_lazy_class(profile, t),
        detect_feature_envy(profile, t),
        detect_refused_bequest(profile),
        detect_long_method(profile, t),
        detect_complex_class(profile, t),
        detect_long_parameter_list(profile, t),
        detect_switch_statements(profile, t),
        detect_too_many_fields(profile, t),
        detect_message_chains(profile, t),
        detect_middle_man(profile, t),
        detect_inappropriate_intimacy(profile, t),
    ];

    detectors
        .into_iter()
        .flatten()
        .map(|smell| (smell.kind, smell))
        .collect()
}

fn ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

fn escalate(value: f64, threshold: f64) -> Severity {
    if value > threshold * 2.0 {
        Severity::High
    } else {
        Severity::Medium
    }
}

pub fn detect_god_class(
    profile: &ClassProfile,
    t: &SmellThresholds,
    preset: GodClassPreset,
) -> Option<Smell> {
    let size_rule =
        profile.loc > t.god_class_loc as f64 && profile.num_methods > t.god_class_methods;
    if size_rule {
        return Some(
            Smell::new(
                SmellKind::GodClass,
                Severity::High,
                format!(
                    "Class is large ({} lines) and has many methods ({})",
                    format_number(profile.loc),
                    profile.num_methods
                ),
            )
            .with_evidence(
                "loc",
                format_comparison("LOC", profile.loc, ">", t.god_class_loc as f64),
            )
            .with_evidence(
                "num_methods",
                format_comparison(
                    "Methods",
                    profile.num_methods as f64,
                    ">",
                    t.god_class_methods as f64,
                ),
            ),
        );
    }

    let wmc = preset.wmc_threshold();
    if profile.cc <= wmc {
        return None;
    }
    let coupled = profile.cbo > t.coupling_cbo as f64;
    let incohesive = profile.lcom > preset.lcom_threshold();
    if !coupled && !incohesive {
        return None;
    }

    let mut smell = Smell::new(
        SmellKind::GodClass,
        Severity::High,
        "Class concentrates complexity and is poorly encapsulated",
    )
    .with_evidence("cc", format_comparison("WMC", profile.cc, ">", wmc));
    if coupled {
        smell = smell.with_evidence(
            "cbo",
            format_comparison("CBO", profile.cbo, ">", t.coupling_cbo as f64),
        );
    }
    if incohesive {
        smell = smell.with_evidence(
            "lcom",
            format_comparison("LCOM", profile.lcom, ">", preset.lcom_threshold()),
        );
    }
    Some(smell)
}

pub fn detect_data_class(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let accessor_ratio = ratio(profile.getters_setters, profile.num_methods)?;
    (accessor_ratio > t.data_class_accessor_ratio).then(|| {
        Smell::new(
            SmellKind::DataClass,
            Severity::Medium,
            format!(
                "{} of {} methods are getters or setters",
                profile.getters_setters, profile.num_methods
            ),
        )
        .with_evidence(
            "accessor_ratio",
            format_comparison(
                "Accessor ratio",
                accessor_ratio,
                ">",
                t.data_class_accessor_ratio,
            ),
        )
    })
}

pub fn detect_lazy_class(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let lazy = profile.declares_type
        && profile.loc < t.lazy_class_loc as f64
        && profile.num_methods < t.lazy_class_methods;
    lazy.then(|| {
        Smell::new(
            SmellKind::LazyClass,
            Severity::Low,
            "Class does too little to justify its existence",
        )
        .with_evidence(
            "loc",
            format_comparison("LOC", profile.loc, "<", t.lazy_class_loc as f64),
        )
        .with_evidence(
            "num_methods",
            format_comparison(
                "Methods",
                profile.num_methods as f64,
                "<",
                t.lazy_class_methods as f64,
            ),
        )
    })
}

pub fn detect_feature_envy(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let external = profile.max_external_accesses;
    let envious = external > t.feature_envy_accesses && external > profile.own_accesses_at_max;
    envious.then(|| {
        Smell::new(
            SmellKind::FeatureEnvy,
            escalate(external as f64, t.feature_envy_accesses as f64),
            format!(
                "A method uses other objects' members ({external}) more than its own ({})",
                profile.own_accesses_at_max
            ),
        )
        .with_evidence(
            "external_accesses",
            format_comparison(
                "External accesses",
                external as f64,
                ">",
                t.feature_envy_accesses as f64,
            ),
        )
    })
}

/// Subclass that neither overrides nor calls into its parent.
pub fn detect_refused_bequest(profile: &ClassProfile) -> Option<Smell> {
    let refused = profile.dit > 0.0
        && profile.num_methods > 0
        && profile.overriding_methods == 0
        && profile.super_calls == 0;
    refused.then(|| {
        Smell::new(
            SmellKind::RefusedBequest,
            Severity::Medium,
            "Class extends a parent but never overrides or calls inherited behavior",
        )
        .with_evidence("dit", format_comparison("DIT", profile.dit, ">", 0.0))
    })
}

pub fn detect_long_method(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let length = profile.max_method_length;
    (length > t.long_method_lines).then(|| {
        Smell::new(
            SmellKind::LongMethod,
            escalate(length as f64, t.long_method_lines as f64),
            format!("Longest method spans {length} lines"),
        )
        .with_evidence(
            "max_method_length",
            format_comparison(
                "Max method length",
                length as f64,
                ">",
                t.long_method_lines as f64,
            ),
        )
    })
}

pub fn detect_complex_class(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    (profile.cc > t.complex_class_cc as f64).then(|| {
        Smell::new(
            SmellKind::ComplexClass,
            escalate(profile.cc, t.complex_class_cc as f64),
            "Class has very high total cyclomatic complexity",
        )
        .with_evidence(
            "cc",
            format_comparison("CC", profile.cc, ">", t.complex_class_cc as f64),
        )
    })
}

pub fn detect_long_parameter_list(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let params = profile.max_parameters;
    (params > t.long_parameter_list).then(|| {
        Smell::new(
            SmellKind::LongParameterList,
            escalate(params as f64, t.long_parameter_list as f64),
            format!("A method takes {params} parameters"),
        )
        .with_evidence(
            "max_parameters",
            format_comparison(
                "Parameters",
                params as f64,
                ">",
                t.long_parameter_list as f64,
            ),
        )
    })
}

pub fn detect_switch_statements(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let count = profile.switch_count;
    (count > t.switch_statements).then(|| {
        Smell::new(
            SmellKind::SwitchStatements,
            Severity::Low,
            format!("Class branches on type codes in {count} switch statements"),
        )
        .with_evidence(
            "switch_count",
            format_comparison(
                "Switch statements",
                count as f64,
                ">",
                t.switch_statements as f64,
            ),
        )
    })
}

pub fn detect_too_many_fields(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let fields = profile.num_fields;
    (fields > t.too_many_fields).then(|| {
        Smell::new(
            SmellKind::TooManyFields,
            escalate(fields as f64, t.too_many_fields as f64),
            format!("Class holds {fields} fields"),
        )
        .with_evidence(
            "num_fields",
            format_comparison("Fields", fields as f64, ">", t.too_many_fields as f64),
        )
    })
}

pub fn detect_message_chains(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let chain = profile.max_call_chain;
    (chain > t.message_chain_length).then(|| {
        Smell::new(
            SmellKind::MessageChains,
            Severity::Low,
            format!("A call chain navigates {chain} objects deep"),
        )
        .with_evidence(
            "max_call_chain",
            format_comparison(
                "Chain length",
                chain as f64,
                ">",
                t.message_chain_length as f64,
            ),
        )
    })
}

pub fn detect_middle_man(profile: &ClassProfile, t: &SmellThresholds) -> Option<Smell> {
    let delegation_ratio = ratio(profile.delegating_methods, profile.num_methods)?;
    (delegation_ratio > t.middle_man_ratio).then(|| {
        Smell::new(
            SmellKind::MiddleMan,
            Severity::Medium,
            format!(
                "{} of {} methods only forward to another object",
                profile.delegating_methods, profile.num_methods
            ),
        )
        .with_evidence(
            "delegation_ratio",
            format_comparison("Delegation ratio", delegation_ratio, ">", t.middle_man_ratio),
        )
    })
}

pub fn detect_inappropriate_intimacy(
    profile: &ClassProfile,
    t: &SmellThresholds,
) -> Option<Smell> {
    let bound = t.coupling_cbo as f64;
    (profile.cbo > bound).then(|| {
        let comparison = format_comparison("CBO", profile.cbo, ">", bound);
        Smell::new(
            SmellKind::InappropriateIntimacy,
            escalate(profile.cbo, bound),
            format!("High coupling ({comparison})"),
        )
        .with_evidence("cbo", comparison)
    })
}
