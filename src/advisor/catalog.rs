//! Static smell to refactoring pattern table.

use super::RefactoringPattern::{self, *};
use crate::smells::SmellKind;

pub fn patterns_for(smell: SmellKind) -> Vec<RefactoringPattern> {
    match smell {
        SmellKind::GodClass => vec![ExtractClass, ExtractMethod],
        SmellKind::DataClass => vec![EncapsulateField, MoveMethod],
        SmellKind::LazyClass => vec![InlineClass, CollapseHierarchy],
        SmellKind::FeatureEnvy => vec![MoveMethod, ExtractMethod],
        SmellKind::RefusedBequest => vec![ReplaceInheritanceWithDelegation, PushDownMethod],
        SmellKind::LongMethod => vec![ExtractMethod, DecomposeConditional, ReplaceTempWithQuery],
        SmellKind::ComplexClass => vec![
            ExtractClass,
            ReplaceConditionalWithPolymorphism,
            DecomposeConditional,
        ],
        SmellKind::LongParameterList => vec![IntroduceParameterObject, PreserveWholeObject],
        SmellKind::DuplicateCode => vec![RemoveDuplicateCode, ExtractMethod, PullUpMethod],
        SmellKind::SwitchStatements => vec![ReplaceConditionalWithPolymorphism],
        SmellKind::TooManyFields => vec![ExtractClass, EncapsulateField],
        SmellKind::MessageChains => vec![HideDelegate, ExtractMethod],
        SmellKind::MiddleMan => vec![RemoveMiddleMan, InlineMethod],
        SmellKind::InappropriateIntimacy => vec![MoveMethod, MoveField],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_smell_has_patterns() {
        for smell in SmellKind::ALL {
            assert!(!patterns_for(smell).is_empty(), "{smell}");
        }
    }

    #[test]
    fn test_god_class_patterns() {
        assert_eq!(
            patterns_for(SmellKind::GodClass),
            vec![ExtractClass, ExtractMethod]
        );
    }
}
