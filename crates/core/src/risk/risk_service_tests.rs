//! Tests for the risk limit engine.

#[cfg(test)]
mod tests {
    use crate::risk::{
        blend_caps, color_for_score, label_for_score, risk_score, validate_allocations,
        CategoryCapTable, HoldingCategory, RawTargetLine, RiskLimitConfig, RiskLimitEngine,
        RiskLimitEngineTrait, RiskTier, RiskTierAllocation, TargetAllocationLine,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn medium_allocation() -> RiskTierAllocation {
        RiskTierAllocation::single(RiskTier::Medium)
    }

    fn line(category: HoldingCategory, pct: Decimal) -> TargetAllocationLine {
        TargetAllocationLine::new(category, pct)
    }

    // ==================== blend_caps ====================

    #[test]
    fn test_blend_single_tier_matches_table_row() {
        let table = CategoryCapTable::default();
        for tier in RiskTier::ALL {
            let blended = blend_caps(&RiskTierAllocation::single(tier));
            assert_eq!(&blended, table.row(tier), "tier {}", tier);
        }
    }

    #[test]
    fn test_blend_medium_allocation() {
        let blended = blend_caps(&medium_allocation());
        assert_eq!(blended.security, dec!(30));
        assert_eq!(blended.single_etf, dec!(50));
        assert_eq!(blended.double_long_etf, dec!(10));
    }

    #[test]
    fn test_blend_mixed_allocation_is_weighted_sum() {
        let allocation = RiskTierAllocation {
            low: dec!(50),
            high: dec!(50),
            ..Default::default()
        };
        let blended = blend_caps(&allocation);
        // low row: 0 / 10 / 30, high row: 30 / 50 / 75
        assert_eq!(blended.double_long_etf, dec!(15));
        assert_eq!(blended.security, dec!(30));
        assert_eq!(blended.single_etf, dec!(52.5));
    }

    #[test]
    fn test_blend_zero_cap_tier_contributes_zero() {
        let allocation = RiskTierAllocation {
            low: dec!(100),
            ..Default::default()
        };
        assert_eq!(blend_caps(&allocation).double_long_etf, Decimal::ZERO);
    }

    #[test]
    fn test_blend_incomplete_allocation_is_not_normalized() {
        let allocation = RiskTierAllocation {
            medium: dec!(50),
            ..Default::default()
        };
        let blended = blend_caps(&allocation);
        assert_eq!(blended.security, dec!(15));
        assert_eq!(blended.single_etf, dec!(25));
    }

    #[test]
    fn test_blend_all_zero_allocation() {
        let blended = blend_caps(&RiskTierAllocation::default());
        assert_eq!(blended.security, Decimal::ZERO);
        assert_eq!(blended.single_etf, Decimal::ZERO);
        assert_eq!(blended.double_long_etf, Decimal::ZERO);
    }

    // ==================== validate ====================

    #[test]
    fn test_validate_warning_near_cap() {
        let outcome = validate_allocations(
            &[line(HoldingCategory::Security, dec!(25))],
            &medium_allocation(),
        );
        assert!(outcome.is_valid);
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.warnings.len(), 1);

        let warning = &outcome.warnings[0];
        assert_eq!(warning.category, HoldingCategory::Security);
        assert_eq!(warning.current_percentage, dec!(25));
        assert_eq!(warning.max_allowed, dec!(30));
        assert_eq!(warning.exceeded_by, Decimal::ZERO);
    }

    #[test]
    fn test_validate_violation_over_cap() {
        let outcome = validate_allocations(
            &[line(HoldingCategory::DoubleLongEtf, dec!(12.5))],
            &medium_allocation(),
        );
        assert!(!outcome.is_valid);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].exceeded_by, dec!(2.5));
        assert_eq!(outcome.violations[0].max_allowed, dec!(10));
    }

    #[test]
    fn test_validate_sums_lines_in_same_category() {
        let outcome = validate_allocations(
            &[
                line(HoldingCategory::Security, dec!(20)),
                line(HoldingCategory::Security, dec!(15)),
            ],
            &medium_allocation(),
        );
        assert!(!outcome.is_valid);
        let violation = outcome.limit_for(HoldingCategory::Security).unwrap();
        assert_eq!(violation.current_percentage, dec!(35));
        assert_eq!(violation.exceeded_by, dec!(5));
    }

    #[test]
    fn test_validate_exact_cap_is_not_a_violation() {
        let outcome = validate_allocations(
            &[line(HoldingCategory::SingleEtf, dec!(50))],
            &medium_allocation(),
        );
        assert!(outcome.is_valid);
        assert!(outcome.violations.is_empty());
        // at the cap: allowed, but still inside the warning band
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_validate_below_warning_threshold_is_silent() {
        let outcome = validate_allocations(
            &[line(HoldingCategory::SingleEtf, dec!(39.9))],
            &medium_allocation(),
        );
        assert!(outcome.is_valid);
        assert!(!outcome.has_warnings());
        assert!(outcome.limit_for(HoldingCategory::SingleEtf).is_none());
    }

    #[test]
    fn test_validate_uncapped_categories_never_flagged() {
        let outcome = validate_allocations(
            &[
                line(HoldingCategory::BasketEtf, dec!(95)),
                line(HoldingCategory::AutoAdded, dec!(60)),
                line(HoldingCategory::Misc, dec!(80)),
            ],
            &RiskTierAllocation::single(RiskTier::Low),
        );
        assert!(outcome.is_valid);
        assert!(outcome.violations.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_validate_zero_cap_rejects_any_positive_target() {
        let outcome = validate_allocations(
            &[line(HoldingCategory::DoubleLongEtf, dec!(0.1))],
            &RiskTierAllocation::single(RiskTier::Low),
        );
        assert!(!outcome.is_valid);
        assert_eq!(outcome.violations[0].max_allowed, Decimal::ZERO);

        // zero target against a zero cap is neither violation nor warning
        let outcome = validate_allocations(
            &[line(HoldingCategory::DoubleLongEtf, Decimal::ZERO)],
            &RiskTierAllocation::single(RiskTier::Low),
        );
        assert!(outcome.is_valid);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_validate_rounds_cap_after_blending() {
        // security = 0.0045*10 + 0.0045*20 + 0.991*30 = 0.045 + 0.09 + 29.73 = 29.865.
        // Rounded once after blending this is 29.9; rounding each tier first
        // (0.0 + 0.1 + 29.7) would give 29.8.
        let allocation = RiskTierAllocation {
            low: dec!(0.45),
            low_medium: dec!(0.45),
            medium: dec!(99.1),
            ..Default::default()
        };
        assert_eq!(blend_caps(&allocation).security, dec!(29.865));

        let outcome =
            validate_allocations(&[line(HoldingCategory::Security, dec!(29.9))], &allocation);
        assert!(outcome.is_valid);
        assert!(outcome.has_warnings());
        assert_eq!(outcome.warnings[0].max_allowed, dec!(29.9));
    }

    #[test]
    fn test_validate_rounds_blend_with_extra_digits() {
        // 3.333 + 9.999 + 16.67 = 30.002 -> 30.0
        let allocation = RiskTierAllocation {
            low: dec!(33.33),
            medium: dec!(33.33),
            high: dec!(33.34),
            ..Default::default()
        };
        assert_eq!(blend_caps(&allocation).security, dec!(30.002));

        let outcome =
            validate_allocations(&[line(HoldingCategory::Security, dec!(30.05))], &allocation);
        assert!(!outcome.is_valid);
        assert_eq!(outcome.violations[0].max_allowed, dec!(30.0));
        assert_eq!(outcome.violations[0].exceeded_by, dec!(0.05));
    }

    #[test]
    fn test_validate_rounds_midpoint_away_from_zero() {
        // 22.45 rounds to 22.5, not to the even 22.4
        let mut config = RiskLimitConfig::default();
        config.cap_table.medium.security = dec!(22.45);
        let engine = RiskLimitEngine::new(config).unwrap();

        let outcome = engine.validate(
            &[line(HoldingCategory::Security, dec!(22.5))],
            &RiskTierAllocation::single(RiskTier::Medium),
        );
        assert!(outcome.is_valid);
        assert_eq!(outcome.warnings[0].max_allowed, dec!(22.5));
    }

    #[test]
    fn test_validate_does_not_mutate_inputs_and_is_idempotent() {
        let lines = vec![
            line(HoldingCategory::Security, dec!(28)),
            line(HoldingCategory::DoubleLongEtf, dec!(11)),
        ];
        let allocation = medium_allocation();
        let before = (lines.clone(), allocation);

        let first = validate_allocations(&lines, &allocation);
        let second = validate_allocations(&lines, &allocation);

        assert_eq!(first, second);
        assert_eq!((lines, allocation), before);
    }

    #[test]
    fn test_validate_reports_violations_in_fixed_category_order() {
        let outcome = validate_allocations(
            &[
                line(HoldingCategory::SingleEtf, dec!(90)),
                line(HoldingCategory::Security, dec!(90)),
                line(HoldingCategory::DoubleLongEtf, dec!(90)),
            ],
            &medium_allocation(),
        );
        let order: Vec<_> = outcome.violations.iter().map(|v| v.category).collect();
        assert_eq!(
            order,
            vec![
                HoldingCategory::DoubleLongEtf,
                HoldingCategory::Security,
                HoldingCategory::SingleEtf
            ]
        );
    }

    #[test]
    fn test_validate_raw_treats_unknown_category_as_uncapped() {
        let engine = RiskLimitEngine::default();
        let lines = vec![
            RawTargetLine {
                category: "crypto".to_string(),
                target_percentage: dec!(99),
            },
            RawTargetLine {
                category: "leveraged_etf".to_string(),
                target_percentage: dec!(11),
            },
        ];
        let outcome = engine.validate_raw(&lines, &medium_allocation());
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(
            outcome.violations[0].category,
            HoldingCategory::DoubleLongEtf
        );
    }

    #[test]
    fn test_custom_warning_ratio() {
        let config = RiskLimitConfig {
            warning_ratio: dec!(0.9),
            ..Default::default()
        };
        let engine = RiskLimitEngine::new(config).unwrap();
        let outcome = engine.validate(
            &[line(HoldingCategory::Security, dec!(25))],
            &medium_allocation(),
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = RiskLimitConfig {
            warning_ratio: dec!(-1),
            ..Default::default()
        };
        assert!(RiskLimitEngine::new(config).is_err());
    }

    #[test]
    fn test_blend_saturates_on_huge_allocation() {
        let allocation = RiskTierAllocation {
            low: Decimal::MAX,
            low_medium: Decimal::MAX,
            medium: Decimal::MAX,
            medium_high: Decimal::MAX,
            high: Decimal::MAX,
        };
        // security weights sum to 150% of Decimal::MAX
        let blended = blend_caps(&allocation);
        assert_eq!(blended.security, Decimal::MAX);
        assert!(!allocation.is_complete());
    }

    #[test]
    fn test_validate_saturates_huge_line_totals() {
        let outcome = validate_allocations(
            &[
                line(HoldingCategory::Security, Decimal::MAX),
                line(HoldingCategory::Security, Decimal::MAX),
            ],
            &medium_allocation(),
        );
        assert!(!outcome.is_valid);
        let violation = outcome.limit_for(HoldingCategory::Security).unwrap();
        assert_eq!(violation.current_percentage, Decimal::MAX);
        assert_eq!(violation.exceeded_by, Decimal::MAX - dec!(30));
    }

    // ==================== score ====================

    #[test]
    fn test_score_single_category_equals_weight() {
        for category in HoldingCategory::ALL {
            let score = risk_score(&[line(category, dec!(37.5))]);
            assert_eq!(score, Decimal::from(category.risk_weight()));
        }
    }

    #[test]
    fn test_score_weighted_mean() {
        // (1*50 + 3*25 + 4*25) / 100 = 2.25
        let score = risk_score(&[
            line(HoldingCategory::BasketEtf, dec!(50)),
            line(HoldingCategory::Security, dec!(25)),
            line(HoldingCategory::DoubleLongEtf, dec!(25)),
        ]);
        assert_eq!(score, dec!(2.25));
        assert_eq!(label_for_score(score), "Moderate Risk");
        assert_eq!(color_for_score(score), "#eab308");
    }

    #[test]
    fn test_score_empty_or_zero_weight_is_zero() {
        assert_eq!(risk_score(&[]), Decimal::ZERO);
        assert_eq!(
            risk_score(&[line(HoldingCategory::Security, Decimal::ZERO)]),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_score_huge_percentage_does_not_overflow() {
        let half_max = Decimal::MAX / Decimal::from(2);
        let score = risk_score(&[line(HoldingCategory::DoubleLongEtf, half_max)]);
        assert!((score - dec!(4)).abs() < dec!(0.000000000001));
        assert_eq!(label_for_score(score), "High Risk");

        let mixed = risk_score(&[
            line(HoldingCategory::BasketEtf, half_max),
            line(HoldingCategory::Security, half_max),
        ]);
        assert!(mixed >= dec!(1.99) && mixed <= dec!(2.01));
    }

    #[test]
    fn test_score_raw_skips_unknown_categories() {
        let engine = RiskLimitEngine::default();
        let holdings = vec![
            RawTargetLine {
                category: "security".to_string(),
                target_percentage: dec!(40),
            },
            RawTargetLine {
                category: "options".to_string(),
                target_percentage: dec!(60),
            },
        ];
        assert_eq!(engine.score_raw(&holdings), dec!(3));
    }

    #[test]
    fn test_assess_undetermined_for_empty_holdings() {
        let engine = RiskLimitEngine::default();
        let assessment = engine.assess(&[]);
        assert!(!assessment.is_determined());
        assert_eq!(assessment.score, Decimal::ZERO);
        assert_eq!(assessment.label, "Undetermined");
    }

    #[test]
    fn test_assess_resolves_band() {
        let engine = RiskLimitEngine::default();
        let assessment = engine.assess(&[line(HoldingCategory::DoubleLongEtf, dec!(100))]);
        assert_eq!(assessment.score, dec!(4));
        assert_eq!(assessment.label, "High Risk");
        assert_eq!(assessment.color, "#ef4444");
    }
}
