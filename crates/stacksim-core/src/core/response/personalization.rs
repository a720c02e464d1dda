use crate::core::models::compound::CompoundFlags;
use crate::core::models::curve::CurveKind;
use crate::core::models::profile::{ScaleFactor, UserProfile};
use serde::Serialize;

// Reference points for the normalized profile factors.
const NEUTRAL_AGE: f64 = 35.0;
const AGE_SPAN: f64 = 35.0;
const REFERENCE_BODYWEIGHT_KG: f64 = 85.0;
const BODYWEIGHT_SPAN_KG: f64 = 40.0;
const BASELINE_TRAINING_YEARS: f64 = 3.0;
const TRAINING_SPAN_YEARS: f64 = 9.0;
const NEUTRAL_SHBG_NMOL: f64 = 30.0;
const SHBG_SPAN_NMOL: f64 = 40.0;

// Anxiety-sensitive compounds ramp risk hardest in the early dose range.
const EARLY_DOSE_CUTOFF_MG: f64 = 300.0;
const EARLY_DOSE_SCALAR: f64 = 1.25;
const LATE_DOSE_SCALAR: f64 = 1.1;

// Output bounds. Any non-zero confidence width floors at CI_FLOOR before
// multiplier accumulation, so personalization never reports perfect certainty.
const CI_FLOOR: f64 = 0.1;
const CI_CEILING: f64 = 1.5;
const VALUE_CEILING: f64 = 15.0;

/// A personalized curve reading: the adjusted value and confidence width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersonalizedScore {
    pub value: f64,
    pub ci: f64,
}

/// Normalized age offset in [-1, 1]; positive past the neutral reference age.
pub fn age_offset(profile: &UserProfile) -> f64 {
    ((profile.age - NEUTRAL_AGE) / AGE_SPAN).clamp(-1.0, 1.0)
}

/// Normalized training-load score in [0, 1] from body mass and training years.
pub fn training_score(profile: &UserProfile) -> f64 {
    let weight_component =
        ((profile.bodyweight - REFERENCE_BODYWEIGHT_KG) / BODYWEIGHT_SPAN_KG).clamp(0.0, 1.0);
    let training_component = ((profile.years_training - BASELINE_TRAINING_YEARS)
        / TRAINING_SPAN_YEARS)
        .clamp(0.0, 1.0);
    (weight_component * 0.6 + training_component * 0.4).clamp(0.0, 1.0)
}

/// Normalized SHBG deviation in [-1, 1]; zero when no lab value is present.
pub fn shbg_delta(profile: &UserProfile) -> f64 {
    match profile.shbg {
        Some(shbg) if shbg.is_finite() => {
            ((shbg - NEUTRAL_SHBG_NMOL) / SHBG_SPAN_NMOL).clamp(-1.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Transforms a raw curve reading through the profile's personalization
/// factors.
///
/// Each factor is an independent multiplicative or additive adjustment gated
/// by its named lab-mode coefficient (1.0 unless overridden). Compound-
/// specific factors (SHBG, aromatization, anxiety) apply only when the
/// compound's catalog flags enable them. The final value is clamped into the
/// valid output range and the confidence width into [0, CI ceiling].
pub fn personalize(
    flags: &CompoundFlags,
    kind: CurveKind,
    dose: f64,
    base_value: f64,
    base_ci: f64,
    profile: &UserProfile,
) -> PersonalizedScore {
    let age = age_offset(profile);
    let training = training_score(profile);
    let shbg = shbg_delta(profile);
    let experience = profile.experience.impact();
    let aromatase = profile.aromatase.aromatase_shift();
    let anxiety = profile.anxiety.anxiety_shift();

    let s_age = profile.scale(ScaleFactor::Age);
    let s_training = profile.scale(ScaleFactor::Training);
    let s_shbg = profile.scale(ScaleFactor::Shbg);
    let s_aromatase = profile.scale(ScaleFactor::Aromatase);
    let s_anxiety = profile.scale(ScaleFactor::Anxiety);
    let s_experience = profile.scale(ScaleFactor::Experience);
    let s_uncertainty = profile.scale(ScaleFactor::Uncertainty);

    let mut value = base_value;
    let mut ci_multiplier = 1.0;

    match kind {
        CurveKind::Benefit => {
            // Older athletes accrue benefit slower; younger respond faster.
            value *= 1.0 - age * 0.25 * s_age;

            // Heavy training load lifts baseline benefit and tightens the band.
            if training > 0.0 {
                value += 0.15 + training * 0.35 * s_training;
                ci_multiplier *= 1.0 - training * 0.2 * s_training;
            }

            value *= 1.0 + experience.benefit * s_experience;
        }
        CurveKind::Risk => {
            // Age compounds risk (cardio, hepatic, recovery).
            if age > 0.0 {
                value *= 1.0 + age * 0.4 * s_age;
                ci_multiplier += age * 0.2 * s_age;
            } else {
                value *= 1.0 + age * 0.15 * s_age;
            }

            // Training history and muscle mass confer a slight safeguard.
            value *= 1.0 - training * 0.1 * s_training;

            value *= 1.0 + experience.risk * s_experience;
        }
    }

    // SHBG shifts potency only for the SHBG-sensitive compound.
    if flags.shbg_sensitive && shbg != 0.0 {
        match kind {
            CurveKind::Benefit => value *= 1.0 - shbg * 0.4 * s_shbg,
            CurveKind::Risk => value *= 1.0 + shbg * 0.15 * s_shbg,
        }
        ci_multiplier += shbg.abs() * 0.2 * s_shbg;
    }

    // Aromatization tendency widens estrogenic risk bands.
    if flags.aromatization > 0.0 {
        match kind {
            CurveKind::Risk => {
                value *= 1.0 + aromatase * 0.8 * s_aromatase;
                ci_multiplier += aromatase.abs() * 0.4 * s_aromatase;
            }
            CurveKind::Benefit if aromatase > 0.0 => {
                // High conversion blunts perceived benefit (water retention noise).
                value *= 1.0 - aromatase * 0.15 * s_aromatase;
            }
            CurveKind::Benefit => {}
        }
    }

    // Anxiety-prone users see neuro-sensitive risk ramp faster, early doses worst.
    if flags.neuro_sensitive && kind == CurveKind::Risk && anxiety != 0.0 {
        let dose_scalar = if dose <= EARLY_DOSE_CUTOFF_MG {
            EARLY_DOSE_SCALAR
        } else {
            LATE_DOSE_SCALAR
        };
        value *= 1.0 + anxiety * dose_scalar * s_anxiety;
        ci_multiplier += anxiety.abs() * 0.5 * s_anxiety;
    }

    let ci_base = if base_ci == 0.0 {
        0.0
    } else {
        base_ci.max(CI_FLOOR)
    };
    PersonalizedScore {
        value: value.clamp(0.0, VALUE_CEILING),
        ci: (ci_base * ci_multiplier * s_uncertainty).clamp(0.0, CI_CEILING),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::profile::{Experience, LabMode, LabScales, Tendency};

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    /// A profile whose every factor is the identity transform: reference
    /// age/bodyweight/training/SHBG and lab mode zeroing every coefficient.
    fn identity_profile() -> UserProfile {
        UserProfile {
            age: 35.0,
            bodyweight: 85.0,
            years_training: 3.0,
            shbg: Some(30.0),
            aromatase: Tendency::Moderate,
            anxiety: Tendency::Moderate,
            experience: Experience::MultiCompound,
            lab_mode: LabMode {
                enabled: true,
                scales: LabScales {
                    age: 0.0,
                    training: 0.0,
                    shbg: 0.0,
                    aromatase: 0.0,
                    anxiety: 0.0,
                    experience: 0.0,
                    uncertainty: 1.0,
                },
            },
        }
    }

    fn aromatizing_flags() -> CompoundFlags {
        CompoundFlags {
            aromatization: 1.0,
            ..CompoundFlags::default()
        }
    }

    #[test]
    fn identity_profile_passes_values_through() {
        let score = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            3.0,
            0.2,
            &identity_profile(),
        );
        assert!(f64_approx_equal(score.value, 3.0));
        assert!(f64_approx_equal(score.ci, 0.2));
    }

    #[test]
    fn older_profile_shifts_benefit_down_and_risk_up() {
        let profile = UserProfile {
            age: 52.5, // offset +0.5
            bodyweight: 85.0,
            years_training: 3.0,
            experience: Experience::MultiCompound,
            ..UserProfile::default()
        };
        let mut scaled = profile.clone();
        scaled.lab_mode = LabMode {
            enabled: true,
            scales: LabScales {
                experience: 0.0,
                ..LabScales::default()
            },
        };

        let benefit = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &scaled,
        );
        // 2.0 * (1 - 0.5 * 0.25)
        assert!(f64_approx_equal(benefit.value, 1.75));

        let risk = personalize(
            &CompoundFlags::default(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.0,
            &scaled,
        );
        // 2.0 * (1 + 0.5 * 0.4)
        assert!(f64_approx_equal(risk.value, 2.4));
    }

    #[test]
    fn younger_profile_discounts_risk_at_the_mild_rate() {
        let mut profile = identity_profile();
        profile.age = 17.5; // offset -0.5
        profile.lab_mode.scales.age = 1.0;

        let risk = personalize(
            &CompoundFlags::default(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        // 2.0 * (1 + (-0.5) * 0.15)
        assert!(f64_approx_equal(risk.value, 1.85));
    }

    #[test]
    fn training_load_boosts_benefit_and_tightens_ci() {
        let mut profile = identity_profile();
        profile.bodyweight = 125.0; // weight component 1.0
        profile.years_training = 12.0; // training component 1.0
        profile.lab_mode.scales.training = 1.0;

        let score = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.5,
            &profile,
        );
        // 2.0 + (0.15 + 1.0 * 0.35) = 2.5; ci 0.5 * (1 - 0.2) = 0.4
        assert!(f64_approx_equal(score.value, 2.5));
        assert!(f64_approx_equal(score.ci, 0.4));
    }

    #[test]
    fn shbg_applies_only_to_flagged_compounds() {
        let mut profile = identity_profile();
        profile.shbg = Some(70.0); // delta +1.0
        profile.lab_mode.scales.shbg = 1.0;

        let unflagged = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(unflagged.value, 2.0));

        let flags = CompoundFlags {
            shbg_sensitive: true,
            ..CompoundFlags::default()
        };
        let flagged = personalize(&flags, CurveKind::Benefit, 500.0, 2.0, 0.0, &profile);
        // 2.0 * (1 - 1.0 * 0.4)
        assert!(f64_approx_equal(flagged.value, 1.2));

        let flagged_risk = personalize(&flags, CurveKind::Risk, 500.0, 2.0, 0.0, &profile);
        // 2.0 * (1 + 1.0 * 0.15)
        assert!(f64_approx_equal(flagged_risk.value, 2.3));
    }

    #[test]
    fn missing_shbg_is_neutral() {
        let mut profile = identity_profile();
        profile.shbg = None;
        profile.lab_mode.scales.shbg = 1.0;
        let flags = CompoundFlags {
            shbg_sensitive: true,
            ..CompoundFlags::default()
        };
        let score = personalize(&flags, CurveKind::Benefit, 500.0, 2.0, 0.0, &profile);
        assert!(f64_approx_equal(score.value, 2.0));
    }

    #[test]
    fn high_aromatase_widens_risk_and_dampens_benefit() {
        let mut profile = identity_profile();
        profile.aromatase = Tendency::High; // shift +0.35
        profile.lab_mode.scales.aromatase = 1.0;
        profile.lab_mode.scales.uncertainty = 1.0;

        let risk = personalize(
            &aromatizing_flags(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.2,
            &profile,
        );
        // 2.0 * (1 + 0.35 * 0.8) = 2.56; ci 0.2 * (1 + 0.35 * 0.4) = 0.228
        assert!(f64_approx_equal(risk.value, 2.56));
        assert!(f64_approx_equal(risk.ci, 0.228));

        let benefit = personalize(
            &aromatizing_flags(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        // 2.0 * (1 - 0.35 * 0.15)
        assert!(f64_approx_equal(benefit.value, 1.895));
    }

    #[test]
    fn low_aromatase_narrows_risk_without_touching_benefit() {
        let mut profile = identity_profile();
        profile.aromatase = Tendency::Low; // shift -0.2
        profile.lab_mode.scales.aromatase = 1.0;

        let risk = personalize(
            &aromatizing_flags(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        // 2.0 * (1 - 0.2 * 0.8)
        assert!(f64_approx_equal(risk.value, 1.68));

        let benefit = personalize(
            &aromatizing_flags(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(benefit.value, 2.0));
    }

    #[test]
    fn anxiety_ramps_early_doses_harder_than_late() {
        let mut profile = identity_profile();
        profile.anxiety = Tendency::High; // shift +0.35
        profile.lab_mode.scales.anxiety = 1.0;
        let flags = CompoundFlags {
            neuro_sensitive: true,
            ..CompoundFlags::default()
        };

        let early = personalize(&flags, CurveKind::Risk, 200.0, 2.0, 0.0, &profile);
        // 2.0 * (1 + 0.35 * 1.25)
        assert!(f64_approx_equal(early.value, 2.875));

        let late = personalize(&flags, CurveKind::Risk, 600.0, 2.0, 0.0, &profile);
        // 2.0 * (1 + 0.35 * 1.1)
        assert!(f64_approx_equal(late.value, 2.77));
        assert!(early.value > late.value);
    }

    #[test]
    fn anxiety_never_touches_benefit_or_unflagged_compounds() {
        let mut profile = identity_profile();
        profile.anxiety = Tendency::High;
        profile.lab_mode.scales.anxiety = 1.0;
        let flags = CompoundFlags {
            neuro_sensitive: true,
            ..CompoundFlags::default()
        };

        let benefit = personalize(&flags, CurveKind::Benefit, 200.0, 2.0, 0.0, &profile);
        assert!(f64_approx_equal(benefit.value, 2.0));

        let unflagged = personalize(
            &CompoundFlags::default(),
            CurveKind::Risk,
            200.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(unflagged.value, 2.0));
    }

    #[test]
    fn novice_gets_benefit_boost_and_risk_penalty() {
        let mut profile = identity_profile();
        profile.experience = Experience::None;
        profile.lab_mode.scales.experience = 1.0;

        let benefit = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(benefit.value, 2.36));

        let risk = personalize(
            &CompoundFlags::default(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(risk.value, 2.7));
    }

    #[test]
    fn veteran_gets_benefit_dampening_with_neutral_risk() {
        let mut profile = identity_profile();
        profile.experience = Experience::Veteran;
        profile.lab_mode.scales.experience = 1.0;

        let benefit = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(benefit.value, 1.76));

        let risk = personalize(
            &CompoundFlags::default(),
            CurveKind::Risk,
            500.0,
            2.0,
            0.0,
            &profile,
        );
        assert!(f64_approx_equal(risk.value, 2.0));
    }

    #[test]
    fn nonzero_ci_floors_at_the_minimum_before_multipliers() {
        let score = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            3.0,
            0.02,
            &identity_profile(),
        );
        assert!(f64_approx_equal(score.ci, 0.1));
    }

    #[test]
    fn zero_ci_stays_zero() {
        let score = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            3.0,
            0.0,
            &identity_profile(),
        );
        assert!(f64_approx_equal(score.ci, 0.0));
    }

    #[test]
    fn outputs_are_clamped_to_valid_ranges() {
        let mut profile = identity_profile();
        profile.experience = Experience::None;
        profile.lab_mode.scales.experience = 1.0;
        profile.lab_mode.scales.uncertainty = 100.0;

        let score = personalize(
            &CompoundFlags::default(),
            CurveKind::Benefit,
            500.0,
            14.0,
            0.5,
            &profile,
        );
        assert!(f64_approx_equal(score.value, VALUE_CEILING));
        assert!(f64_approx_equal(score.ci, CI_CEILING));
    }

    #[test]
    fn value_never_goes_negative() {
        let mut profile = identity_profile();
        profile.shbg = Some(1000.0); // delta clamps to +1.0
        profile.lab_mode.scales.shbg = 3.0;
        let flags = CompoundFlags {
            shbg_sensitive: true,
            ..CompoundFlags::default()
        };
        let score = personalize(&flags, CurveKind::Benefit, 500.0, 2.0, 0.0, &profile);
        assert!(score.value >= 0.0);
    }
}
