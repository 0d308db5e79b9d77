//! Reference rule tables.
//!
//! The weights and thresholds were tuned by hand. Treat them as regression
//! fixtures: a change here changes classifier behavior and belongs in a new
//! config `version`.

use super::{Condition, Metric, Rule, RuleTable};
use crate::emotion::EmotionClass::{self, Angry, Disgust, Fear, Happy, Neutral, Sad, Surprise};
use crate::features::Descriptor::{GradX, GradY, Mean, StdDev};

/// Class order of the region-based table
pub const REGIONAL_CLASSES: [EmotionClass; 4] = [Angry, Happy, Sad, Neutral];

/// Class order of the halves table
pub const HALVES_CLASSES: [EmotionClass; 4] = [Happy, Sad, Angry, Neutral];

/// Class order of the whole-face intensity table
pub const GLOBAL_CLASSES: [EmotionClass; 7] = EmotionClass::ALL;

/// Class order of the enhanced halves table
pub const ENHANCED_CLASSES: [EmotionClass; 7] = EmotionClass::ALL;

/// Thresholds of the region-based table
pub mod regional {
    pub const SMILE_STRONG: f64 = 10.0;
    pub const SMILE: f64 = 5.0;
    pub const BRIGHT_LOWER_STRONG: f64 = 8.0;
    pub const BRIGHT_LOWER: f64 = 5.0;
    pub const HORIZONTAL_MOUTH_STRONG: f64 = 1.3;
    pub const HORIZONTAL_MOUTH: f64 = 1.1;
    pub const LOWER_VARIATION_RATIO: f64 = 1.2;
    pub const BRIGHT_CHEEKS: f64 = 5.0;

    pub const DARK_LOWER_STRONG: f64 = -5.0;
    pub const DARK_LOWER: f64 = -3.0;
    pub const FROWN_STRONG: f64 = -5.0;
    pub const FROWN: f64 = -2.0;
    pub const VERTICAL_MOUTH_STRONG: f64 = 1.2;
    pub const VERTICAL_MOUTH: f64 = 1.05;
    pub const FLAT_MOUTH_RATIO: f64 = 0.8;
    pub const DARK_EYES_STRONG: f64 = -15.0;
    pub const DARK_EYES: f64 = -10.0;

    pub const DARK_UPPER_STRONG: f64 = -8.0;
    pub const DARK_UPPER: f64 = -5.0;
    pub const BROW_VARIATION_STRONG: f64 = 1.2;
    pub const BROW_VARIATION: f64 = 1.1;
    pub const VERTICAL_BROW: f64 = 1.2;
    pub const ASYMMETRY_STRONG: f64 = 10.0;
    pub const ASYMMETRY: f64 = 8.0;
    pub const DARK_BROWS: f64 = -10.0;

    pub const BALANCED_STRONG: f64 = 6.0;
    pub const BALANCED: f64 = 8.0;
    pub const STILL_MOUTH: f64 = 3.0;
    pub const LOW_VARIATION_STRONG: f64 = 40.0;
    pub const LOW_VARIATION: f64 = 45.0;
    pub const SOFT_EDGES_STRONG: f64 = 35.0;
    pub const SOFT_EDGES: f64 = 40.0;
    pub const SYMMETRIC_STRONG: f64 = 4.0;
    pub const SYMMETRIC: f64 = 6.0;
}

/// Thresholds of the halves table
pub mod halves {
    pub const BRIGHT_LOWER_HALF: f64 = 2.0;
    pub const MOUTH_TEXTURE: f64 = 30.0;
    pub const BRIGHT_MOUTH: f64 = 3.0;

    pub const DARK_FACE: f64 = 110.0;
    pub const STILL_LOWER: f64 = 3.0;
    pub const DROOPING_MOUTH: f64 = -2.0;
    pub const FLAT_VERTICAL: f64 = 5.0;

    pub const EYE_TEXTURE: f64 = 25.0;
    pub const HORIZONTAL_LINES: f64 = 6.0;
    pub const DARK_UPPER_HALF: f64 = -3.0;
    pub const ASYMMETRY: f64 = 4.0;

    pub const LOW_VARIATION: f64 = 30.0;
    pub const EVEN_TEXTURE: f64 = 5.0;
    pub const EVEN_BRIGHTNESS: f64 = 5.0;
    pub const SOFT_EDGES: f64 = 5.0;
    pub const SYMMETRIC: f64 = 3.0;
}

/// Thresholds of the whole-face intensity table
pub mod global {
    pub const BRIGHT: f64 = 130.0;
    pub const DARK: f64 = 90.0;
    pub const TEXTURED: f64 = 40.0;
    pub const VERY_TEXTURED: f64 = 50.0;
    pub const SAD_DARK: f64 = 100.0;
    pub const SAD_FLAT: f64 = 30.0;
    pub const NEUTRAL_BRIGHT: f64 = 110.0;
    pub const NEUTRAL_FLAT: f64 = 35.0;
    pub const FEAR_DARK: f64 = 110.0;
    pub const FEAR_TEXTURED: f64 = 35.0;

    /// Every decision carries the same weight
    pub const DECISION_WEIGHT: f64 = 50.0;
}

/// Thresholds of the enhanced halves table
pub mod enhanced {
    pub const HAPPY_LOWER_TEXTURE: f64 = 45.0;
    pub const HAPPY_VERTICAL_EDGES: f64 = 10.0;

    pub const SURPRISE_TEXTURE: f64 = 55.0;
    pub const SURPRISE_HALVES_GAP: f64 = 15.0;
    pub const SURPRISE_VERTICAL_EDGES: f64 = 12.0;

    pub const ANGRY_UPPER_TEXTURE: f64 = 40.0;
    pub const ANGRY_HORIZONTAL_EDGES: f64 = 8.0;

    pub const SAD_LOWER_TEXTURE: f64 = 35.0;
    pub const SAD_DARK: f64 = 100.0;

    pub const FEAR_TEXTURE: f64 = 45.0;
    pub const FEAR_DARK: f64 = 110.0;
    pub const FEAR_VERTICAL_EDGES: f64 = 10.0;

    pub const DISGUST_HORIZONTAL_EDGES: f64 = 10.0;
    pub const DISGUST_DARK: f64 = 90.0;
    pub const DISGUST_BRIGHT: f64 = 130.0;
    pub const DISGUST_UPPER_TEXTURE: f64 = 40.0;

    pub const NEUTRAL_TEXTURE: f64 = 40.0;
    pub const NEUTRAL_HALVES_TEXTURE_GAP: f64 = 10.0;
    pub const NEUTRAL_HORIZONTAL_EDGES: f64 = 8.0;

    pub const FALLBACK_BRIGHT: f64 = 120.0;
    pub const FALLBACK_DARK: f64 = 90.0;
    pub const FALLBACK_TEXTURE: f64 = 45.0;

    /// Decision weights, strongest pattern first
    pub const HAPPY_WEIGHT: f64 = 70.0;
    pub const SURPRISE_WEIGHT: f64 = 65.0;
    pub const ANGRY_WEIGHT: f64 = 60.0;
    pub const SAD_WEIGHT: f64 = 55.0;
    pub const FEAR_WEIGHT: f64 = 50.0;
    pub const DISGUST_WEIGHT: f64 = 55.0;
    pub const NEUTRAL_WEIGHT: f64 = 75.0;

    /// Weights of the brightness fallback when no pattern matches
    pub const FALLBACK_HAPPY_WEIGHT: f64 = 45.0;
    pub const FALLBACK_SAD_WEIGHT: f64 = 45.0;
    pub const FALLBACK_SURPRISE_WEIGHT: f64 = 40.0;
    pub const FALLBACK_NEUTRAL_WEIGHT: f64 = 50.0;
}

fn feat(region: &str, descriptor: crate::features::Descriptor) -> Metric {
    Metric::feature(region, descriptor)
}

fn mean_of(a: Metric, b: Metric) -> Metric {
    Metric::Mean(vec![a, b])
}

/// Region-based table over the facial region set: smile and frown from the
/// split mouth band, brightness balance between face thirds, brow texture,
/// and left/right asymmetry.
#[must_use]
pub fn regional() -> RuleTable {
    use regional::*;

    let mouth_diff = || Metric::diff(feat("lower_mouth", Mean), feat("upper_mouth", Mean));
    let lower_vs_middle = || Metric::diff(feat("lower_face", Mean), feat("middle_face", Mean));
    let upper_vs_middle = || Metric::diff(feat("upper_face", Mean), feat("middle_face", Mean));
    let mouth_h_over_v = || Metric::ratio(feat("mouth", GradX), feat("mouth", GradY));
    let mouth_v_over_h = || Metric::ratio(feat("mouth", GradY), feat("mouth", GradX));
    let brow_variation = || {
        Metric::ratio(
            mean_of(feat("left_eyebrow", StdDev), feat("right_eyebrow", StdDev)),
            feat("face", StdDev),
        )
    };
    let asymmetry = || Metric::abs_diff(feat("left_side", Mean), feat("right_side", Mean));
    let balance = || Metric::abs_diff(feat("upper_face", Mean), feat("lower_face", Mean));
    let eyes_vs_face = || {
        Metric::diff(
            mean_of(feat("left_eye", Mean), feat("right_eye", Mean)),
            feat("face", Mean),
        )
    };
    let edges = || Metric::Max(vec![feat("face", GradX), feat("face", GradY)]);

    let rules = vec![
        // Happy
        Rule::new("happy.smile_strong", Happy, 30.0, Condition::above(mouth_diff(), SMILE_STRONG)),
        Rule::new("happy.smile", Happy, 20.0, Condition::above_band(mouth_diff(), SMILE, SMILE_STRONG)),
        Rule::new(
            "happy.bright_lower_strong",
            Happy,
            20.0,
            Condition::above(lower_vs_middle(), BRIGHT_LOWER_STRONG),
        ),
        Rule::new(
            "happy.bright_lower",
            Happy,
            15.0,
            Condition::above_band(lower_vs_middle(), BRIGHT_LOWER, BRIGHT_LOWER_STRONG),
        ),
        Rule::new(
            "happy.horizontal_mouth_strong",
            Happy,
            25.0,
            Condition::above(mouth_h_over_v(), HORIZONTAL_MOUTH_STRONG),
        ),
        Rule::new(
            "happy.horizontal_mouth",
            Happy,
            15.0,
            Condition::above_band(mouth_h_over_v(), HORIZONTAL_MOUTH, HORIZONTAL_MOUTH_STRONG),
        ),
        Rule::new(
            "happy.lower_variation",
            Happy,
            15.0,
            Condition::above(
                Metric::ratio(feat("lower_face", StdDev), feat("face", StdDev)),
                LOWER_VARIATION_RATIO,
            ),
        ),
        Rule::new(
            "happy.bright_cheeks",
            Happy,
            15.0,
            Condition::above(
                Metric::diff(
                    mean_of(feat("left_cheek", Mean), feat("right_cheek", Mean)),
                    feat("face", Mean),
                ),
                BRIGHT_CHEEKS,
            ),
        ),
        // Sad
        Rule::new(
            "sad.dark_lower_strong",
            Sad,
            25.0,
            Condition::below(lower_vs_middle(), DARK_LOWER_STRONG),
        ),
        Rule::new(
            "sad.dark_lower",
            Sad,
            15.0,
            Condition::below_band(lower_vs_middle(), DARK_LOWER, DARK_LOWER_STRONG),
        ),
        Rule::new("sad.frown_strong", Sad, 30.0, Condition::below(mouth_diff(), FROWN_STRONG)),
        Rule::new("sad.frown", Sad, 20.0, Condition::below_band(mouth_diff(), FROWN, FROWN_STRONG)),
        Rule::new(
            "sad.vertical_mouth_strong",
            Sad,
            25.0,
            Condition::above(mouth_v_over_h(), VERTICAL_MOUTH_STRONG),
        ),
        Rule::new(
            "sad.vertical_mouth",
            Sad,
            15.0,
            Condition::above_band(mouth_v_over_h(), VERTICAL_MOUTH, VERTICAL_MOUTH_STRONG),
        ),
        Rule::new(
            "sad.flat_mouth",
            Sad,
            15.0,
            Condition::below(
                Metric::ratio(feat("mouth", StdDev), feat("face", StdDev)),
                FLAT_MOUTH_RATIO,
            ),
        ),
        Rule::new(
            "sad.dark_eyes_strong",
            Sad,
            20.0,
            Condition::below(eyes_vs_face(), DARK_EYES_STRONG),
        ),
        Rule::new(
            "sad.dark_eyes",
            Sad,
            10.0,
            Condition::below_band(eyes_vs_face(), DARK_EYES, DARK_EYES_STRONG),
        ),
        // Angry
        Rule::new(
            "angry.dark_upper_strong",
            Angry,
            25.0,
            Condition::below(upper_vs_middle(), DARK_UPPER_STRONG),
        ),
        Rule::new(
            "angry.dark_upper",
            Angry,
            15.0,
            Condition::below_band(upper_vs_middle(), DARK_UPPER, DARK_UPPER_STRONG),
        ),
        Rule::new(
            "angry.brow_variation_strong",
            Angry,
            25.0,
            Condition::above(brow_variation(), BROW_VARIATION_STRONG),
        ),
        Rule::new(
            "angry.brow_variation",
            Angry,
            15.0,
            Condition::above_band(brow_variation(), BROW_VARIATION, BROW_VARIATION_STRONG),
        ),
        Rule::new(
            "angry.vertical_brow",
            Angry,
            20.0,
            Condition::above(
                Metric::ratio(
                    mean_of(feat("left_eyebrow", GradY), feat("right_eyebrow", GradY)),
                    mean_of(feat("left_eyebrow", GradX), feat("right_eyebrow", GradX)),
                ),
                VERTICAL_BROW,
            ),
        ),
        Rule::new(
            "angry.asymmetry_strong",
            Angry,
            25.0,
            Condition::above(asymmetry(), ASYMMETRY_STRONG),
        ),
        Rule::new(
            "angry.asymmetry",
            Angry,
            15.0,
            Condition::above_band(asymmetry(), ASYMMETRY, ASYMMETRY_STRONG),
        ),
        Rule::new(
            "angry.dark_brows",
            Angry,
            20.0,
            Condition::below(
                Metric::diff(
                    mean_of(feat("left_eyebrow", Mean), feat("right_eyebrow", Mean)),
                    feat("forehead", Mean),
                ),
                DARK_BROWS,
            ),
        ),
        // Neutral
        Rule::new(
            "neutral.balanced_strong",
            Neutral,
            25.0,
            Condition::below(balance(), BALANCED_STRONG),
        ),
        Rule::new(
            "neutral.balanced",
            Neutral,
            15.0,
            Condition::below_band(balance(), BALANCED, BALANCED_STRONG),
        ),
        Rule::new(
            "neutral.still_mouth",
            Neutral,
            25.0,
            Condition::below(
                Metric::abs_diff(feat("lower_mouth", Mean), feat("upper_mouth", Mean)),
                STILL_MOUTH,
            ),
        ),
        Rule::new(
            "neutral.low_variation_strong",
            Neutral,
            20.0,
            Condition::below(feat("face", StdDev), LOW_VARIATION_STRONG),
        ),
        Rule::new(
            "neutral.low_variation",
            Neutral,
            10.0,
            Condition::below_band(feat("face", StdDev), LOW_VARIATION, LOW_VARIATION_STRONG),
        ),
        Rule::new(
            "neutral.soft_edges_strong",
            Neutral,
            20.0,
            Condition::below(edges(), SOFT_EDGES_STRONG),
        ),
        Rule::new(
            "neutral.soft_edges",
            Neutral,
            10.0,
            Condition::below_band(edges(), SOFT_EDGES, SOFT_EDGES_STRONG),
        ),
        Rule::new(
            "neutral.symmetric_strong",
            Neutral,
            20.0,
            Condition::below(asymmetry(), SYMMETRIC_STRONG),
        ),
        Rule::new(
            "neutral.symmetric",
            Neutral,
            10.0,
            Condition::below_band(asymmetry(), SYMMETRIC, SYMMETRIC_STRONG),
        ),
    ];

    RuleTable::new("regional", rules)
}

/// Upper/lower halves table: coarse brightness and texture balance between
/// the halves and thirds of the face, with whole-face finite differences.
#[must_use]
pub fn halves() -> RuleTable {
    use halves::*;

    let half_balance = || Metric::diff(feat("lower_half", Mean), feat("upper_half", Mean));
    let mouth_vs_eyes = || Metric::diff(feat("lower_face", Mean), feat("upper_face", Mean));
    let asymmetry = || Metric::abs_diff(feat("left_side", Mean), feat("right_side", Mean));

    let rules = vec![
        Rule::new(
            "happy.bright_lower_half",
            Happy,
            30.0,
            Condition::above(half_balance(), BRIGHT_LOWER_HALF),
        ),
        Rule::new(
            "happy.mouth_texture",
            Happy,
            25.0,
            Condition::above(feat("lower_face", StdDev), MOUTH_TEXTURE),
        ),
        Rule::new(
            "happy.bright_mouth",
            Happy,
            20.0,
            Condition::above(mouth_vs_eyes(), BRIGHT_MOUTH),
        ),
        Rule::new("sad.dark_face", Sad, 15.0, Condition::below(feat("face", Mean), DARK_FACE)),
        Rule::new(
            "sad.still_lower",
            Sad,
            25.0,
            Condition::above(
                Metric::diff(feat("upper_half", StdDev), feat("lower_half", StdDev)),
                STILL_LOWER,
            ),
        ),
        Rule::new(
            "sad.drooping_mouth",
            Sad,
            30.0,
            Condition::below(mouth_vs_eyes(), DROOPING_MOUTH),
        ),
        Rule::new(
            "sad.flat_vertical",
            Sad,
            15.0,
            Condition::below(feat("face", GradY), FLAT_VERTICAL),
        ),
        Rule::new(
            "angry.eye_texture",
            Angry,
            25.0,
            Condition::above(feat("upper_face", StdDev), EYE_TEXTURE),
        ),
        Rule::new(
            "angry.horizontal_lines",
            Angry,
            20.0,
            Condition::above(feat("face", GradX), HORIZONTAL_LINES),
        ),
        Rule::new(
            "angry.dark_upper_half",
            Angry,
            25.0,
            Condition::below(
                Metric::diff(feat("upper_half", Mean), feat("lower_half", Mean)),
                DARK_UPPER_HALF,
            ),
        ),
        Rule::new("angry.asymmetry", Angry, 15.0, Condition::above(asymmetry(), ASYMMETRY)),
        Rule::new(
            "neutral.low_variation",
            Neutral,
            25.0,
            Condition::below(feat("face", StdDev), LOW_VARIATION),
        ),
        Rule::new(
            "neutral.even_texture",
            Neutral,
            20.0,
            Condition::below(
                Metric::abs_diff(feat("upper_half", StdDev), feat("lower_half", StdDev)),
                EVEN_TEXTURE,
            ),
        ),
        Rule::new(
            "neutral.even_brightness",
            Neutral,
            20.0,
            Condition::below(
                Metric::abs_diff(feat("upper_half", Mean), feat("lower_half", Mean)),
                EVEN_BRIGHTNESS,
            ),
        ),
        Rule::new(
            "neutral.soft_edges",
            Neutral,
            25.0,
            Condition::below(Metric::Max(vec![feat("face", GradX), feat("face", GradY)]), SOFT_EDGES),
        ),
        Rule::new("neutral.symmetric", Neutral, 15.0, Condition::below(asymmetry(), SYMMETRIC)),
    ];

    RuleTable::new("halves", rules)
}

/// Whole-face decision list over mean and standard deviation, one rule per
/// class. The rules are mutually exclusive, so exactly one fires per face.
#[must_use]
pub fn global_intensity() -> RuleTable {
    use global::*;

    let mean = || feat("face", Mean);
    let std = || feat("face", StdDev);

    let happy = Condition::All(vec![
        Condition::above(mean(), BRIGHT),
        Condition::above(std(), TEXTURED),
    ]);
    let angry = Condition::All(vec![
        Condition::below(mean(), DARK),
        Condition::above(std(), TEXTURED),
    ]);
    let surprise = Condition::All(vec![
        Condition::above(std(), VERY_TEXTURED),
        Condition::above(mean(), BRIGHT).negate(),
        Condition::below(mean(), DARK).negate(),
    ]);
    let sad = Condition::All(vec![
        Condition::below(mean(), SAD_DARK),
        Condition::below(std(), SAD_FLAT),
    ]);
    let neutral = Condition::All(vec![
        Condition::above(mean(), NEUTRAL_BRIGHT),
        Condition::below(std(), NEUTRAL_FLAT),
    ]);
    let fear = Condition::All(vec![
        Condition::below(mean(), FEAR_DARK),
        Condition::above(std(), FEAR_TEXTURED),
        Condition::above(std(), VERY_TEXTURED).negate(),
        angry.clone().negate(),
    ]);
    let disgust = Condition::NoneOf(vec![
        happy.clone(),
        angry.clone(),
        surprise.clone(),
        sad.clone(),
        neutral.clone(),
        fear.clone(),
    ]);

    let rules = vec![
        Rule::new("global.happy", Happy, DECISION_WEIGHT, happy),
        Rule::new("global.angry", Angry, DECISION_WEIGHT, angry),
        Rule::new("global.surprise", Surprise, DECISION_WEIGHT, surprise),
        Rule::new("global.sad", Sad, DECISION_WEIGHT, sad),
        Rule::new("global.neutral", Neutral, DECISION_WEIGHT, neutral),
        Rule::new("global.fear", Fear, DECISION_WEIGHT, fear),
        Rule::new("global.disgust", Disgust, DECISION_WEIGHT, disgust),
    ];

    RuleTable::new("global_intensity", rules)
}

/// Decision list over face halves and whole-face gradients. The first
/// matching pattern wins; when none matches, overall brightness and
/// texture pick the class. Exactly one rule fires for any face.
#[must_use]
pub fn enhanced() -> RuleTable {
    use enhanced::*;

    let mean = || feat("face", Mean);
    let std = || feat("face", StdDev);
    let h_edges = || feat("face", GradX);
    let v_edges = || feat("face", GradY);
    let upper_mean = || feat("upper_half", Mean);
    let lower_mean = || feat("lower_half", Mean);
    let upper_std = || feat("upper_half", StdDev);
    let lower_std = || feat("lower_half", StdDev);

    let patterns = [
        (
            "enhanced.happy",
            Happy,
            HAPPY_WEIGHT,
            Condition::All(vec![
                Condition::above(lower_std(), HAPPY_LOWER_TEXTURE),
                Condition::above(Metric::diff(lower_mean(), upper_mean()), 0.0),
                Condition::above(v_edges(), HAPPY_VERTICAL_EDGES),
            ]),
        ),
        (
            "enhanced.surprise",
            Surprise,
            SURPRISE_WEIGHT,
            Condition::All(vec![
                Condition::above(std(), SURPRISE_TEXTURE),
                Condition::above(Metric::abs_diff(upper_mean(), lower_mean()), SURPRISE_HALVES_GAP),
                Condition::above(v_edges(), SURPRISE_VERTICAL_EDGES),
            ]),
        ),
        (
            "enhanced.angry",
            Angry,
            ANGRY_WEIGHT,
            Condition::All(vec![
                Condition::above(upper_std(), ANGRY_UPPER_TEXTURE),
                Condition::below(Metric::diff(upper_mean(), lower_mean()), 0.0),
                Condition::above(h_edges(), ANGRY_HORIZONTAL_EDGES),
            ]),
        ),
        (
            "enhanced.sad",
            Sad,
            SAD_WEIGHT,
            Condition::All(vec![
                Condition::below(lower_std(), SAD_LOWER_TEXTURE),
                Condition::below(mean(), SAD_DARK),
                Condition::above(Metric::diff(upper_std(), lower_std()), 0.0),
            ]),
        ),
        (
            "enhanced.fear",
            Fear,
            FEAR_WEIGHT,
            Condition::All(vec![
                Condition::above(std(), FEAR_TEXTURE),
                Condition::below(mean(), FEAR_DARK),
                Condition::above(v_edges(), FEAR_VERTICAL_EDGES),
            ]),
        ),
        (
            "enhanced.disgust",
            Disgust,
            DISGUST_WEIGHT,
            Condition::All(vec![
                Condition::above(h_edges(), DISGUST_HORIZONTAL_EDGES),
                Condition::above(mean(), DISGUST_DARK),
                Condition::below(mean(), DISGUST_BRIGHT),
                Condition::above(upper_std(), DISGUST_UPPER_TEXTURE),
            ]),
        ),
        (
            "enhanced.neutral",
            Neutral,
            NEUTRAL_WEIGHT,
            Condition::All(vec![
                Condition::below(std(), NEUTRAL_TEXTURE),
                Condition::below(Metric::abs_diff(upper_std(), lower_std()), NEUTRAL_HALVES_TEXTURE_GAP),
                Condition::below(h_edges(), NEUTRAL_HORIZONTAL_EDGES),
            ]),
        ),
    ];
    let fallbacks = [
        ("enhanced.fallback_happy", Happy, FALLBACK_HAPPY_WEIGHT, Condition::above(mean(), FALLBACK_BRIGHT)),
        ("enhanced.fallback_sad", Sad, FALLBACK_SAD_WEIGHT, Condition::below(mean(), FALLBACK_DARK)),
        (
            "enhanced.fallback_surprise",
            Surprise,
            FALLBACK_SURPRISE_WEIGHT,
            Condition::above(std(), FALLBACK_TEXTURE),
        ),
    ];

    let mut rules = Vec::with_capacity(patterns.len() + fallbacks.len() + 1);
    let mut earlier = Vec::new();
    for (id, class, weight, when) in patterns {
        rules.push(Rule::new(id, class, weight, first_match(&earlier, when.clone())));
        earlier.push(when);
    }
    for (id, class, weight, when) in fallbacks {
        rules.push(Rule::new(id, class, weight, first_match(&earlier, when.clone())));
        earlier.push(when);
    }
    rules.push(Rule::new(
        "enhanced.fallback_neutral",
        Neutral,
        FALLBACK_NEUTRAL_WEIGHT,
        Condition::NoneOf(earlier),
    ));

    RuleTable::new("enhanced", rules)
}

/// `when` holds and no earlier entry of a decision list does
fn first_match(earlier: &[Condition], when: Condition) -> Condition {
    if earlier.is_empty() {
        when
    } else {
        Condition::All(vec![when, Condition::NoneOf(earlier.to_vec())])
    }
}
