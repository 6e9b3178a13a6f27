//! Metric catalog: what each exported metric measures, where it comes
//! from and which direction is better.

use serde::Serialize;

use self::Evaluation::{Negative, Positive, Reference};

/// How a metric's value should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    /// Higher is better
    Positive,
    /// Lower is better
    Negative,
    /// Larger magnitude is better, sign ignored
    Absolute,
    /// Context only, no better/worse direction
    Reference,
}

impl Evaluation {
    pub fn describe(self) -> &'static str {
        match self {
            Evaluation::Positive => "Higher is better",
            Evaluation::Negative => "Lower is better",
            Evaluation::Absolute => "Larger magnitude is better",
            Evaluation::Reference => "Reference value",
        }
    }
}

/// Static explanation of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDetail {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub logic: &'static str,
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

const BRAKING_NOTE: &str = "Braking values can be negative.";

const fn detail(
    id: &'static str,
    label: &'static str,
    description: &'static str,
    logic: &'static str,
    evaluation: Evaluation,
) -> MetricDetail {
    MetricDetail {
        id,
        label,
        description,
        logic,
        evaluation,
        note: None,
    }
}

const fn braking(id: &'static str, label: &'static str, description: &'static str, logic: &'static str) -> MetricDetail {
    MetricDetail {
        id,
        label,
        description,
        logic,
        evaluation: Evaluation::Absolute,
        note: Some(BRAKING_NOTE),
    }
}

static METRIC_DETAILS: &[MetricDetail] = &[
    detail(
        "sprint_total_time",
        "Total time",
        "Total time over the full test distance",
        "Photon sprint `Total time (s)`, latest row per player.",
        Negative,
    ),
    detail(
        "sprint_split_5m",
        "5 m split",
        "Cumulative time to 5 m; isolates the acceleration phase",
        "Photon sprint `Split time 5 m (s)`, latest row.",
        Negative,
    ),
    detail(
        "sprint_split_10m",
        "10 m split",
        "Cumulative time to 10 m; isolates the acceleration phase",
        "Photon sprint `Split time 10 m (s)`, latest row.",
        Negative,
    ),
    detail(
        "sprint_split_15m",
        "15 m split",
        "Cumulative time to 15 m; isolates the acceleration phase",
        "Photon sprint `Split time 15 m (s)`, latest row.",
        Negative,
    ),
    detail(
        "sprint_split_20m",
        "20 m split",
        "Cumulative time to 20 m; isolates the acceleration phase",
        "Photon sprint `Split time 20 m (s)`, latest row.",
        Negative,
    ),
    detail(
        "sprint_max_speed",
        "Max speed",
        "Top speed reached",
        "Photon sprint `Max speed (km/h)`, latest row.",
        Positive,
    ),
    detail(
        "sprint_accel",
        "Acceleration",
        "Acceleration as computed by Photon",
        "Photon sprint `Acceleration (m/s²)`, latest row.",
        Positive,
    ),
    detail(
        "agility_max_speed",
        "Max speed",
        "Top speed reached",
        "Photon 5-0-5 `Max speed (km/h)`, left/right average.",
        Positive,
    ),
    detail(
        "agility_avg_accel",
        "Average acceleration",
        "Entry and re-acceleration ability",
        "Photon 5-0-5 `Average acceleration (m/s²)`, left/right average.",
        Positive,
    ),
    detail(
        "agility_avg_decel",
        "Average deceleration",
        "Braking ability",
        "Photon 5-0-5 `Average deceleration (m/s²)`, left/right average.",
        Positive,
    ),
    detail(
        "agility_avg_reaccel",
        "Average re-acceleration",
        "Drive out of the turn",
        "Photon 5-0-5 `Average re-acceleration (m/s²)`, left/right average.",
        Positive,
    ),
    detail(
        "agility_5_0_time",
        "Entry 5 m time",
        "Time over the 5 m before the turn",
        "Photon 5-0-5 `5-0 time (s)`, left/right average.",
        Negative,
    ),
    detail(
        "agility_0_5_time",
        "Exit 5 m time",
        "Time over the 5 m after the turn",
        "Photon 5-0-5 `0-5 time (s)`, left/right average.",
        Negative,
    ),
    detail(
        "jump_height",
        "Jump height",
        "Vertical jump ability; the combined result of power and elasticity",
        "Hawkin CMJ `Jump Height`, latest row.",
        Positive,
    ),
    detail(
        "jump_momentum",
        "Jump momentum",
        "Output including body mass; hints at strength in aerial duels and contact",
        "Hawkin CMJ `Jump Momentum`, latest row.",
        Positive,
    ),
    detail(
        "countermovement_depth",
        "Countermovement depth",
        "Squat depth before take-off; reflects movement strategy",
        "Hawkin CMJ `Countermovement Depth`, latest row.",
        Reference,
    ),
    detail(
        "flight_time",
        "Flight time",
        "Time in the air; closely tracks jump height",
        "Hawkin CMJ `Flight Time`, latest row.",
        Positive,
    ),
    detail(
        "time_to_takeoff",
        "Time to take-off",
        "Quickness of the movement up to take-off",
        "Hawkin CMJ `Time To Takeoff`, latest row.",
        Reference,
    ),
    detail(
        "peak_propulsive_power",
        "Peak propulsive power",
        "Maximum power in the propulsive phase",
        "Hawkin CMJ `Peak Propulsive Power`, latest row.",
        Positive,
    ),
    detail(
        "peak_relative_propulsive_power",
        "Peak propulsive power (relative)",
        "Maximum propulsive power per body mass",
        "Hawkin CMJ `Peak Relative Propulsive Power`, latest row.",
        Positive,
    ),
    braking(
        "peak_braking_power",
        "Peak braking power",
        "Maximum power in the braking phase; strong braking and change of direction",
        "Hawkin CMJ `Peak Braking Power`, latest row.",
    ),
    braking(
        "peak_relative_braking_power",
        "Peak braking power (relative)",
        "Maximum braking power per body mass",
        "Hawkin CMJ `Peak Relative Braking Power`, latest row.",
    ),
    detail(
        "peak_landing_force",
        "Peak landing force",
        "Landing stability",
        "Hawkin CMJ `Peak Landing Force`, latest row.",
        Positive,
    ),
    detail(
        "relative_peak_landing_force",
        "Peak landing force (relative)",
        "Landing stability per body mass",
        "Hawkin CMJ `Relative Peak Landing Force`, latest row.",
        Positive,
    ),
    detail(
        "lr_peak_braking_force",
        "L/R difference: peak braking force",
        "Left/right braking force asymmetry; identifies the weaker side",
        "Hawkin CMJ `L|R Peak Braking Force`, absolute value.",
        Negative,
    ),
    detail(
        "lr_peak_propulsive_force",
        "L/R difference: peak propulsive force",
        "Left/right propulsive force asymmetry; identifies the weaker side",
        "Hawkin CMJ `L|R Peak Propulsive Force`, absolute value.",
        Negative,
    ),
    detail(
        "lr_peak_landing_force",
        "L/R difference: peak landing force",
        "Left/right landing impact asymmetry; identifies the weaker side",
        "Hawkin CMJ `L|R Peak Landing Force`, absolute value.",
        Negative,
    ),
];

/// Catalog entry for a metric id, if documented.
pub fn metric_detail(id: &str) -> Option<&'static MetricDetail> {
    METRIC_DETAILS.iter().find(|d| d.id == id)
}

/// Every documented metric, in catalog order.
pub fn metric_details() -> &'static [MetricDetail] {
    METRIC_DETAILS
}
