//! Preflight decision engine
//!
//! Pure, deterministic mapping from the three upstream summaries to a
//! single advisory verdict. Evaluation is fail-safe and short-circuiting:
//! gates run in a fixed order (completeness, TFR, weather, airspace/LAANC)
//! and the first hard stop ends evaluation. Unverifiable state is treated
//! as unsafe, so uncertainty always surfaces as a stricter verdict, never
//! as a silent GO.
//!
//! The engine performs no I/O and holds no state; identical inputs always
//! produce identical output.

use crate::types::{
    AirspaceSummary, ChecklistItem, ChecklistStatus, Decision, MissionType, OverallStatus,
    TfrStatus, TfrSummary, TriState, WeatherSummary,
};

/// Fixed legal-advisory boilerplate attached to every decision
pub const DISCLAIMERS: [&str; 3] = [
    "Advisory only - not legal advice and not authorization to fly.",
    "Verify requirements and obtain any needed authorizations (e.g., LAANC) via an FAA-approved provider.",
    "If any data is missing or uncertain, do not fly until you verify with authoritative sources.",
];

/// Accumulates checklist entries and rationale in gate order, then seals
/// into a [`Decision`].
struct Evaluation {
    required_actions: Vec<String>,
    checklist: Vec<ChecklistItem>,
    rationale: Vec<String>,
}

impl Evaluation {
    fn new() -> Self {
        Self {
            required_actions: Vec::new(),
            checklist: Vec::new(),
            rationale: Vec::new(),
        }
    }

    fn check(&mut self, category: &str, item: impl Into<String>, status: ChecklistStatus) {
        self.checklist.push(ChecklistItem::new(category, item, status));
    }

    fn action(&mut self, action: impl Into<String>) {
        self.required_actions.push(action.into());
    }

    fn because(&mut self, reason: impl Into<String>) {
        self.rationale.push(reason.into());
    }

    fn finish(self, overall_status: OverallStatus) -> Decision {
        Decision {
            overall_status,
            required_actions: self.required_actions,
            checklist_items: self.checklist,
            rationale: self.rationale,
            disclaimers: DISCLAIMERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Evaluate the preflight rules and produce an advisory decision.
///
/// Never panics: malformed upstream data has already been reduced to
/// explicit `Unknown` fields by the summary types, and every combination
/// of enum values maps to a verdict.
pub fn decide_preflight(
    _mission_type: MissionType,
    airspace: &AirspaceSummary,
    weather: &WeatherSummary,
    tfr: &TfrSummary,
) -> Decision {
    let mut eval = Evaluation::new();

    // Gate 1: completeness. An empty summary means a check never ran;
    // nothing downstream can compensate for that.
    if airspace.is_empty() || weather.is_empty() || tfr.is_empty() {
        eval.check(
            "Data",
            "Critical preflight data missing (airspace, weather, or TFR)",
            ChecklistStatus::Blocking,
        );
        eval.because("One or more preflight data sources returned no usable data.");
        eval.action(
            "Re-run the preflight checks or verify airspace, weather, and TFRs manually before flight.",
        );
        return eval.finish(OverallStatus::InsufficientData);
    }

    // Gate 2: TFRs. Hard stop; unverifiable TFR state is treated as unsafe.
    match tfr.status.unwrap_or(TfrStatus::Unknown) {
        TfrStatus::Unknown => {
            eval.check(
                "Airspace",
                "TFR status unknown (verification required)",
                ChecklistStatus::Blocking,
            );
            eval.because("TFR status could not be verified.");
            eval.action("Verify TFRs at tfr.faa.gov or an FAA-approved provider before any operation.");
            return eval.finish(OverallStatus::NoGo);
        }
        TfrStatus::Restricted => {
            eval.check(
                "Airspace",
                "TFR indicates restriction in effect",
                ChecklistStatus::Blocking,
            );
            eval.because(format!(
                "TFR restriction indicated ({} listed in the area). Do not fly until verified and resolved.",
                tfr.tfr_count
            ));
            eval.action("Verify TFR boundaries/timing via official FAA sources before any operation.");
            return eval.finish(OverallStatus::NoGo);
        }
        TfrStatus::Clear if tfr.tfr_count > 0 => {
            // Corroborating signal wins over the status tag.
            eval.check(
                "Airspace",
                "TFRs listed despite CLEAR status",
                ChecklistStatus::Blocking,
            );
            eval.because(format!(
                "TFR check reported CLEAR but {} TFRs were listed for the area.",
                tfr.tfr_count
            ));
            eval.action("Verify TFR boundaries/timing via official FAA sources before any operation.");
            return eval.finish(OverallStatus::NoGo);
        }
        TfrStatus::Clear => {
            eval.check(
                "Airspace",
                "TFRs checked (no matches found by this checker)",
                ChecklistStatus::Ok,
            );
        }
    }

    // Gate 3: weather. A confirmed-bad field is a hard stop; an unknown
    // field is a soft stop carried through to the final verdict.
    if weather.visibility_ok == TriState::No {
        eval.check(
            "Weather",
            "Visibility below Part 107 minimums",
            ChecklistStatus::Blocking,
        );
        eval.because("Reported visibility is below minimums for small UAS operations.");
        return eval.finish(OverallStatus::NoGo);
    }
    if weather.cloud_clearance_ok == TriState::No {
        eval.check(
            "Weather",
            "Cloud clearance cannot be maintained",
            ChecklistStatus::Blocking,
        );
        eval.because("Reported cloud ceiling does not allow required cloud clearance.");
        return eval.finish(OverallStatus::NoGo);
    }
    let weather_uncertain =
        !weather.visibility_ok.is_known() || !weather.cloud_clearance_ok.is_known();
    if weather_uncertain {
        eval.check(
            "Weather",
            "Weather status unknown (verification required)",
            ChecklistStatus::ActionNeeded,
        );
        eval.because("Weather data was incomplete or could not be evaluated.");
        eval.action("Verify weather at flight time using authoritative sources.");
    } else {
        eval.check(
            "Weather",
            "Weather advisory check completed",
            ChecklistStatus::Ok,
        );
    }

    // Gate 4: airspace / LAANC.
    let airspace_class = airspace.airspace_class.as_deref().unwrap_or("Unknown");
    let class_known = !airspace_class.eq_ignore_ascii_case("unknown");
    eval.check(
        "Airspace",
        format!("Airspace class: {}", airspace_class),
        if class_known {
            ChecklistStatus::Ok
        } else {
            ChecklistStatus::Unknown
        },
    );

    match airspace.laanc_required {
        TriState::Yes => {
            eval.check(
                "Regulatory",
                "LAANC authorization required for controlled airspace",
                ChecklistStatus::ActionNeeded,
            );
            eval.action("Obtain LAANC authorization via an FAA-approved LAANC provider before flight.");
            eval.because("Controlled airspace indicates authorization is required prior to flight.");

            if airspace.laanc_available == TriState::No {
                eval.check(
                    "Regulatory",
                    "LAANC required but not available at this location",
                    ChecklistStatus::Blocking,
                );
                eval.because(
                    "LAANC authorization is required but reported unavailable; instant authorization is not possible.",
                );
                return eval.finish(OverallStatus::NoGo);
            }
            return eval.finish(OverallStatus::GoWithConditions);
        }
        TriState::Unknown => {
            eval.check(
                "Regulatory",
                "LAANC requirement unknown",
                ChecklistStatus::ActionNeeded,
            );
            eval.action(
                "LAANC requirement unclear; verify airspace status in an FAA-approved provider before flight.",
            );
            eval.because("Airspace authorization requirement could not be determined from available data.");
            return eval.finish(OverallStatus::GoWithConditions);
        }
        TriState::No => {
            eval.check(
                "Regulatory",
                "No LAANC authorization indicated by this checker",
                ChecklistStatus::Ok,
            );
        }
    }

    // Gate 5: default. Weather uncertainty recorded above still downgrades;
    // a clean board gets GO with the standing reminder.
    eval.action("Maintain visual line of sight and comply with all applicable operating rules.");
    if weather_uncertain {
        eval.finish(OverallStatus::GoWithConditions)
    } else {
        eval.finish(OverallStatus::Go)
    }
}
