// Roll Formatter
// Renders resolved rolls per dice group and marks faces that hit their maximum

use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::dice::{self, DiceError, DiceRoll};
use crate::utils::config::{DEFAULT_ROLL_NOTATION, MAX_ROLLS_PER_REQUEST};

/// Suffix for a face that rolled the highest value of its die
pub const CRITICAL_MARKER: char = '!';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RollRequestError {
    #[error("🎲 You can roll at most {max} sets of dice at once, but you asked for {count}.")]
    TooManyRolls { count: usize, max: usize },
}

/// One dice term paired with the faces it rolled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollGroup<'a> {
    pub sides: u32,
    pub values: &'a [u32],
}

impl RollGroup<'_> {
    fn render(&self, explode_info_enabled: bool) -> String {
        let faces: Vec<String> = self
            .values
            .iter()
            .map(|&value| {
                if explode_info_enabled && value == self.sides {
                    format!("{}{}", value, CRITICAL_MARKER)
                } else {
                    value.to_string()
                }
            })
            .collect();
        format!("[{}]", faces.join(","))
    }
}

/// Render each dice group of `roll` as `[a,b,c]`, wrapped in backticks.
///
/// The notation is parsed again to learn each group's side count, and groups
/// are paired with the rolled values by position. When the two don't line up
/// the engine's own output is returned untouched.
pub fn format_individual_rolls(roll: &DiceRoll, notation: &str, explode_info_enabled: bool) -> String {
    let descriptors = match dice::parse(notation) {
        Ok(expression) => expression.dice_groups(),
        Err(e) => {
            warn!("Could not re-parse {:?} for formatting: {}", notation, e);
            return roll.output.clone();
        }
    };

    if descriptors.len() != roll.rolls.len() {
        warn!(
            "Rolled {} group(s) but {:?} describes {}, using default output",
            roll.rolls.len(),
            notation,
            descriptors.len()
        );
        return roll.output.clone();
    }

    let rendered: String = descriptors
        .iter()
        .zip(&roll.rolls)
        .map(|(descriptor, values)| {
            RollGroup {
                sides: descriptor.sides,
                values,
            }
            .render(explode_info_enabled)
        })
        .collect();

    format!("`{}`", rendered)
}

/// Split a request like `2d6, 1d20+3; d8` into individual notations.
///
/// Empty input means the default notation.
pub fn split_notations(input: &str) -> Result<Vec<String>, RollRequestError> {
    let notations: Vec<String> = input
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if notations.len() > MAX_ROLLS_PER_REQUEST {
        return Err(RollRequestError::TooManyRolls {
            count: notations.len(),
            max: MAX_ROLLS_PER_REQUEST,
        });
    }

    if notations.is_empty() {
        return Ok(vec![DEFAULT_ROLL_NOTATION.to_string()]);
    }

    Ok(notations)
}

/// Aggregated result of a multi-roll request, one line per notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollSummary {
    pub request: String,
    pub rolls: String,
    pub totals: String,
    /// Face of a lone `1d20`, for natural 1 / natural 20 highlighting
    pub natural_d20: Option<u32>,
}

/// The notation that failed and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollFailure {
    pub notation: String,
    pub error: DiceError,
}

/// Roll every notation in order. Stops at the first notation the engine rejects.
pub fn roll_all<R: Rng>(
    notations: &[String],
    explode_info_enabled: bool,
    rng: &mut R,
) -> Result<RollSummary, RollFailure> {
    let mut request = Vec::with_capacity(notations.len());
    let mut rolls = Vec::with_capacity(notations.len());
    let mut totals = Vec::with_capacity(notations.len());
    let mut natural_d20 = None;

    for notation in notations {
        let result = dice::roll(notation, rng).map_err(|error| RollFailure {
            notation: notation.clone(),
            error,
        })?;

        if notations.len() == 1 {
            natural_d20 = single_d20_face(&result, notation);
        }

        request.push(format!("`{}`", result.notation));
        rolls.push(format_individual_rolls(&result, notation, explode_info_enabled));
        totals.push(format!("**{}**", result.total));
    }

    Ok(RollSummary {
        request: request.join("\n"),
        rolls: rolls.join("\n"),
        totals: totals.join("\n"),
        natural_d20,
    })
}

fn single_d20_face(roll: &DiceRoll, notation: &str) -> Option<u32> {
    let groups = dice::parse(notation).ok()?.dice_groups();
    match (groups.as_slice(), roll.rolls.as_slice()) {
        ([group], [faces]) if group.sides == 20 && faces.len() == 1 => Some(faces[0]),
        _ => None,
    }
}

/// How a failed roll should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollErrorKind {
    BadSyntax,
    Other,
}

/// Classify an engine error. Syntax variants are bad syntax; other variants
/// go through the message heuristic.
pub fn classify_roll_error(error: &DiceError) -> RollErrorKind {
    if error.is_syntax() {
        RollErrorKind::BadSyntax
    } else {
        classify_error_message(&error.to_string())
    }
}

/// Best-effort classification of an error that only exists as text.
/// Unknown phrasings fall through to `Other`.
pub fn classify_error_message(message: &str) -> RollErrorKind {
    let message = message.to_lowercase();
    if ["invalid notation", "unexpected", "expected"]
        .iter()
        .any(|needle| message.contains(needle))
    {
        RollErrorKind::BadSyntax
    } else {
        RollErrorKind::Other
    }
}

/// User-facing reply for a failed roll
pub fn roll_error_message(input: &str, error: &DiceError) -> String {
    match classify_roll_error(error) {
        RollErrorKind::BadSyntax => format!(
            "\"{}\" doesn't look like valid dice notation. Try \"2d6\", \"1d20+5\", etc.",
            input
        ),
        RollErrorKind::Other => format!("Error rolling dice: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn resolved(notation: &str, rolls: Vec<Vec<u32>>) -> DiceRoll {
        DiceRoll {
            notation: notation.to_string(),
            rolls,
            total: 0,
            output: format!("{}: default output", notation),
        }
    }

    #[test]
    fn test_marks_max_faces() {
        let roll = resolved("2d6+1d20", vec![vec![3, 6], vec![1, 20]]);
        assert_eq!(
            format_individual_rolls(&roll, "2d6+1d20", true),
            "`[3,6!][1,20!]`"
        );
    }

    #[test]
    fn test_each_max_face_marked_independently() {
        let roll = resolved("3d6", vec![vec![6, 2, 6]]);
        assert_eq!(format_individual_rolls(&roll, "3d6", true), "`[6!,2,6!]`");
    }

    #[test]
    fn test_marker_disabled() {
        let roll = resolved("2d6+1d20", vec![vec![3, 6], vec![1, 20]]);
        assert_eq!(
            format_individual_rolls(&roll, "2d6+1d20", false),
            "`[3,6][1,20]`"
        );
    }

    #[test]
    fn test_modifiers_are_not_groups() {
        let roll = resolved("1d8+4", vec![vec![8]]);
        assert_eq!(format_individual_rolls(&roll, "1d8 + 4", true), "`[8!]`");
    }

    #[test]
    fn test_mismatch_falls_back_to_default_output() {
        let roll = resolved("2d6+1d20", vec![vec![3, 6]]);
        assert_eq!(
            format_individual_rolls(&roll, "2d6+1d20", true),
            "2d6+1d20: default output"
        );

        let unparsable = resolved("???", vec![vec![1]]);
        assert_eq!(
            format_individual_rolls(&unparsable, "???", true),
            "???: default output"
        );
    }

    #[test]
    fn test_split_notations() {
        assert_eq!(
            split_notations(" 2d6 , 1d20+3;; d8 ,").unwrap(),
            vec!["2d6", "1d20+3", "d8"]
        );
        assert_eq!(split_notations("  ").unwrap(), vec![DEFAULT_ROLL_NOTATION]);
        assert_eq!(split_notations("1,2,3,4,5").unwrap().len(), 5);
    }

    #[test]
    fn test_split_rejects_more_than_five() {
        assert_eq!(
            split_notations("1d6,1d6,1d6,1d6,1d6,1d6"),
            Err(RollRequestError::TooManyRolls { count: 6, max: 5 })
        );
    }

    #[test]
    fn test_roll_all_aggregates_in_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let notations = vec!["1d1".to_string(), "2d1+3".to_string()];
        let summary = roll_all(&notations, true, &mut rng).unwrap();

        assert_eq!(summary.request, "`1d1`\n`2d1+3`");
        assert_eq!(summary.rolls, "`[1!]`\n`[1!,1!]`");
        assert_eq!(summary.totals, "**1**\n**5**");
        assert_eq!(summary.natural_d20, None);
    }

    #[test]
    fn test_roll_all_reports_failing_notation() {
        let mut rng = StdRng::seed_from_u64(3);
        let notations = vec!["1d6".to_string(), "2d".to_string()];
        let failure = roll_all(&notations, true, &mut rng).unwrap_err();

        assert_eq!(failure.notation, "2d");
        assert_eq!(failure.error, DiceError::UnexpectedEnd);
    }

    #[test]
    fn test_oversized_notation_is_reported_not_rolled() {
        let mut rng = StdRng::seed_from_u64(3);
        let notation = format!("{}1d6", "-".repeat(5997));
        let failure = roll_all(&[notation.clone()], true, &mut rng).unwrap_err();

        assert_eq!(failure.notation, notation);
        assert!(matches!(failure.error, DiceError::TooLong { length: 6000, .. }));
        assert!(roll_error_message(&failure.notation, &failure.error)
            .starts_with("Error rolling dice: notation is too long"));
    }

    #[test]
    fn test_natural_d20_only_for_single_d20() {
        let mut rng = StdRng::seed_from_u64(9);
        let summary = roll_all(&["1d20+5".to_string()], false, &mut rng).unwrap();
        let face = summary.natural_d20.unwrap();
        assert!((1..=20).contains(&face));

        let summary = roll_all(&["2d20".to_string()], false, &mut rng).unwrap();
        assert_eq!(summary.natural_d20, None);
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(
            classify_roll_error(&DiceError::UnexpectedEnd),
            RollErrorKind::BadSyntax
        );
        assert_eq!(
            classify_roll_error(&DiceError::DivisionByZero),
            RollErrorKind::Other
        );
        assert!(roll_error_message("2d", &DiceError::UnexpectedEnd)
            .contains("doesn't look like valid dice notation"));
        assert_eq!(
            roll_error_message("1d6/0", &DiceError::DivisionByZero),
            "Error rolling dice: division by zero"
        );
    }

    // best-effort, not exhaustive
    #[test]
    fn test_message_heuristic() {
        assert_eq!(
            classify_error_message("Invalid notation: 2x"),
            RollErrorKind::BadSyntax
        );
        assert_eq!(
            classify_error_message("Expected \"d\" but \"x\" found"),
            RollErrorKind::BadSyntax
        );
        assert_eq!(
            classify_error_message("Unexpected token"),
            RollErrorKind::BadSyntax
        );
        assert_eq!(
            classify_error_message("connection reset"),
            RollErrorKind::Other
        );
    }
}
