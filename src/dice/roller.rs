use rand::Rng;

use super::notation::{parse, Expression, Node, Operator};
use super::DiceError;

/// A fully resolved roll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Normalized notation that was rolled
    pub notation: String,
    /// Face values of each dice term, in notation order
    pub rolls: Vec<Vec<u32>>,
    pub total: i64,
    /// Default rendering, e.g. `2d6+1d20: [3, 6]+[1, 20] = 30`
    pub output: String,
}

/// Parse and roll a notation string
pub fn roll<R: Rng>(notation: &str, rng: &mut R) -> Result<DiceRoll, DiceError> {
    let expression = parse(notation)?;
    roll_expression(&expression, rng)
}

/// Roll an already parsed expression
pub fn roll_expression<R: Rng>(
    expression: &Expression,
    rng: &mut R,
) -> Result<DiceRoll, DiceError> {
    let mut rolls = Vec::new();
    let (total, rendered) = evaluate(expression.root(), rng, &mut rolls)?;

    Ok(DiceRoll {
        notation: expression.notation().to_string(),
        output: format!("{}: {} = {}", expression.notation(), rendered, total),
        rolls,
        total,
    })
}

fn evaluate<R: Rng>(
    node: &Node,
    rng: &mut R,
    rolls: &mut Vec<Vec<u32>>,
) -> Result<(i64, String), DiceError> {
    match node {
        Node::Constant(value) => Ok((*value, value.to_string())),
        Node::Dice(descriptor) => {
            let faces: Vec<u32> = (0..descriptor.count)
                .map(|_| rng.random_range(1..=descriptor.sides))
                .collect();
            let sum = faces.iter().map(|&f| i64::from(f)).sum();
            let rendered = format!(
                "[{}]",
                faces
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            rolls.push(faces);
            Ok((sum, rendered))
        }
        Node::Negate(inner) => {
            let (value, rendered) = evaluate(inner, rng, rolls)?;
            let value = value.checked_neg().ok_or(DiceError::Overflow)?;
            Ok((value, format!("-{}", rendered)))
        }
        Node::Group(inner) => {
            let (value, rendered) = evaluate(inner, rng, rolls)?;
            Ok((value, format!("({})", rendered)))
        }
        Node::Binary { op, lhs, rhs } => {
            let (left, left_text) = evaluate(lhs, rng, rolls)?;
            let (right, right_text) = evaluate(rhs, rng, rolls)?;
            let value = match op {
                Operator::Add => left.checked_add(right),
                Operator::Subtract => left.checked_sub(right),
                Operator::Multiply => left.checked_mul(right),
                Operator::Divide => {
                    if right == 0 {
                        return Err(DiceError::DivisionByZero);
                    }
                    left.checked_div(right)
                }
            }
            .ok_or(DiceError::Overflow)?;
            Ok((value, format!("{}{}{}", left_text, op.symbol(), right_text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_faces_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = roll("10d6+3d20", &mut rng).unwrap();
        assert_eq!(result.rolls.len(), 2);
        assert_eq!(result.rolls[0].len(), 10);
        assert!(result.rolls[0].iter().all(|&f| (1..=6).contains(&f)));
        assert!(result.rolls[1].iter().all(|&f| (1..=20).contains(&f)));

        let sum: i64 = result.rolls.iter().flatten().map(|&f| i64::from(f)).sum();
        assert_eq!(result.total, sum);
    }

    #[test]
    fn test_default_output() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = roll("2d1 + 1d1 * 3", &mut rng).unwrap();
        assert_eq!(result.notation, "2d1+1d1*3");
        assert_eq!(result.rolls, vec![vec![1, 1], vec![1]]);
        assert_eq!(result.total, 5);
        assert_eq!(result.output, "2d1+1d1*3: [1, 1]+[1]*3 = 5");
    }

    #[test]
    fn test_constant_arithmetic() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = roll("-(7-10)/2", &mut rng).unwrap();
        assert!(result.rolls.is_empty());
        // integer division truncates toward zero
        assert_eq!(result.total, 1);
        assert_eq!(result.output, "-(7-10)/2: -(7-10)/2 = 1");
    }

    #[test]
    fn test_division_by_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(roll("1d6/0", &mut rng), Err(DiceError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            roll("9223372036854775807+1", &mut rng),
            Err(DiceError::Overflow)
        );
        assert_eq!(
            roll("99999999999999999999", &mut rng),
            Err(DiceError::Overflow)
        );
    }
}
